// In: src/error.rs

//! This module defines the single, unified error type for the entire lzham-bridge library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! The variants are grouped the way callers need to tell them apart: bad options are
//! reported before the engine is ever touched, a refused engine is distinct from a bad
//! option, and streaming failures carry the raw engine status code.

use std::fmt;

use thiserror::Error;

use crate::bridge::registry::Handle;

/// Which half of the codec an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Compress => write!(f, "compressor"),
            Direction::Decompress => write!(f, "decompressor"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BridgeError {
    // =========================================================================
    // === Validation Errors (raised before any engine call)
    // =========================================================================
    #[error("Invalid dict size ! dict_size_log2={value}, expected {min}..={max}")]
    InvalidDictSize { value: u32, min: u32, max: u32 },

    #[error("Invalid compression level ! level={0}")]
    InvalidCompressionLevel(u32),

    #[error("Invalid number of helper threads: {value} (max {max})")]
    InvalidThreadCount { value: u32, max: u32 },

    // =========================================================================
    // === Handle & Engine Lifecycle Errors
    // =========================================================================
    #[error("Corrupted handler ! ({0})")]
    CorruptedHandle(Handle),

    #[error("Failed initializing {0} !")]
    EngineInitFailed(Direction),

    #[error("Failed re-initializing {0} !")]
    EngineReinitFailed(Direction),

    // =========================================================================
    // === Streaming Errors
    // =========================================================================
    #[error("Compression failed with status code: {status}")]
    CompressionFailed { status: u32 },

    #[error("Decompression failed with status code: {status}")]
    DecompressionFailed { status: u32 },

    #[error("{direction} wrote too many bytes to destination buffer: produced {produced}, room for {remaining}")]
    OutputOverrun {
        direction: Direction,
        produced: usize,
        remaining: usize,
    },

    #[error("{direction} consumed {consumed} input bytes but only {available} were offered")]
    InputOverrun {
        direction: Direction,
        consumed: usize,
        available: usize,
    },

    #[error("{direction} made no progress for {rounds} consecutive rounds")]
    Stalled { direction: Direction, rounds: usize },

    #[error("Failed to allocate the output buffer ! ({requested} bytes)")]
    OutputAllocation { requested: usize },

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// Options could not be parsed from their JSON representation.
    #[error("Invalid options document: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Could not open log file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

#[cfg(feature = "python")]
impl From<BridgeError> for pyo3::PyErr {
    fn from(err: BridgeError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_host_wording() {
        let err = BridgeError::CompressionFailed { status: 4 };
        assert_eq!(err.to_string(), "Compression failed with status code: 4");

        let err = BridgeError::CorruptedHandle(Handle::NULL);
        assert!(err.to_string().starts_with("Corrupted handler !"));

        let err = BridgeError::EngineInitFailed(Direction::Decompress);
        assert_eq!(err.to_string(), "Failed initializing decompressor !");
    }

    #[test]
    fn test_json_errors_convert() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err: BridgeError = parse.unwrap_err().into();
        assert!(matches!(err, BridgeError::Config(_)));
    }
}
