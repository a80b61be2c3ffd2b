// In: src/config.rs

//! Caller-facing option records for compressor and decompressor sessions.
//!
//! These structs hold *raw* scalar values exactly as a host hands them over
//! (e.g., from Python keyword arguments or a JSON document). Nothing here is
//! validated; the `params` module turns an options record into an engine
//! parameter record or rejects it. Keeping the two apart means an options record
//! can always be built, serialized, logged, and overlaid, while only validated
//! parameter records can ever reach an engine.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::params::{level_codes, DEFAULT_DICT_SIZE_LOG2, DEFAULT_TABLE_UPDATE_RATE};

//==================================================================================
// I. Compression Options
//==================================================================================

/// Scalar options accepted by `compress_init`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct CompressOptions {
    /// Log2 of the match window. Must lie in `[MIN_DICT_SIZE_LOG2, MAX_DICT_SIZE_LOG2]`.
    pub dict_size_log2: u32,

    /// Raw compression level code (see `params::level_codes`).
    pub level: u32,

    /// Huffman table update rate. Passed through untouched.
    pub table_update_rate: u32,

    /// Upper bound on engine-internal worker threads.
    pub max_helper_threads: u32,

    /// Advanced table tuning. Passed through untouched.
    pub table_max_update_interval: u32,

    /// Advanced table tuning. Passed through untouched.
    pub table_update_interval_slow_rate: u32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            dict_size_log2: DEFAULT_DICT_SIZE_LOG2,
            level: level_codes::DEFAULT,
            table_update_rate: DEFAULT_TABLE_UPDATE_RATE,
            max_helper_threads: 0,
            table_max_update_interval: 0,
            table_update_interval_slow_rate: 0,
        }
    }
}

/// Options documents must be JSON objects. Arrays are rejected, not read
/// positionally into the struct fields.
fn from_json_object<T: DeserializeOwned>(text: &str) -> Result<T, BridgeError> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
    Ok(serde_json::from_value(serde_json::Value::Object(object))?)
}

impl CompressOptions {
    /// Parses options from a JSON object. Missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        from_json_object(text)
    }
}

/// A sparse set of compression overrides. `None` means "keep what is already set".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct CompressFilters {
    pub dict_size_log2: Option<u32>,
    pub level: Option<u32>,
    pub table_update_rate: Option<u32>,
    pub max_helper_threads: Option<u32>,
    pub table_max_update_interval: Option<u32>,
    pub table_update_interval_slow_rate: Option<u32>,
}

impl CompressFilters {
    /// Returns `base` with every set filter applied on top.
    pub fn apply(&self, base: CompressOptions) -> CompressOptions {
        CompressOptions {
            dict_size_log2: self.dict_size_log2.unwrap_or(base.dict_size_log2),
            level: self.level.unwrap_or(base.level),
            table_update_rate: self.table_update_rate.unwrap_or(base.table_update_rate),
            max_helper_threads: self.max_helper_threads.unwrap_or(base.max_helper_threads),
            table_max_update_interval: self
                .table_max_update_interval
                .unwrap_or(base.table_max_update_interval),
            table_update_interval_slow_rate: self
                .table_update_interval_slow_rate
                .unwrap_or(base.table_update_interval_slow_rate),
        }
    }
}

//==================================================================================
// II. Decompression Options
//==================================================================================

/// Scalar options accepted by `decompress_init` and `decompress_reinit`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct DecompressOptions {
    /// Log2 of the match window. Must match what the stream was compressed with.
    pub dict_size_log2: u32,
    pub table_update_rate: u32,
    pub table_max_update_interval: u32,
    pub table_update_interval_slow_rate: u32,

    /// Ask the engine to verify the stream checksum while decoding.
    #[serde(alias = "compute_adler32_during_decomp")]
    pub compute_checksum_during_decompress: bool,

    /// Ask the engine to write straight into the caller's buffer.
    #[serde(alias = "unbuffered_decompression")]
    pub unbuffered_output: bool,
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self {
            dict_size_log2: DEFAULT_DICT_SIZE_LOG2,
            table_update_rate: DEFAULT_TABLE_UPDATE_RATE,
            table_max_update_interval: 0,
            table_update_interval_slow_rate: 0,
            compute_checksum_during_decompress: true,
            unbuffered_output: false,
        }
    }
}

impl DecompressOptions {
    /// Parses options from a JSON object. Missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        from_json_object(text)
    }
}

/// A sparse set of decompression overrides.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct DecompressFilters {
    pub dict_size_log2: Option<u32>,
    pub table_update_rate: Option<u32>,
    pub table_max_update_interval: Option<u32>,
    pub table_update_interval_slow_rate: Option<u32>,
    #[serde(alias = "compute_adler32_during_decomp")]
    pub compute_checksum_during_decompress: Option<bool>,
    #[serde(alias = "unbuffered_decompression")]
    pub unbuffered_output: Option<bool>,
}

impl DecompressFilters {
    pub fn apply(&self, base: DecompressOptions) -> DecompressOptions {
        DecompressOptions {
            dict_size_log2: self.dict_size_log2.unwrap_or(base.dict_size_log2),
            table_update_rate: self.table_update_rate.unwrap_or(base.table_update_rate),
            table_max_update_interval: self
                .table_max_update_interval
                .unwrap_or(base.table_max_update_interval),
            table_update_interval_slow_rate: self
                .table_update_interval_slow_rate
                .unwrap_or(base.table_update_interval_slow_rate),
            compute_checksum_during_decompress: self
                .compute_checksum_during_decompress
                .unwrap_or(base.compute_checksum_during_decompress),
            unbuffered_output: self.unbuffered_output.unwrap_or(base.unbuffered_output),
        }
    }
}

//==================================================================================
// III. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_host_defaults() {
        let c = CompressOptions::default();
        assert_eq!(c.dict_size_log2, 26);
        assert_eq!(c.level, 2);
        assert_eq!(c.table_update_rate, 8);
        assert_eq!(c.max_helper_threads, 0);

        let d = DecompressOptions::default();
        assert_eq!(d.dict_size_log2, 26);
        assert!(d.compute_checksum_during_decompress);
        assert!(!d.unbuffered_output);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let opts = CompressOptions::from_json(r#"{ "level": 4, "dict_size_log2": 20 }"#).unwrap();
        assert_eq!(opts.level, 4);
        assert_eq!(opts.dict_size_log2, 20);
        assert_eq!(opts.table_update_rate, DEFAULT_TABLE_UPDATE_RATE);
    }

    #[test]
    fn test_decompress_json_accepts_host_keyword_names() {
        let opts = DecompressOptions::from_json(
            r#"{ "compute_adler32_during_decomp": false, "unbuffered_decompression": true }"#,
        )
        .unwrap();
        assert!(!opts.compute_checksum_during_decompress);
        assert!(opts.unbuffered_output);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        for text in ["{ nope", r#"{ "level": "x" }"#, "42", "null"] {
            assert!(
                matches!(CompressOptions::from_json(text), Err(BridgeError::Config(_))),
                "accepted {}",
                text
            );
        }
    }

    #[test]
    fn test_from_json_rejects_positional_arrays() {
        assert!(matches!(
            CompressOptions::from_json("[1, 2]"),
            Err(BridgeError::Config(_))
        ));
        assert!(matches!(
            DecompressOptions::from_json("[20, 8, 0, 0, false, true]"),
            Err(BridgeError::Config(_))
        ));
        assert!(CompressOptions::from_json("{}").is_ok());
    }

    #[test]
    fn test_filters_only_override_set_fields() {
        let base = CompressOptions {
            level: 3,
            ..Default::default()
        };
        let filters = CompressFilters {
            dict_size_log2: Some(18),
            ..Default::default()
        };
        let merged = filters.apply(base);
        assert_eq!(merged.dict_size_log2, 18);
        assert_eq!(merged.level, 3);

        let merged = DecompressFilters {
            unbuffered_output: Some(true),
            ..Default::default()
        }
        .apply(DecompressOptions::default());
        assert!(merged.unbuffered_output);
        assert!(merged.compute_checksum_during_decompress);
    }
}
