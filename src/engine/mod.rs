// In: src/engine/mod.rs

//! The engine seam.
//!
//! An engine is the codec itself: it owns per-session state and turns a window
//! of input bytes into a window of output bytes, one bounded step at a time.
//! The bridge never looks inside a session; it only hands sessions back to the
//! engine that created them.
//!
//! An engine is constructed once by the caller and injected into a `Bridge`,
//! a `Compressor`, or a `Decompressor`. There is no process-wide engine table.

pub mod zstd;

#[cfg(test)]
pub(crate) mod mock;

use crate::params::{CompressParams, DecompressParams};

pub use self::zstd::ZstdEngine;

//==================================================================================
// 1. Status Codes
//==================================================================================

/// Compression step status codes. Values at or above
/// `FIRST_SUCCESS_OR_FAILURE_CODE` are terminal.
pub mod compress_status {
    pub const NOT_FINISHED: u32 = 0;
    pub const NEEDS_MORE_INPUT: u32 = 1;
    pub const HAS_MORE_OUTPUT: u32 = 2;
    pub const FIRST_SUCCESS_OR_FAILURE_CODE: u32 = 3;
    pub const SUCCESS: u32 = FIRST_SUCCESS_OR_FAILURE_CODE;
    pub const FAILURE: u32 = 4;
    pub const FAILED_INITIALIZING: u32 = 5;
    pub const INVALID_PARAMETER: u32 = 6;
    pub const OUTPUT_BUF_TOO_SMALL: u32 = 7;
}

/// Decompression step status codes. Values at or above
/// `FIRST_SUCCESS_OR_FAILURE_CODE` are terminal.
pub mod decompress_status {
    pub const NOT_FINISHED: u32 = 0;
    pub const HAS_MORE_OUTPUT: u32 = 1;
    pub const NEEDS_MORE_INPUT: u32 = 2;
    pub const FIRST_SUCCESS_OR_FAILURE_CODE: u32 = 3;
    pub const SUCCESS: u32 = FIRST_SUCCESS_OR_FAILURE_CODE;
    pub const FAILED_INITIALIZING: u32 = 4;
    pub const FAILED_DEST_BUF_TOO_SMALL: u32 = 5;
    pub const FAILED_EXPECTED_MORE_RAW_BYTES: u32 = 6;
    pub const FAILED_BAD_CODE: u32 = 7;
    pub const FAILED_ADLER32: u32 = 8;
    pub const FAILED_BAD_RAW_BLOCK: u32 = 9;
    pub const FAILED_BAD_COMP_BLOCK_SYNC_CHECK: u32 = 10;
    pub const INVALID_PARAMETER: u32 = 11;
}

//==================================================================================
// 2. The Engine Contract
//==================================================================================

/// What a single engine step reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Input bytes taken from the front of the offered input window.
    pub consumed: usize,
    /// Output bytes written to the front of the offered output window.
    pub produced: usize,
    /// Raw status code, interpreted per direction by `bridge::status`.
    pub status: u32,
}

impl StepResult {
    pub fn new(consumed: usize, produced: usize, status: u32) -> Self {
        Self {
            consumed,
            produced,
            status,
        }
    }
}

/// A block codec driven through bounded, resumable steps.
///
/// `*_init` and `*_reinit` return `None` when the engine refuses the request;
/// reinit consumes the old session either way. Step calls must never write past
/// the end of `output`, but the bridge does not take that on trust: any
/// `consumed`/`produced` larger than the offered window is treated as a hard error.
pub trait Engine: Send {
    type CompressSession: Send;
    type DecompressSession: Send;

    /// Version number of the underlying codec library.
    fn version(&self) -> u32;

    fn compress_init(&self, params: &CompressParams) -> Option<Self::CompressSession>;

    /// Restarts a session with the configuration it was created with.
    fn compress_reinit(&self, session: Self::CompressSession) -> Option<Self::CompressSession>;

    fn compress(
        &self,
        session: &mut Self::CompressSession,
        input: &[u8],
        output: &mut [u8],
        no_more_input: bool,
    ) -> StepResult;

    fn decompress_init(&self, params: &DecompressParams) -> Option<Self::DecompressSession>;

    /// Restarts a session under new parameters.
    fn decompress_reinit(
        &self,
        session: Self::DecompressSession,
        params: &DecompressParams,
    ) -> Option<Self::DecompressSession>;

    fn decompress(
        &self,
        session: &mut Self::DecompressSession,
        input: &[u8],
        output: &mut [u8],
        no_more_input: bool,
    ) -> StepResult;
}
