// In: src/bridge/status.rs

//! The status classifier: maps raw engine status codes onto what the
//! streaming loop should do next.

use crate::engine::{compress_status, decompress_status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Non-terminal: call the engine again as-is.
    Continue,
    /// Non-terminal, compression only: the output buffer is full.
    NeedsMoreOutput,
    /// Terminal success.
    Success,
    /// Terminal failure carrying the raw code.
    Failure(u32),
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, Outcome::Success | Outcome::Failure(_))
    }
}

pub fn classify_compress(code: u32) -> Outcome {
    if code >= compress_status::FIRST_SUCCESS_OR_FAILURE_CODE {
        if code == compress_status::SUCCESS {
            Outcome::Success
        } else {
            Outcome::Failure(code)
        }
    } else if code == compress_status::HAS_MORE_OUTPUT {
        Outcome::NeedsMoreOutput
    } else {
        Outcome::Continue
    }
}

/// Decompression output size is fixed up front, so there is no
/// needs-more-output outcome here: every non-terminal code means "again".
pub fn classify_decompress(code: u32) -> Outcome {
    if code >= decompress_status::FIRST_SUCCESS_OR_FAILURE_CODE {
        if code == decompress_status::SUCCESS {
            Outcome::Success
        } else {
            Outcome::Failure(code)
        }
    } else {
        Outcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_codes() {
        assert_eq!(classify_compress(compress_status::NOT_FINISHED), Outcome::Continue);
        assert_eq!(classify_compress(compress_status::NEEDS_MORE_INPUT), Outcome::Continue);
        assert_eq!(classify_compress(compress_status::HAS_MORE_OUTPUT), Outcome::NeedsMoreOutput);
        assert_eq!(classify_compress(compress_status::SUCCESS), Outcome::Success);
        for code in [4, 5, 6, 7, 42] {
            assert_eq!(classify_compress(code), Outcome::Failure(code));
        }
    }

    #[test]
    fn test_decompress_codes() {
        for code in 0..decompress_status::FIRST_SUCCESS_OR_FAILURE_CODE {
            assert_eq!(classify_decompress(code), Outcome::Continue);
        }
        assert_eq!(classify_decompress(decompress_status::SUCCESS), Outcome::Success);
        for code in 4..=11 {
            let outcome = classify_decompress(code);
            assert_eq!(outcome, Outcome::Failure(code));
            assert!(outcome.is_terminal());
        }
    }
}
