// In: src/params.rs

//! The parameter builder.
//!
//! Turns raw option records from `config` into fully validated parameter records.
//! A `CompressParams` or `DecompressParams` value can only be obtained through
//! `from_options`, so every record an engine receives has already passed the
//! range checks below. Validation is pure: no engine is consulted.

use bitflags::bitflags;

use crate::config::{CompressOptions, DecompressOptions};
use crate::error::BridgeError;

//==================================================================================
// 0. Constants
//==================================================================================

pub const MIN_DICT_SIZE_LOG2: u32 = 15;

#[cfg(target_pointer_width = "64")]
pub const MAX_DICT_SIZE_LOG2: u32 = 29;
#[cfg(not(target_pointer_width = "64"))]
pub const MAX_DICT_SIZE_LOG2: u32 = 26;

pub const DEFAULT_DICT_SIZE_LOG2: u32 = 26;

pub const MAX_HELPER_THREADS: u32 = 64;

pub const DEFAULT_TABLE_UPDATE_RATE: u32 = 8;

/// Raw level codes as they travel across the host boundary.
pub mod level_codes {
    pub const FASTEST: u32 = 0;
    pub const FASTER: u32 = 1;
    pub const DEFAULT: u32 = 2;
    pub const BETTER: u32 = 3;
    pub const UBER: u32 = 4;
    pub const TOTAL_COMP_LEVELS: u32 = 5;
    pub const FORCE_DWORD: u32 = 0xFFFF_FFFF;
}

//==================================================================================
// 1. Typed Values
//==================================================================================

/// The fixed set of accepted compression level codes.
///
/// `TotalLevels` and `ForceDword` are not real levels. They are accepted here so
/// that raw codes which passed validation before keep passing; engines decide
/// whether to honor them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionLevel {
    Fastest,
    Faster,
    Default,
    Better,
    Uber,
    TotalLevels,
    ForceDword,
}

impl CompressionLevel {
    pub fn code(self) -> u32 {
        match self {
            CompressionLevel::Fastest => level_codes::FASTEST,
            CompressionLevel::Faster => level_codes::FASTER,
            CompressionLevel::Default => level_codes::DEFAULT,
            CompressionLevel::Better => level_codes::BETTER,
            CompressionLevel::Uber => level_codes::UBER,
            CompressionLevel::TotalLevels => level_codes::TOTAL_COMP_LEVELS,
            CompressionLevel::ForceDword => level_codes::FORCE_DWORD,
        }
    }

    /// True for the two enumeration sentinels that do not name a real level.
    pub fn is_sentinel(self) -> bool {
        matches!(self, CompressionLevel::TotalLevels | CompressionLevel::ForceDword)
    }
}

impl TryFrom<u32> for CompressionLevel {
    type Error = BridgeError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            level_codes::FASTEST => Ok(CompressionLevel::Fastest),
            level_codes::FASTER => Ok(CompressionLevel::Faster),
            level_codes::DEFAULT => Ok(CompressionLevel::Default),
            level_codes::BETTER => Ok(CompressionLevel::Better),
            level_codes::UBER => Ok(CompressionLevel::Uber),
            level_codes::TOTAL_COMP_LEVELS => Ok(CompressionLevel::TotalLevels),
            level_codes::FORCE_DWORD => Ok(CompressionLevel::ForceDword),
            other => Err(BridgeError::InvalidCompressionLevel(other)),
        }
    }
}

bitflags! {
    /// Decompressor behavior bits, numbered as the engine expects them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DecompressFlags: u32 {
        const OUTPUT_UNBUFFERED = 1;
        const COMPUTE_CHECKSUM = 2;
    }
}

//==================================================================================
// 2. Validated Parameter Records
//==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressParams {
    dict_size_log2: u32,
    level: CompressionLevel,
    table_update_rate: u32,
    max_helper_threads: u32,
    table_max_update_interval: u32,
    table_update_interval_slow_rate: u32,
}

impl CompressParams {
    /// Validates `options`. Checks run in a fixed order: dictionary size,
    /// helper thread count, then level.
    pub fn from_options(options: &CompressOptions) -> Result<Self, BridgeError> {
        check_dict_size(options.dict_size_log2)?;

        if options.max_helper_threads > MAX_HELPER_THREADS {
            return Err(BridgeError::InvalidThreadCount {
                value: options.max_helper_threads,
                max: MAX_HELPER_THREADS,
            });
        }

        let level = CompressionLevel::try_from(options.level)?;

        Ok(Self {
            dict_size_log2: options.dict_size_log2,
            level,
            table_update_rate: options.table_update_rate,
            max_helper_threads: options.max_helper_threads,
            table_max_update_interval: options.table_max_update_interval,
            table_update_interval_slow_rate: options.table_update_interval_slow_rate,
        })
    }

    pub fn dict_size_log2(&self) -> u32 {
        self.dict_size_log2
    }
    pub fn level(&self) -> CompressionLevel {
        self.level
    }
    pub fn table_update_rate(&self) -> u32 {
        self.table_update_rate
    }
    pub fn max_helper_threads(&self) -> u32 {
        self.max_helper_threads
    }
    pub fn table_max_update_interval(&self) -> u32 {
        self.table_max_update_interval
    }
    pub fn table_update_interval_slow_rate(&self) -> u32 {
        self.table_update_interval_slow_rate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressParams {
    dict_size_log2: u32,
    table_update_rate: u32,
    table_max_update_interval: u32,
    table_update_interval_slow_rate: u32,
    flags: DecompressFlags,
}

impl DecompressParams {
    pub fn from_options(options: &DecompressOptions) -> Result<Self, BridgeError> {
        check_dict_size(options.dict_size_log2)?;

        let mut flags = DecompressFlags::empty();
        if options.compute_checksum_during_decompress {
            flags |= DecompressFlags::COMPUTE_CHECKSUM;
        }
        if options.unbuffered_output {
            flags |= DecompressFlags::OUTPUT_UNBUFFERED;
        }

        Ok(Self {
            dict_size_log2: options.dict_size_log2,
            table_update_rate: options.table_update_rate,
            table_max_update_interval: options.table_max_update_interval,
            table_update_interval_slow_rate: options.table_update_interval_slow_rate,
            flags,
        })
    }

    pub fn dict_size_log2(&self) -> u32 {
        self.dict_size_log2
    }
    pub fn table_update_rate(&self) -> u32 {
        self.table_update_rate
    }
    pub fn table_max_update_interval(&self) -> u32 {
        self.table_max_update_interval
    }
    pub fn table_update_interval_slow_rate(&self) -> u32 {
        self.table_update_interval_slow_rate
    }
    pub fn flags(&self) -> DecompressFlags {
        self.flags
    }
}

fn check_dict_size(value: u32) -> Result<(), BridgeError> {
    if !(MIN_DICT_SIZE_LOG2..=MAX_DICT_SIZE_LOG2).contains(&value) {
        return Err(BridgeError::InvalidDictSize {
            value,
            min: MIN_DICT_SIZE_LOG2,
            max: MAX_DICT_SIZE_LOG2,
        });
    }
    Ok(())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_dict_size_in_range_is_accepted() {
        for value in MIN_DICT_SIZE_LOG2..=MAX_DICT_SIZE_LOG2 {
            let opts = CompressOptions {
                dict_size_log2: value,
                ..Default::default()
            };
            assert_eq!(CompressParams::from_options(&opts).unwrap().dict_size_log2(), value);

            let opts = DecompressOptions {
                dict_size_log2: value,
                ..Default::default()
            };
            assert!(DecompressParams::from_options(&opts).is_ok());
        }
    }

    #[test]
    fn test_dict_size_cap_follows_pointer_width() {
        let expected = if cfg!(target_pointer_width = "64") { 29 } else { 26 };
        assert_eq!(MAX_DICT_SIZE_LOG2, expected);

        let opts = CompressOptions {
            dict_size_log2: 29,
            ..Default::default()
        };
        assert_eq!(
            CompressParams::from_options(&opts).is_ok(),
            cfg!(target_pointer_width = "64")
        );
    }

    #[test]
    fn test_dict_size_out_of_range_is_rejected() {
        for value in [0, 1, MIN_DICT_SIZE_LOG2 - 1, MAX_DICT_SIZE_LOG2 + 1, 64, u32::MAX] {
            let opts = CompressOptions {
                dict_size_log2: value,
                ..Default::default()
            };
            assert!(matches!(
                CompressParams::from_options(&opts),
                Err(BridgeError::InvalidDictSize { value: v, .. }) if v == value
            ));

            let opts = DecompressOptions {
                dict_size_log2: value,
                ..Default::default()
            };
            assert!(matches!(
                DecompressParams::from_options(&opts),
                Err(BridgeError::InvalidDictSize { .. })
            ));
        }
    }

    #[test]
    fn test_level_enumeration() {
        let accepted = [0, 1, 2, 3, 4, 5, 0xFFFF_FFFF];
        for raw in accepted {
            let level = CompressionLevel::try_from(raw).unwrap();
            assert_eq!(level.code(), raw);
        }
        for raw in [6, 7, 100, 0xFFFF_FFFE] {
            assert!(matches!(
                CompressionLevel::try_from(raw),
                Err(BridgeError::InvalidCompressionLevel(r)) if r == raw
            ));
        }
        assert!(CompressionLevel::TotalLevels.is_sentinel());
        assert!(!CompressionLevel::Uber.is_sentinel());
    }

    #[test]
    fn test_thread_count_limit() {
        let ok = CompressOptions {
            max_helper_threads: MAX_HELPER_THREADS,
            ..Default::default()
        };
        assert!(CompressParams::from_options(&ok).is_ok());

        let too_many = CompressOptions {
            max_helper_threads: MAX_HELPER_THREADS + 1,
            ..Default::default()
        };
        assert!(matches!(
            CompressParams::from_options(&too_many),
            Err(BridgeError::InvalidThreadCount { value: 65, max: 64 })
        ));
    }

    #[test]
    fn test_dict_size_is_checked_before_level() {
        let opts = CompressOptions {
            dict_size_log2: 3,
            level: 99,
            ..Default::default()
        };
        assert!(matches!(
            CompressParams::from_options(&opts),
            Err(BridgeError::InvalidDictSize { .. })
        ));
    }

    #[test]
    fn test_decompress_flags_follow_booleans() {
        let params = DecompressParams::from_options(&DecompressOptions::default()).unwrap();
        assert_eq!(params.flags(), DecompressFlags::COMPUTE_CHECKSUM);

        let params = DecompressParams::from_options(&DecompressOptions {
            compute_checksum_during_decompress: false,
            unbuffered_output: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.flags(), DecompressFlags::OUTPUT_UNBUFFERED);
        assert_eq!(params.flags().bits(), 1);
    }

    #[test]
    fn test_passthrough_fields_are_untouched() {
        let params = CompressParams::from_options(&CompressOptions {
            table_update_rate: 17,
            table_max_update_interval: 1234,
            table_update_interval_slow_rate: 99,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.table_update_rate(), 17);
        assert_eq!(params.table_max_update_interval(), 1234);
        assert_eq!(params.table_update_interval_slow_rate(), 99);
    }
}
