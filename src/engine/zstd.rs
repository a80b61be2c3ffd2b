// In: src/engine/zstd.rs

//! The built-in engine: Zstandard, driven through the raw streaming
//! `Operation` interface of the `zstd` crate.
//!
//! This is a safe, panic-free wrapper. Every step runs the codec over exactly
//! the windows it is handed and reports what it took and what it wrote; the
//! zstd return hints are translated into the bridge's status codes.
//!
//! Parameter mapping:
//! - `dict_size_log2` becomes the frame window log (and the decoder's window limit).
//! - The five real levels map onto zstd levels 1, 3, 9, 15 and 19. The two
//!   enumeration sentinels are refused at init.
//! - `max_helper_threads` becomes the zstd worker count.
//! - Frames always carry a content checksum, which the decoder always verifies.
//!   The table tuning fields and the unbuffered flag have no zstd counterpart.

use log::{debug, trace, warn};
use zstd::stream::raw::{CParameter, DParameter, Decoder, Encoder, InBuffer, Operation, OutBuffer};

use crate::engine::{compress_status, decompress_status, Engine, StepResult};
use crate::params::{CompressParams, CompressionLevel, DecompressParams};

//==================================================================================
// 1. Sessions
//==================================================================================

pub struct ZstdCompressSession {
    encoder: Encoder<'static>,
    /// True until the first step of the current frame.
    fresh: bool,
}

pub struct ZstdDecompressSession {
    decoder: Decoder<'static>,
}

fn zstd_level(level: CompressionLevel) -> Option<i32> {
    match level {
        CompressionLevel::Fastest => Some(1),
        CompressionLevel::Faster => Some(3),
        CompressionLevel::Default => Some(9),
        CompressionLevel::Better => Some(15),
        CompressionLevel::Uber => Some(19),
        CompressionLevel::TotalLevels | CompressionLevel::ForceDword => None,
    }
}

fn build_encoder(params: &CompressParams) -> Option<Encoder<'static>> {
    let Some(level) = zstd_level(params.level()) else {
        warn!(
            "zstd engine refuses sentinel compression level {}",
            params.level().code()
        );
        return None;
    };

    let mut encoder = Encoder::new(level)
        .map_err(|e| warn!("zstd encoder allocation failed: {}", e))
        .ok()?;

    let settings = [
        CParameter::WindowLog(params.dict_size_log2()),
        CParameter::ChecksumFlag(true),
        CParameter::NbWorkers(params.max_helper_threads()),
    ];
    for setting in settings {
        if let Err(e) = encoder.set_parameter(setting) {
            warn!("zstd encoder rejected a parameter: {}", e);
            return None;
        }
    }
    Some(encoder)
}

fn build_decoder(params: &DecompressParams) -> Option<Decoder<'static>> {
    let mut decoder = Decoder::new()
        .map_err(|e| warn!("zstd decoder allocation failed: {}", e))
        .ok()?;
    if let Err(e) = decoder.set_parameter(DParameter::WindowLogMax(params.dict_size_log2())) {
        warn!("zstd decoder rejected window limit: {}", e);
        return None;
    }
    Some(decoder)
}

//==================================================================================
// 2. The Engine
//==================================================================================

/// Stateless handle to the linked libzstd. Cheap to construct and copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdEngine;

impl ZstdEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for ZstdEngine {
    type CompressSession = ZstdCompressSession;
    type DecompressSession = ZstdDecompressSession;

    fn version(&self) -> u32 {
        zstd::zstd_safe::version_number()
    }

    fn compress_init(&self, params: &CompressParams) -> Option<ZstdCompressSession> {
        let encoder = build_encoder(params)?;
        Some(ZstdCompressSession {
            encoder,
            fresh: true,
        })
    }

    fn compress_reinit(&self, mut session: ZstdCompressSession) -> Option<ZstdCompressSession> {
        // Resetting the session keeps every parameter already set on the context.
        if let Err(e) = session.encoder.reinit() {
            warn!("zstd encoder reset failed: {}", e);
            return None;
        }
        session.fresh = true;
        Some(session)
    }

    fn compress(
        &self,
        session: &mut ZstdCompressSession,
        input: &[u8],
        output: &mut [u8],
        no_more_input: bool,
    ) -> StepResult {
        let available = input.len();
        let window = output.len();

        if session.fresh && no_more_input {
            // The whole block is known up front, so let zstd size its tables for it.
            if let Err(e) = session.encoder.set_pledged_src_size(Some(available as u64)) {
                debug!("zstd rejected pledged size {}: {}", available, e);
                return StepResult::new(0, 0, compress_status::FAILURE);
            }
        }
        session.fresh = false;

        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);

        if available > 0 {
            if let Err(e) = session.encoder.run(&mut in_buf, &mut out_buf) {
                debug!("zstd compress step failed: {}", e);
                return StepResult::new(in_buf.pos(), out_buf.pos(), compress_status::FAILURE);
            }
        }

        let input_drained = in_buf.pos() == available;
        let mut frame_done = false;
        if no_more_input && input_drained {
            match session.encoder.finish(&mut out_buf, true) {
                Ok(remaining) => frame_done = remaining == 0,
                Err(e) => {
                    debug!("zstd frame epilogue failed: {}", e);
                    return StepResult::new(in_buf.pos(), out_buf.pos(), compress_status::FAILURE);
                }
            }
        }

        let consumed = in_buf.pos();
        let produced = out_buf.pos();
        let status = if frame_done {
            compress_status::SUCCESS
        } else if produced == window {
            compress_status::HAS_MORE_OUTPUT
        } else if input_drained && !no_more_input {
            compress_status::NEEDS_MORE_INPUT
        } else {
            compress_status::NOT_FINISHED
        };
        trace!(
            "zstd compress step: consumed={} produced={} window={} status={}",
            consumed,
            produced,
            window,
            status
        );
        StepResult::new(consumed, produced, status)
    }

    fn decompress_init(&self, params: &DecompressParams) -> Option<ZstdDecompressSession> {
        let decoder = build_decoder(params)?;
        Some(ZstdDecompressSession { decoder })
    }

    fn decompress_reinit(
        &self,
        _session: ZstdDecompressSession,
        params: &DecompressParams,
    ) -> Option<ZstdDecompressSession> {
        // New parameters may change the window limit, so start from a fresh context.
        self.decompress_init(params)
    }

    fn decompress(
        &self,
        session: &mut ZstdDecompressSession,
        input: &[u8],
        output: &mut [u8],
        no_more_input: bool,
    ) -> StepResult {
        let available = input.len();
        let window = output.len();

        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);
        let result = session.decoder.run(&mut in_buf, &mut out_buf);

        let consumed = in_buf.pos();
        let produced = out_buf.pos();
        let status = match result {
            Ok(0) => decompress_status::SUCCESS,
            Ok(_) if produced == window => {
                if consumed == 0 && produced == 0 {
                    decompress_status::FAILED_DEST_BUF_TOO_SMALL
                } else {
                    decompress_status::HAS_MORE_OUTPUT
                }
            }
            Ok(_) if consumed == available => {
                if no_more_input {
                    decompress_status::FAILED_EXPECTED_MORE_RAW_BYTES
                } else {
                    decompress_status::NEEDS_MORE_INPUT
                }
            }
            Ok(_) => decompress_status::NOT_FINISHED,
            Err(e) => {
                debug!("zstd decompress step failed: {}", e);
                decompress_status::FAILED_BAD_CODE
            }
        };
        trace!(
            "zstd decompress step: consumed={} produced={} window={} status={}",
            consumed,
            produced,
            window,
            status
        );
        StepResult::new(consumed, produced, status)
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompressOptions, DecompressOptions};

    fn compress_params(level: u32) -> CompressParams {
        CompressParams::from_options(&CompressOptions {
            level,
            ..Default::default()
        })
        .unwrap()
    }

    fn decompress_params() -> DecompressParams {
        DecompressParams::from_options(&DecompressOptions::default()).unwrap()
    }

    /// Compresses `data` in a single step with plenty of output room.
    fn one_step_compress(engine: &ZstdEngine, data: &[u8]) -> Vec<u8> {
        let mut session = engine.compress_init(&compress_params(2)).unwrap();
        let mut out = vec![0u8; data.len() + 1024];
        let step = engine.compress(&mut session, data, &mut out, true);
        assert_eq!(step.status, compress_status::SUCCESS);
        assert_eq!(step.consumed, data.len());
        out.truncate(step.produced);
        out
    }

    #[test]
    fn test_version_is_reported() {
        assert!(ZstdEngine::new().version() > 0);
    }

    #[test]
    fn test_single_step_roundtrip() {
        let engine = ZstdEngine::new();
        let data = b"hello world, this is a test of the zstd engine. hello world, this is a test.";
        let compressed = one_step_compress(&engine, data);

        let mut session = engine.decompress_init(&decompress_params()).unwrap();
        let mut out = vec![0u8; data.len()];
        let step = engine.decompress(&mut session, &compressed, &mut out, true);
        assert_eq!(step.status, decompress_status::SUCCESS);
        assert_eq!(step.produced, data.len());
        assert_eq!(&out[..], &data[..]);
    }

    #[test]
    fn test_tiny_output_window_reports_more_output() {
        let engine = ZstdEngine::new();
        let mut session = engine.compress_init(&compress_params(2)).unwrap();
        let data = vec![7u8; 4096];
        let mut out = [0u8; 4];
        let step = engine.compress(&mut session, &data, &mut out, true);
        assert_eq!(step.produced, 4);
        assert_eq!(step.status, compress_status::HAS_MORE_OUTPUT);
    }

    #[test]
    fn test_sentinel_levels_are_refused() {
        let engine = ZstdEngine::new();
        assert!(engine.compress_init(&compress_params(5)).is_none());
        assert!(engine.compress_init(&compress_params(0xFFFF_FFFF)).is_none());
        assert!(engine.compress_init(&compress_params(4)).is_some());
    }

    #[test]
    fn test_truncated_stream_expects_more_bytes() {
        let engine = ZstdEngine::new();
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let compressed = one_step_compress(&engine, &data);

        let mut session = engine.decompress_init(&decompress_params()).unwrap();
        let mut out = vec![0u8; data.len()];
        let cut = &compressed[..compressed.len() / 2];
        let step = engine.decompress(&mut session, cut, &mut out, true);
        assert_eq!(step.status, decompress_status::FAILED_EXPECTED_MORE_RAW_BYTES);
    }

    #[test]
    fn test_garbage_is_a_bad_code() {
        let engine = ZstdEngine::new();
        let mut session = engine.decompress_init(&decompress_params()).unwrap();
        let mut out = vec![0u8; 64];
        let step = engine.decompress(&mut session, &[1, 2, 3, 4, 5, 6, 7, 8], &mut out, true);
        assert_eq!(step.status, decompress_status::FAILED_BAD_CODE);
    }

    #[test]
    fn test_reinit_starts_a_new_frame() {
        let engine = ZstdEngine::new();
        let mut session = engine.compress_init(&compress_params(1)).unwrap();
        let mut first = vec![0u8; 256];
        let step = engine.compress(&mut session, b"first block", &mut first, true);
        assert_eq!(step.status, compress_status::SUCCESS);
        first.truncate(step.produced);

        let mut session = engine.compress_reinit(session).unwrap();
        let mut second = vec![0u8; 256];
        let step = engine.compress(&mut session, b"first block", &mut second, true);
        assert_eq!(step.status, compress_status::SUCCESS);
        second.truncate(step.produced);

        assert_eq!(first, second);
    }
}
