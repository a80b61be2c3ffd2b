// In: src/bridge/driver.rs

//! The streaming drivers.
//!
//! Each driver runs one whole block through an engine session: it offers the
//! engine whatever input is still unconsumed and whatever output room is still
//! unfilled, advances both offsets by what the engine reports, and stops at the
//! first terminal status. The complete block is always presented at once, so
//! every step is made with `no_more_input = true`.
//!
//! The engine's accounting is checked, not trusted. Reporting more consumed
//! input or more produced output than the offered windows held is a hard error.

use log::{debug, trace};

use crate::bridge::growth::{self, INITIAL_OUTPUT_CAPACITY};
use crate::bridge::status::{classify_compress, classify_decompress, Outcome};
use crate::engine::Engine;
use crate::error::{BridgeError, Direction};

/// Consecutive non-terminal rounds with no bytes consumed or produced before
/// the driver gives up on the engine.
pub const MAX_IDLE_ROUNDS: usize = 64;

/// Counts rounds that moved no bytes in either direction.
struct IdleGuard {
    direction: Direction,
    idle: usize,
}

impl IdleGuard {
    fn new(direction: Direction) -> Self {
        Self { direction, idle: 0 }
    }

    fn record(&mut self, consumed: usize, produced: usize) -> Result<(), BridgeError> {
        if consumed == 0 && produced == 0 {
            self.idle += 1;
            if self.idle >= MAX_IDLE_ROUNDS {
                return Err(BridgeError::Stalled {
                    direction: self.direction,
                    rounds: self.idle,
                });
            }
        } else {
            self.idle = 0;
        }
        Ok(())
    }
}

/// Zero-filled output buffer of exactly `size` bytes, reserved fallibly.
pub fn allocate_output(size: usize) -> Result<Vec<u8>, BridgeError> {
    let mut output = Vec::new();
    output
        .try_reserve_exact(size)
        .map_err(|_| BridgeError::OutputAllocation { requested: size })?;
    output.resize(size, 0);
    Ok(output)
}

//==================================================================================
// 1. Decompression
//==================================================================================

/// Decompresses one block into a buffer of exactly `expected_size` bytes.
///
/// Empty input yields empty output without calling the engine. On success the
/// buffer is returned at its full `expected_size`, never truncated.
pub fn decompress_block<E: Engine>(
    engine: &E,
    session: &mut E::DecompressSession,
    input: &[u8],
    expected_size: usize,
) -> Result<Vec<u8>, BridgeError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let output = allocate_output(expected_size)?;
    decompress_into(engine, session, input, output)
}

/// Decompresses one non-empty block into `output`, which already has the
/// expected size. The engine is always stepped at least once.
pub fn decompress_into<E: Engine>(
    engine: &E,
    session: &mut E::DecompressSession,
    input: &[u8],
    mut output: Vec<u8>,
) -> Result<Vec<u8>, BridgeError> {
    let mut in_offset = 0usize;
    let mut out_offset = 0usize;
    let mut remaining = output.len();
    let mut rounds = 0usize;
    let mut guard = IdleGuard::new(Direction::Decompress);

    loop {
        let in_window = &input[in_offset..];
        let available = in_window.len();
        let step = engine.decompress(session, in_window, &mut output[out_offset..], true);
        rounds += 1;

        if step.consumed > available {
            return Err(BridgeError::InputOverrun {
                direction: Direction::Decompress,
                consumed: step.consumed,
                available,
            });
        }
        if step.produced > remaining {
            return Err(BridgeError::OutputOverrun {
                direction: Direction::Decompress,
                produced: step.produced,
                remaining,
            });
        }

        in_offset += step.consumed;
        out_offset += step.produced;
        remaining -= step.produced;
        trace!(
            "decompress round {}: consumed={} produced={} remaining={} status={}",
            rounds,
            step.consumed,
            step.produced,
            remaining,
            step.status
        );

        match classify_decompress(step.status) {
            Outcome::Success => {
                debug!(
                    "decompressed {} -> {} bytes in {} rounds",
                    in_offset, out_offset, rounds
                );
                return Ok(output);
            }
            Outcome::Failure(status) => {
                debug!("decompression failed after {} rounds, status {}", rounds, status);
                return Err(BridgeError::DecompressionFailed { status });
            }
            Outcome::Continue | Outcome::NeedsMoreOutput => {
                guard.record(step.consumed, step.produced)?;
            }
        }
    }
}

//==================================================================================
// 2. Compression
//==================================================================================

/// Compresses one block into a growable buffer, returned truncated to exactly
/// the bytes the engine produced.
pub fn compress_block<E: Engine>(
    engine: &E,
    session: &mut E::CompressSession,
    input: &[u8],
) -> Result<Vec<u8>, BridgeError> {
    let output = allocate_output(INITIAL_OUTPUT_CAPACITY)?;
    compress_into(engine, session, input, output)
}

/// Compresses one block starting from the buffer `output`, growing it as the
/// engine asks for room.
pub fn compress_into<E: Engine>(
    engine: &E,
    session: &mut E::CompressSession,
    input: &[u8],
    mut output: Vec<u8>,
) -> Result<Vec<u8>, BridgeError> {
    let mut in_offset = 0usize;
    let mut out_offset = 0usize;
    let mut rounds = 0usize;
    let mut growths = 0usize;
    let mut guard = IdleGuard::new(Direction::Compress);

    loop {
        let in_window = &input[in_offset..];
        let available = in_window.len();
        let window = output.len() - out_offset;
        let step = engine.compress(session, in_window, &mut output[out_offset..], true);
        rounds += 1;

        if step.consumed > available {
            return Err(BridgeError::InputOverrun {
                direction: Direction::Compress,
                consumed: step.consumed,
                available,
            });
        }
        if step.produced > window {
            return Err(BridgeError::OutputOverrun {
                direction: Direction::Compress,
                produced: step.produced,
                remaining: window,
            });
        }

        in_offset += step.consumed;
        out_offset += step.produced;
        trace!(
            "compress round {}: consumed={} produced={} capacity={} status={}",
            rounds,
            step.consumed,
            step.produced,
            output.len(),
            step.status
        );

        match classify_compress(step.status) {
            Outcome::Success => {
                output.truncate(out_offset);
                debug!(
                    "compressed {} -> {} bytes in {} rounds ({} growths)",
                    in_offset, out_offset, rounds, growths
                );
                return Ok(output);
            }
            Outcome::Failure(status) => {
                debug!("compression failed after {} rounds, status {}", rounds, status);
                return Err(BridgeError::CompressionFailed { status });
            }
            Outcome::NeedsMoreOutput => {
                guard.record(step.consumed, step.produced)?;
                growth::grow(&mut output)?;
                growths += 1;
            }
            Outcome::Continue => {
                guard.record(step.consumed, step.produced)?;
            }
        }
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
