// In: src/bridge/growth.rs

//! Output buffer growth for compression, where the final size is unknown.

use crate::error::BridgeError;

/// Starting size of a compression output buffer.
pub const INITIAL_OUTPUT_CAPACITY: usize = 2 << 12;

/// Next buffer size after the engine reports a full buffer:
/// `size + size / 8 + 6`.
pub fn next_capacity(size: usize) -> Option<usize> {
    size.checked_add(size >> 3)?.checked_add(6)
}

/// Grows `buf` to the next size, keeping every byte already written.
pub fn grow(buf: &mut Vec<u8>) -> Result<(), BridgeError> {
    let size = buf.len();
    let requested = next_capacity(size).ok_or(BridgeError::OutputAllocation { requested: usize::MAX })?;
    buf.try_reserve_exact(requested - size)
        .map_err(|_| BridgeError::OutputAllocation { requested })?;
    buf.resize(requested, 0);
    Ok(())
}
