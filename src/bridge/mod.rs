// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` sits between a host (Python, or plain Rust callers) and an engine.
// It never compresses anything itself. It validates options, keeps engine sessions
// behind handles, and drives the engine's bounded steps until a block is done.
//
// Data Flow (Compression):
//
//   1. [Adapter (Bridge::compress)]       -> Receives a Handle and `&[u8]`
//         |
//         `-> resolves the Handle in the compressor registry (CorruptedHandle if unknown)
//
//   2. [Driver (driver::compress_block)]  -> Loops engine steps over the remaining windows
//         |
//         `-> a. `status` classifies every step code
//         |
//         `-> b. `growth` enlarges the output buffer when the engine is out of room
//
//   3. [Adapter]                          -> Marks the session finished, returns `Vec<u8>`
//
//
// Data Flow (Decompression):
//
//   Same shape, except the output buffer is allocated once at the caller's
//   expected size and never grows.
//
// `session` offers the same drivers without handles: stateful `Compressor` /
// `Decompressor` objects and one-shot helpers.
//
// ====================================================================================
pub mod adapter;
pub mod driver;
pub mod growth;
pub mod registry;
pub mod session;
pub mod status;

// --- Handle-Based API ---
pub use adapter::Bridge;
pub use registry::{Handle, SessionState};

// --- Stateful & One-Shot API ---
pub use session::{compress, decompress, Compressor, Decompressor};
