//! This file is the root of the `lzham_bridge` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring the top-level modules (`bridge`, `engine`, `params`, etc.) and
//!     re-exporting the types a caller needs.
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python (with the `python` feature).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod observability;
pub mod params;

#[cfg(feature = "python")]
mod ffi;

pub use bridge::{compress, decompress, Bridge, Compressor, Decompressor, Handle, SessionState};
pub use config::{CompressFilters, CompressOptions, DecompressFilters, DecompressOptions};
pub use engine::{Engine, StepResult, ZstdEngine};
pub use error::{BridgeError, Direction};
pub use params::{CompressParams, CompressionLevel, DecompressFlags, DecompressParams};

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `_lzham` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn _lzham(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // --- Handle-based API ---
    m.add_function(wrap_pyfunction!(ffi::get_version_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::decompress_init_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::decompress_reinit_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::decompress_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::decompress_release_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::compress_init_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::compress_reinit_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::compress_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::compress_release_py, m)?)?;

    // --- Stateful classes and one-shot helpers ---
    m.add_class::<ffi::PyLzhamCompressor>()?;
    m.add_class::<ffi::PyLzhamDecompressor>()?;
    m.add_function(wrap_pyfunction!(ffi::oneshot_compress_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::oneshot_decompress_py, m)?)?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    // --- Logging ---
    m.add_function(wrap_pyfunction!(ffi::enable_verbose_logging_py, m)?)?;

    Ok(())
}
