//! This module serves as the public API for the Foreign Function Interface (FFI) layer.
//!
//! Its only job is to declare the host-language bindings. Currently that is the
//! Python extension module, compiled in with the `python` feature.

//==================================================================================
// 1. Module Declarations
//==================================================================================
/// Contains all logic for interfacing with the Python/CPython ecosystem.
pub mod python;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
// `lib.rs` assembles the `_lzham` module from these.
pub use self::python::{
    compress_init_py, compress_py, compress_reinit_py, compress_release_py, decompress_init_py,
    decompress_py, decompress_reinit_py, decompress_release_py, enable_verbose_logging_py,
    get_version_py, oneshot_compress_py, oneshot_decompress_py, PyLzhamCompressor,
    PyLzhamDecompressor,
};
