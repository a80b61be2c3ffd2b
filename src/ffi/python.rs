// In: src/ffi/python.rs

use std::sync::{Mutex, OnceLock};

use log::LevelFilter;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};

use crate::bridge::{self, Bridge, Compressor, Decompressor, Handle};
use crate::config::{CompressFilters, CompressOptions, DecompressFilters, DecompressOptions};
use crate::engine::ZstdEngine;
use crate::error::BridgeError;
use crate::observability;
use crate::params::{level_codes, DEFAULT_DICT_SIZE_LOG2, DEFAULT_TABLE_UPDATE_RATE};

//==================================================================================
// 0. Process-Wide Adapter
//==================================================================================

/// Handles handed to Python index into this one adapter.
static BRIDGE: OnceLock<Mutex<Bridge<ZstdEngine>>> = OnceLock::new();

fn with_bridge<T>(
    f: impl FnOnce(&mut Bridge<ZstdEngine>) -> Result<T, BridgeError>,
) -> PyResult<T> {
    let lock = BRIDGE.get_or_init(|| Mutex::new(Bridge::new(ZstdEngine::new())));
    let mut bridge = lock
        .lock()
        .map_err(|_| PyValueError::new_err("lzham adapter lock poisoned by an earlier panic"))?;
    Ok(f(&mut bridge)?)
}

/// Reads `key` from a filters dict. Missing keys and `None` values both mean "unset".
fn filter_value<'py, T: FromPyObject<'py>>(
    filters: &Bound<'py, PyDict>,
    key: &str,
) -> PyResult<Option<T>> {
    match filters.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

fn compress_filters(filters: Option<&Bound<'_, PyDict>>) -> PyResult<CompressFilters> {
    let Some(filters) = filters else {
        return Ok(CompressFilters::default());
    };
    Ok(CompressFilters {
        dict_size_log2: filter_value(filters, "dict_size_log2")?,
        level: filter_value(filters, "level")?,
        table_update_rate: filter_value(filters, "table_update_rate")?,
        max_helper_threads: filter_value(filters, "max_helper_threads")?,
        table_max_update_interval: filter_value(filters, "table_max_update_interval")?,
        table_update_interval_slow_rate: filter_value(filters, "table_update_interval_slow_rate")?,
    })
}

fn decompress_filters(filters: Option<&Bound<'_, PyDict>>) -> PyResult<DecompressFilters> {
    let Some(filters) = filters else {
        return Ok(DecompressFilters::default());
    };
    Ok(DecompressFilters {
        dict_size_log2: filter_value(filters, "dict_size_log2")?,
        table_update_rate: filter_value(filters, "table_update_rate")?,
        table_max_update_interval: filter_value(filters, "table_max_update_interval")?,
        table_update_interval_slow_rate: filter_value(filters, "table_update_interval_slow_rate")?,
        compute_checksum_during_decompress: filter_value(filters, "compute_adler32_during_decomp")?,
        unbuffered_output: filter_value(filters, "unbuffered_decompression")?,
    })
}

//==================================================================================
// I. Handle-Based Functions
//==================================================================================

#[pyfunction]
#[pyo3(name = "get_lzham_version")]
pub fn get_version_py() -> PyResult<u32> {
    with_bridge(|bridge| Ok(bridge.version()))
}

#[pyfunction]
#[pyo3(
    name = "lzham_decompress_init",
    signature = (
        dict_size_log2 = DEFAULT_DICT_SIZE_LOG2,
        table_update_rate = DEFAULT_TABLE_UPDATE_RATE,
        table_max_update_interval = 0,
        table_update_interval_slow_rate = 0,
        compute_adler32_during_decomp = true,
        unbuffered_decompression = false
    )
)]
pub fn decompress_init_py(
    dict_size_log2: u32,
    table_update_rate: u32,
    table_max_update_interval: u32,
    table_update_interval_slow_rate: u32,
    compute_adler32_during_decomp: bool,
    unbuffered_decompression: bool,
) -> PyResult<u64> {
    let options = DecompressOptions {
        dict_size_log2,
        table_update_rate,
        table_max_update_interval,
        table_update_interval_slow_rate,
        compute_checksum_during_decompress: compute_adler32_during_decomp,
        unbuffered_output: unbuffered_decompression,
    };
    with_bridge(|bridge| bridge.decompress_init(&options)).map(Handle::as_raw)
}

#[pyfunction]
#[pyo3(
    name = "lzham_decompress_reinit",
    signature = (
        decomp_state_ptr,
        dict_size_log2 = DEFAULT_DICT_SIZE_LOG2,
        table_update_rate = DEFAULT_TABLE_UPDATE_RATE,
        table_max_update_interval = 0,
        table_update_interval_slow_rate = 0,
        compute_adler32_during_decomp = true,
        unbuffered_decompression = false
    )
)]
pub fn decompress_reinit_py(
    decomp_state_ptr: u64,
    dict_size_log2: u32,
    table_update_rate: u32,
    table_max_update_interval: u32,
    table_update_interval_slow_rate: u32,
    compute_adler32_during_decomp: bool,
    unbuffered_decompression: bool,
) -> PyResult<u64> {
    let options = DecompressOptions {
        dict_size_log2,
        table_update_rate,
        table_max_update_interval,
        table_update_interval_slow_rate,
        compute_checksum_during_decompress: compute_adler32_during_decomp,
        unbuffered_output: unbuffered_decompression,
    };
    let handle = Handle::from_raw(decomp_state_ptr);
    with_bridge(|bridge| bridge.decompress_reinit(handle, &options)).map(Handle::as_raw)
}

#[pyfunction]
#[pyo3(
    name = "lzham_decompress",
    signature = (decomp_state_ptr, compressed_data, decompressed_size)
)]
pub fn decompress_py<'py>(
    py: Python<'py>,
    decomp_state_ptr: u64,
    compressed_data: &[u8],
    decompressed_size: usize,
) -> PyResult<Bound<'py, PyBytes>> {
    let handle = Handle::from_raw(decomp_state_ptr);
    let out = py.allow_threads(|| {
        with_bridge(|bridge| bridge.decompress(handle, compressed_data, decompressed_size))
    })?;
    Ok(PyBytes::new_bound(py, &out))
}

#[pyfunction]
#[pyo3(
    name = "lzham_compress_init",
    signature = (
        dict_size_log2 = DEFAULT_DICT_SIZE_LOG2,
        level = level_codes::DEFAULT,
        table_update_rate = DEFAULT_TABLE_UPDATE_RATE,
        max_helper_threads = 0,
        table_max_update_interval = 0,
        table_update_interval_slow_rate = 0
    )
)]
pub fn compress_init_py(
    dict_size_log2: u32,
    level: u32,
    table_update_rate: u32,
    max_helper_threads: u32,
    table_max_update_interval: u32,
    table_update_interval_slow_rate: u32,
) -> PyResult<u64> {
    let options = CompressOptions {
        dict_size_log2,
        level,
        table_update_rate,
        max_helper_threads,
        table_max_update_interval,
        table_update_interval_slow_rate,
    };
    with_bridge(|bridge| bridge.compress_init(&options)).map(Handle::as_raw)
}

#[pyfunction]
#[pyo3(name = "lzham_compress_reinit", signature = (comp_state_ptr))]
pub fn compress_reinit_py(comp_state_ptr: u64) -> PyResult<u64> {
    let handle = Handle::from_raw(comp_state_ptr);
    with_bridge(|bridge| bridge.compress_reinit(handle)).map(Handle::as_raw)
}

#[pyfunction]
#[pyo3(name = "lzham_compress", signature = (comp_state_ptr, data))]
pub fn compress_py<'py>(
    py: Python<'py>,
    comp_state_ptr: u64,
    data: &[u8],
) -> PyResult<Bound<'py, PyBytes>> {
    let handle = Handle::from_raw(comp_state_ptr);
    let out = py.allow_threads(|| with_bridge(|bridge| bridge.compress(handle, data)))?;
    Ok(PyBytes::new_bound(py, &out))
}

#[pyfunction]
#[pyo3(name = "lzham_compress_release", signature = (comp_state_ptr))]
pub fn compress_release_py(comp_state_ptr: u64) -> PyResult<()> {
    with_bridge(|bridge| bridge.release_compressor(Handle::from_raw(comp_state_ptr)))
}

#[pyfunction]
#[pyo3(name = "lzham_decompress_release", signature = (decomp_state_ptr))]
pub fn decompress_release_py(decomp_state_ptr: u64) -> PyResult<()> {
    with_bridge(|bridge| bridge.release_decompressor(Handle::from_raw(decomp_state_ptr)))
}

//==================================================================================
// II. Stateful Classes
//==================================================================================

#[pyclass(name = "LZHAMCompressor", module = "lzham")]
pub struct PyLzhamCompressor {
    inner: Compressor<ZstdEngine>,
}

#[pymethods]
impl PyLzhamCompressor {
    /// Creates a compressor from an optional dict of keyword filters.
    #[new]
    #[pyo3(signature = (filters = None))]
    fn new(filters: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let options = compress_filters(filters)?.apply(CompressOptions::default());
        let inner = Compressor::new(ZstdEngine::new(), &options)?;
        Ok(Self { inner })
    }

    /// Compresses one block. Each call produces an independent stream.
    fn compress<'py>(&mut self, py: Python<'py>, data: &[u8]) -> PyResult<Bound<'py, PyBytes>> {
        let inner = &mut self.inner;
        let out = py.allow_threads(|| inner.compress(data))?;
        Ok(PyBytes::new_bound(py, &out))
    }
}

#[pyclass(name = "LZHAMDecompressor", module = "lzham")]
pub struct PyLzhamDecompressor {
    inner: Decompressor<ZstdEngine>,
}

#[pymethods]
impl PyLzhamDecompressor {
    #[new]
    #[pyo3(signature = (filters = None))]
    fn new(filters: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let options = decompress_filters(filters)?.apply(DecompressOptions::default());
        let inner = Decompressor::new(ZstdEngine::new(), &options)?;
        Ok(Self { inner })
    }

    /// Re-arms the decompressor, overlaying any filters given.
    #[pyo3(signature = (filters = None))]
    fn reinit(&mut self, filters: Option<&Bound<'_, PyDict>>) -> PyResult<()> {
        let filters = filters.map(|f| decompress_filters(Some(f))).transpose()?;
        Ok(self.inner.reinit(filters)?)
    }

    fn decompress<'py>(
        &mut self,
        py: Python<'py>,
        data: &[u8],
        uncompressed_size: usize,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let inner = &mut self.inner;
        let out = py.allow_threads(|| inner.decompress(data, uncompressed_size))?;
        Ok(PyBytes::new_bound(py, &out))
    }
}

//==================================================================================
// III. One-Shot Functions
//==================================================================================

#[pyfunction]
#[pyo3(name = "compress", signature = (data, filters = None))]
pub fn oneshot_compress_py<'py>(
    py: Python<'py>,
    data: &[u8],
    filters: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyBytes>> {
    let options = compress_filters(filters)?.apply(CompressOptions::default());
    let out = py.allow_threads(|| bridge::compress(ZstdEngine::new(), data, &options))?;
    Ok(PyBytes::new_bound(py, &out))
}

#[pyfunction]
#[pyo3(name = "decompress", signature = (data, uncompressed_size, filters = None))]
pub fn oneshot_decompress_py<'py>(
    py: Python<'py>,
    data: &[u8],
    uncompressed_size: usize,
    filters: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyBytes>> {
    let options = decompress_filters(filters)?.apply(DecompressOptions::default());
    let out = py.allow_threads(|| {
        bridge::decompress(ZstdEngine::new(), data, uncompressed_size, &options)
    })?;
    Ok(PyBytes::new_bound(py, &out))
}

//==================================================================================
// IV. Logging
//==================================================================================

/// Turns on the library's log output, optionally appending to `log_file`.
#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None, level = "info"))]
pub fn enable_verbose_logging_py(log_file: Option<String>, level: &str) -> PyResult<bool> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| PyValueError::new_err(format!("Unknown log level '{}'", level)))?;
    Ok(observability::init_logging(level, log_file.as_deref())?)
}
