// In: src/bridge/adapter.rs

//! The handle-based adapter.
//!
//! `Bridge` owns one engine and two handle registries, one per direction. Every
//! caller operation resolves its handle first, so a bad handle is reported
//! without the engine ever being called.
//!
//! Lifecycle of a handle:
//! 1. `*_init` validates options, asks the engine for a session and issues a handle.
//! 2. A streaming call runs one block. Once the engine has been stepped, the
//!    session is finished whatever the outcome, and further streaming on it is
//!    rejected as a corrupted handle.
//! 3. `*_reinit` re-arms a session (active or finished) under the same handle.
//!    If the engine refuses, the handle is gone for good.
//! 4. `release_*` drops the session. Dropping the `Bridge` drops them all.

use log::{debug, warn};

use crate::bridge::driver;
use crate::bridge::growth::INITIAL_OUTPUT_CAPACITY;
use crate::bridge::registry::{Handle, HandleRegistry, SessionState};
use crate::config::{CompressOptions, DecompressOptions};
use crate::engine::Engine;
use crate::error::{BridgeError, Direction};
use crate::params::{CompressParams, DecompressParams};

pub struct Bridge<E: Engine> {
    engine: E,
    compressors: HandleRegistry<E::CompressSession>,
    decompressors: HandleRegistry<E::DecompressSession>,
}

impl<E: Engine> Bridge<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            compressors: HandleRegistry::new(),
            decompressors: HandleRegistry::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Version number of the underlying codec library.
    pub fn version(&self) -> u32 {
        self.engine.version()
    }

    //==============================================================================
    // Decompression
    //==============================================================================

    pub fn decompress_init(&mut self, options: &DecompressOptions) -> Result<Handle, BridgeError> {
        let params = DecompressParams::from_options(options)?;
        let session = self.engine.decompress_init(&params).ok_or_else(|| {
            warn!("engine refused decompressor init ({:?})", params);
            BridgeError::EngineInitFailed(Direction::Decompress)
        })?;
        let handle = self.decompressors.register(session);
        debug!(
            "opened decompressor {} (dict_size_log2={}, flags={:?})",
            handle,
            params.dict_size_log2(),
            params.flags()
        );
        Ok(handle)
    }

    /// Re-arms a decompressor under new options. The options are validated
    /// before the handle is touched, so a bad option leaves the session as it was.
    pub fn decompress_reinit(
        &mut self,
        handle: Handle,
        options: &DecompressOptions,
    ) -> Result<Handle, BridgeError> {
        let params = DecompressParams::from_options(options)?;
        let session = self.decompressors.take(handle)?;
        match self.engine.decompress_reinit(session, &params) {
            Some(session) => {
                debug!("re-armed decompressor {}", handle);
                Ok(self.decompressors.restore(handle, session))
            }
            None => {
                warn!("engine refused decompressor reinit, {} dropped", handle);
                Err(BridgeError::EngineReinitFailed(Direction::Decompress))
            }
        }
    }

    /// Decompresses one block into exactly `expected_size` bytes.
    ///
    /// Empty `data` returns empty output and leaves the session active, as does
    /// an `expected_size` that cannot be allocated. Once the engine has been
    /// stepped the session is finished, whatever the outcome.
    pub fn decompress(
        &mut self,
        handle: Handle,
        data: &[u8],
        expected_size: usize,
    ) -> Result<Vec<u8>, BridgeError> {
        let session = self.decompressors.active_mut(handle)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let output = driver::allocate_output(expected_size)?;
        let result = driver::decompress_into(&self.engine, session, data, output);
        self.decompressors.finish(handle);
        result
    }

    pub fn release_decompressor(&mut self, handle: Handle) -> Result<(), BridgeError> {
        self.decompressors.take(handle)?;
        debug!("released decompressor {}", handle);
        Ok(())
    }

    pub fn decompressor_state(&self, handle: Handle) -> Option<SessionState> {
        self.decompressors.state(handle)
    }

    //==============================================================================
    // Compression
    //==============================================================================

    pub fn compress_init(&mut self, options: &CompressOptions) -> Result<Handle, BridgeError> {
        let params = CompressParams::from_options(options)?;
        let session = self.engine.compress_init(&params).ok_or_else(|| {
            warn!("engine refused compressor init ({:?})", params);
            BridgeError::EngineInitFailed(Direction::Compress)
        })?;
        let handle = self.compressors.register(session);
        debug!(
            "opened compressor {} (dict_size_log2={}, level={:?}, helper_threads={})",
            handle,
            params.dict_size_log2(),
            params.level(),
            params.max_helper_threads()
        );
        Ok(handle)
    }

    /// Re-arms a compressor with the parameters it was opened with.
    pub fn compress_reinit(&mut self, handle: Handle) -> Result<Handle, BridgeError> {
        let session = self.compressors.take(handle)?;
        match self.engine.compress_reinit(session) {
            Some(session) => {
                debug!("re-armed compressor {}", handle);
                Ok(self.compressors.restore(handle, session))
            }
            None => {
                warn!("engine refused compressor reinit, {} dropped", handle);
                Err(BridgeError::EngineReinitFailed(Direction::Compress))
            }
        }
    }

    /// Compresses one block. The output is exactly the bytes the engine wrote.
    ///
    /// The session is finished once the engine has been stepped. Failing to
    /// allocate the first output buffer leaves it active.
    pub fn compress(&mut self, handle: Handle, data: &[u8]) -> Result<Vec<u8>, BridgeError> {
        let session = self.compressors.active_mut(handle)?;
        let output = driver::allocate_output(INITIAL_OUTPUT_CAPACITY)?;
        let result = driver::compress_into(&self.engine, session, data, output);
        self.compressors.finish(handle);
        result
    }

    pub fn release_compressor(&mut self, handle: Handle) -> Result<(), BridgeError> {
        self.compressors.take(handle)?;
        debug!("released compressor {}", handle);
        Ok(())
    }

    pub fn compressor_state(&self, handle: Handle) -> Option<SessionState> {
        self.compressors.state(handle)
    }

    /// Number of live sessions across both directions.
    pub fn open_sessions(&self) -> usize {
        self.compressors.len() + self.decompressors.len()
    }
}
