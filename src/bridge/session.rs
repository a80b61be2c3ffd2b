// In: src/bridge/session.rs

//! Stateful compressor/decompressor objects and one-shot helpers.
//!
//! These own their engine and session directly instead of going through a
//! handle registry. Each object may be fed any number of independent blocks:
//! before every block after the first, the session is re-armed automatically.

use log::warn;

use crate::bridge::driver;
use crate::config::{CompressOptions, DecompressFilters, DecompressOptions};
use crate::engine::Engine;
use crate::error::{BridgeError, Direction};
use crate::params::{CompressParams, DecompressParams};

//==================================================================================
// 1. Compressor
//==================================================================================

pub struct Compressor<E: Engine> {
    engine: E,
    params: CompressParams,
    session: Option<E::CompressSession>,
    used: bool,
}

impl<E: Engine> Compressor<E> {
    pub fn new(engine: E, options: &CompressOptions) -> Result<Self, BridgeError> {
        let params = CompressParams::from_options(options)?;
        let session = engine
            .compress_init(&params)
            .ok_or(BridgeError::EngineInitFailed(Direction::Compress))?;
        Ok(Self {
            engine,
            params,
            session: Some(session),
            used: false,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn params(&self) -> &CompressParams {
        &self.params
    }

    /// Compresses `data` as one self-contained block.
    pub fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, BridgeError> {
        let mut session = self.ready_session()?;
        let result = driver::compress_block(&self.engine, &mut session, data);
        self.session = Some(session);
        self.used = true;
        result
    }

    fn ready_session(&mut self) -> Result<E::CompressSession, BridgeError> {
        let rearmed = match self.session.take() {
            Some(session) if self.used => self.engine.compress_reinit(session),
            Some(session) => Some(session),
            // A previous reinit was refused; start over from the parameters.
            None => self.engine.compress_init(&self.params),
        };
        rearmed.ok_or_else(|| {
            warn!("engine refused to re-arm compressor");
            BridgeError::EngineReinitFailed(Direction::Compress)
        })
    }
}

//==================================================================================
// 2. Decompressor
//==================================================================================

pub struct Decompressor<E: Engine> {
    engine: E,
    options: DecompressOptions,
    params: DecompressParams,
    session: Option<E::DecompressSession>,
    used: bool,
}

impl<E: Engine> Decompressor<E> {
    pub fn new(engine: E, options: &DecompressOptions) -> Result<Self, BridgeError> {
        let params = DecompressParams::from_options(options)?;
        let session = engine
            .decompress_init(&params)
            .ok_or(BridgeError::EngineInitFailed(Direction::Decompress))?;
        Ok(Self {
            engine,
            options: *options,
            params,
            session: Some(session),
            used: false,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn options(&self) -> &DecompressOptions {
        &self.options
    }

    /// Re-arms the session now, optionally overlaying new options on the
    /// current ones. Invalid overrides leave the decompressor untouched.
    pub fn reinit(&mut self, filters: Option<DecompressFilters>) -> Result<(), BridgeError> {
        if let Some(filters) = filters {
            let options = filters.apply(self.options);
            self.params = DecompressParams::from_options(&options)?;
            self.options = options;
        }
        let session = self.rearm()?;
        self.session = Some(session);
        self.used = false;
        Ok(())
    }

    /// Decompresses one block into exactly `size` bytes. Empty `data` returns
    /// empty output without touching the session.
    pub fn decompress(&mut self, data: &[u8], size: usize) -> Result<Vec<u8>, BridgeError> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let mut session = if self.used {
            self.rearm()?
        } else {
            match self.session.take() {
                Some(session) => session,
                None => self.rearm()?,
            }
        };
        let result = driver::decompress_block(&self.engine, &mut session, data, size);
        self.session = Some(session);
        self.used = true;
        result
    }

    fn rearm(&mut self) -> Result<E::DecompressSession, BridgeError> {
        let rearmed = match self.session.take() {
            Some(session) => self.engine.decompress_reinit(session, &self.params),
            None => self.engine.decompress_init(&self.params),
        };
        rearmed.ok_or_else(|| {
            warn!("engine refused to re-arm decompressor");
            BridgeError::EngineReinitFailed(Direction::Decompress)
        })
    }
}

//==================================================================================
// 3. One-Shot Helpers
//==================================================================================

/// Compresses `data` with a throwaway session.
pub fn compress<E: Engine>(
    engine: E,
    data: &[u8],
    options: &CompressOptions,
) -> Result<Vec<u8>, BridgeError> {
    Compressor::new(engine, options)?.compress(data)
}

/// Decompresses `data` into exactly `size` bytes with a throwaway session.
pub fn decompress<E: Engine>(
    engine: E,
    data: &[u8],
    size: usize,
    options: &DecompressOptions,
) -> Result<Vec<u8>, BridgeError> {
    Decompressor::new(engine, options)?.decompress(data, size)
}
