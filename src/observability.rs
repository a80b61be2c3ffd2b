// In: src/observability.rs

//! Logger installation.
//!
//! The library itself only emits through the `log` macros. Hosts that want to
//! see those records call `init_logging` once; later calls are no-ops.

use std::fs::OpenOptions;
use std::sync::Once;

use log::LevelFilter;

use crate::error::BridgeError;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `level`, writing to stderr or appending to
/// `log_file`. Returns `true` if this call installed the logger.
pub fn init_logging(level: LevelFilter, log_file: Option<&str>) -> Result<bool, BridgeError> {
    if INIT_LOGGER.is_completed() {
        return Ok(false);
    }

    let target = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    let mut installed = false;
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(level);

        // Just the level and the message.
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        installed = builder.try_init().is_ok();
    });
    Ok(installed)
}
