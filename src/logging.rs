//! Process-wide log sink
//!
//! Log records are `tracing` events carrying a `caller` field that names the
//! component or function emitting them. [`init`] installs the global
//! subscriber once, in one of three modes: file, console or disabled.

use std::fs::File;
use std::sync::Mutex;

use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{LogMode, LoggingConfig};
use crate::error::CoilError;

/// Installs the global log subscriber described by `config`
///
/// `RUST_LOG` takes precedence over `config.level`. Fails with
/// [`CoilError::LoggerInstalled`] if a global subscriber already exists.
pub fn init(config: &LoggingConfig) -> Result<(), CoilError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = match config.mode {
        LogMode::Console => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogMode::File => {
            let file = File::create(&config.file).map_err(|source| CoilError::Io {
                path: config.file.clone(),
                source,
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogMode::Disabled => tracing_subscriber::fmt()
            .with_max_level(LevelFilter::OFF)
            .try_init(),
    };
    installed.map_err(|_| CoilError::LoggerInstalled)?;

    info!(caller = "logging::init", mode = ?config.mode, "logging initialised");
    Ok(())
}

/// Records a message under a caller tag
pub fn record(caller: &str, message: &str) {
    info!(caller, "{message}");
}
