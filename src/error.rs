//! Error types and the tri-state operation status

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error};

use crate::shader::ShaderStage;

/// Errors raised inside Coil before they are folded into a [`Status`]
#[derive(Debug, Error)]
pub enum CoilError {
    /// A file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graphics driver rejected a shader stage
    #[error("{stage} stage failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    /// The graphics driver could not link the program
    #[error("program failed to link: {log}")]
    Link { log: String },

    /// The graphics driver failed to create a resource
    #[error("driver error: {0}")]
    Driver(String),

    /// The shader program was asked to run before a successful link
    #[error("program is not linked")]
    NotLinked,

    /// No shader stages were supplied
    #[error("no shader sources supplied")]
    NoSources,

    /// The wrapper has no native window behind it
    #[error("window has no native handle")]
    NoWindow,

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// A global logger was already installed
    #[error("a global logger is already installed")]
    LoggerInstalled,
}

/// Outcome of a fallible operation in Coil's public API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The operation completed
    Success,
    /// The operation was a no-op (e.g. deleting something already deleted)
    SoftFailure,
    /// The operation could not complete
    HardError,
}

impl Status {
    /// Returns true for [`Status::Success`]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns true for [`Status::HardError`]
    pub fn is_error(self) -> bool {
        matches!(self, Status::HardError)
    }

    /// Logs a failed result under `caller` and converts it to a status
    pub fn from_result<T>(caller: &str, result: Result<T, CoilError>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(e) => {
                error!(caller, error = %e, "operation failed");
                Status::HardError
            }
        }
    }

    /// Logs a no-op under `caller` and returns [`Status::SoftFailure`]
    pub fn soft(caller: &str, message: &str) -> Self {
        debug!(caller, "{message}");
        Status::SoftFailure
    }
}
