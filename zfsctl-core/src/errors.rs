// zfsctl-core/src/errors.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, running or reading a `zfs`/`zpool` command.
#[derive(Error, Debug)]
pub enum ZfsError {
    /// The executable could not be found on the search path (or in the configured overrides).
    #[error("Executable not found: '{name}' is not on the search path")]
    ExecutableNotFound { name: String },

    /// The subprocess could not be started.
    #[error("Failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The subprocess exited with a non-zero status.
    /// `message` is the compacted, single-line stderr.
    #[error("{message}")]
    CommandFailed {
        program: PathBuf,
        status: i32,
        message: String,
    },

    /// The subprocess wrote more than the configured ceiling to stdout or stderr.
    #[error("Output of {} exceeded {limit} bytes", program.display())]
    OutputTooLarge { program: PathBuf, limit: usize },

    /// A size argument did not match the `<number>[KMGTP]` grammar.
    #[error("Invalid size: '{0}'")]
    InvalidSize(String),

    /// The request cannot be turned into a valid argument vector.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error related to configuration loading or validation.
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ZfsError>;

impl ZfsError {
    pub fn config(msg: impl Into<String>) -> Self {
        ZfsError::Config(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        ZfsError::InvalidRequest(msg.into())
    }

    /// Exit status of a failed command, if this error came from one.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            ZfsError::CommandFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
