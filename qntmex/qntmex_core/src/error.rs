//! Error types for the QNTMEX toolbelt.
//!
//! Errors are organized by subsystem, with each subsystem having its own
//! error type. The root error type, `Error`, can wrap any of them so callers
//! can handle failures uniformly at the top level.
//!
//! Only [`PreconditionError`] is fatal to a command. Everything else is
//! reported as an advisory line and the command moves on to its next check.

use std::path::PathBuf;
use thiserror::Error;

/// Root error type for the toolbelt.
#[derive(Debug, Error)]
pub enum Error {
    /// Required project directories are missing
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Patch rule construction or application errors
    #[error("Patch error: {0}")]
    Patch(#[from] PatchError),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External process errors
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Screen flow errors
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Fatal precondition failures. The CLI exits with status 1 on these.
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// The wallet project directory does not exist
    #[error("{name} directory does not exist: {}", path.display())]
    MissingProject {
        /// Configured directory name
        name: String,

        /// Path that was checked
        path: PathBuf,
    },

    /// The android subdirectory has not been generated yet
    #[error("Android directory does not exist: {}", .0.display())]
    MissingAndroid(PathBuf),
}

/// Errors raised while reading, patching or writing a target file.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Reading the target failed
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Target path
        path: PathBuf,

        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Writing the target or its backup failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Path being written
        path: PathBuf,

        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A rule could not be compiled into a matcher
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

/// Errors loading the tool configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        /// Config path
        path: PathBuf,

        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors running external tools.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        /// Command line
        command: String,

        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully
    #[error("`{command}` exited with status {code:?}: {output}")]
    Failed {
        /// Command line
        command: String,

        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,

        /// Captured output, empty when stdio was inherited
        output: String,
    },
}

/// Errors driving the screen flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The current screen has no transition for the event
    #[error("{screen} does not handle `{event}`")]
    Unhandled {
        /// Current screen
        screen: String,

        /// Event name
        event: String,
    },

    /// An event name could not be parsed
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type used throughout the toolbelt.
pub type Result<T> = std::result::Result<T, Error>;
