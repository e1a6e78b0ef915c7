//! Utility types.
//!
//! Logging levels, tool configuration and version handling used throughout
//! the toolbelt.

pub mod config;
pub mod logging;
pub mod version;

pub use config::ToolConfig;
pub use logging::LogLevel;
pub use version::Version;
