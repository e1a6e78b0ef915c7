//! # QNTMEX Core
//!
//! `qntmex_core` diagnoses and repairs the local Android build environment of
//! the QNTMEX Wallet React Native project, and models the wallet's screen flow.
//!
//! ## Core Principles
//!
//! 1. **Pure patches**: every textual correction is a [`patch::Rule`] applied by
//!    the pure [`patch::patch`] function. Rules are idempotent: running a
//!    patch on its own output changes nothing.
//!
//! 2. **I/O at the boundary**: [`patch::patch_file`] reads a target, patches it,
//!    keeps a one-time `.backup` copy and writes the result. Nothing else in
//!    the crate writes configuration files.
//!
//! 3. **Resolved once**: the environment and every path are captured in a
//!    [`Context`] at startup and passed to each check and fix.
//!
//! 4. **Advisory failures**: checks and fixes record failures in a
//!    [`report::Report`] and carry on. Only a missing project directory is an
//!    error.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all subsystems
//! - **patch**: Idempotent text-patch rules and the file boundary
//! - **layout**: Environment snapshot and resolved project paths
//! - **diagnose**: Read-only checks
//! - **fixes**: Repairs and build tool invocations
//! - **process**: External command runner
//! - **report**: Status lines and rendering
//! - **flow**: Headless screen navigation
//! - **utils**: Configuration, versions and log levels
//! - **macros**: Logging macro

pub mod context;
pub mod diagnose;
pub mod error;
pub mod fixes;
pub mod flow;
pub mod layout;
pub mod macros;
pub mod patch;
pub mod process;
pub mod report;
pub mod utils;

// Re-export key types for convenience
pub use context::Context;
pub use error::{Error, Result};
pub use layout::{Environment, ProjectLayout};
pub use patch::{patch, FileOutcome, Rule};
pub use process::{CommandRunner, CommandSpec, SystemRunner};
pub use report::{Report, Status};
pub use utils::{LogLevel, ToolConfig, Version};
