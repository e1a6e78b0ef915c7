//! Read-only checks over the project and its toolchain.
//!
//! Each check returns a [`Report`](crate::report::Report). Failing checks are
//! findings, not errors; only unmet preconditions surface as `Err`.

pub mod gradle;
pub mod java;
pub mod project;
pub mod sdk;

pub use gradle::check_gradle;
pub use java::{check_java, JavaVersion};
pub use project::{troubleshoot, verify};
pub use sdk::check_sdk;
