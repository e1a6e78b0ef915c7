//! Subcommand definitions
//!
//! Each module groups related subcommands and maps them onto the
//! `qntmex_core` operation that produces their report.

pub mod diagnose;
pub mod fix;
pub mod run;
pub mod screens;
