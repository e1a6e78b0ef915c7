//! Read-only diagnostic commands

use clap::Subcommand;
use qntmex_core::diagnose;
use qntmex_core::{CommandRunner, Context, Report, Result};

/// Checks that inspect the project and host without changing anything
#[derive(Subcommand)]
pub enum DiagnoseCommand {
    /// Check the Android SDK location and local.properties
    #[clap(name = "check-sdk")]
    CheckSdk,

    /// Check the Gradle wrapper and gradle.properties
    #[clap(name = "check-gradle")]
    CheckGradle,

    /// Check the installed Java version
    #[clap(name = "check-java")]
    CheckJava,

    /// Run the common Android build checks in one pass
    Troubleshoot,

    /// Verify the generated Android project files
    Verify,
}

/// Implementation of the diagnostic commands
pub fn execute(
    command: DiagnoseCommand,
    ctx: &Context,
    runner: &mut dyn CommandRunner,
) -> Result<Report> {
    match command {
        DiagnoseCommand::CheckSdk => diagnose::check_sdk(ctx),
        DiagnoseCommand::CheckGradle => diagnose::check_gradle(ctx),
        DiagnoseCommand::CheckJava => diagnose::check_java(ctx, runner),
        DiagnoseCommand::Troubleshoot => diagnose::troubleshoot(ctx, runner),
        DiagnoseCommand::Verify => diagnose::verify(ctx),
    }
}
