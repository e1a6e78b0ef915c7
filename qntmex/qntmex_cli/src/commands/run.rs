//! Commands that drive Expo to generate or launch the Android app

use clap::Subcommand;
use qntmex_core::fixes;
use qntmex_core::{CommandRunner, Context, Report, Result};

#[derive(Subcommand)]
pub enum RunCommand {
    /// Generate the Android project with Expo prebuild when missing
    #[clap(name = "setup-android")]
    SetupAndroid,

    /// Build and launch the app on a device or emulator
    #[clap(name = "run-android")]
    RunAndroid,

    /// Apply the JVM argument fix, then launch the app
    #[clap(name = "run-with-fix")]
    RunWithFix,
}

pub fn execute(
    command: RunCommand,
    ctx: &Context,
    runner: &mut dyn CommandRunner,
) -> Result<Report> {
    log::info!("Launching external tooling from {}", ctx.layout.wallet.display());
    match command {
        RunCommand::SetupAndroid => fixes::setup_android(ctx, runner),
        RunCommand::RunAndroid => fixes::run_android(ctx, runner),
        RunCommand::RunWithFix => fixes::run_with_fix(ctx, runner),
    }
}
