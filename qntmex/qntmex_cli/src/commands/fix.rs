//! Repair and cleanup commands
//!
//! Every fix patches files through the core patch protocol, so running one
//! twice leaves the project as the first run did.

use clap::Subcommand;
use qntmex_core::fixes;
use qntmex_core::{CommandRunner, Context, Report, Result};

/// Commands that change project or Gradle home files
#[derive(Subcommand)]
pub enum FixCommand {
    /// Remove the banned JVM argument from every gradle.properties
    #[clap(name = "fix-jvm")]
    FixJvm,

    /// Apply the daemon settings to the global gradle.properties
    #[clap(name = "fix-daemon")]
    FixDaemon,

    /// Make the global and project Gradle settings Java 17 compatible
    #[clap(name = "fix-java17")]
    FixJava17,

    /// Pin the Gradle wrapper to the configured version
    #[clap(name = "fix-version")]
    FixVersion,

    /// Add the plugin repositories block to settings.gradle
    #[clap(name = "fix-settings")]
    FixSettings,

    /// Run gradlew clean and remove build directories
    #[clap(name = "clean-build")]
    CleanBuild,

    /// Remove Gradle caches and incompatible distributions
    #[clap(name = "clean-cache")]
    CleanCache,
}

/// Implementation of the fix commands
pub fn execute(
    command: FixCommand,
    ctx: &Context,
    runner: &mut dyn CommandRunner,
) -> Result<Report> {
    match command {
        FixCommand::FixJvm => fixes::fix_jvm(ctx),
        FixCommand::FixDaemon => fixes::fix_daemon(ctx),
        FixCommand::FixJava17 => fixes::fix_java17(ctx),
        FixCommand::FixVersion => fixes::fix_version(ctx),
        FixCommand::FixSettings => fixes::fix_settings(ctx),
        FixCommand::CleanBuild => fixes::clean_build(ctx, runner),
        FixCommand::CleanCache => fixes::clean_cache(ctx),
    }
}
