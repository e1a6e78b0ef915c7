mod commands;

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser, Subcommand};
use qntmex_core::{Context, Environment, Error, Report, SystemRunner, ToolConfig};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::diagnose::DiagnoseCommand;
use commands::fix::FixCommand;
use commands::run::RunCommand;
use commands::screens::ScreensArgs;

/// QNTMEX Wallet toolbelt
///
/// Diagnoses and repairs the Android build environment of the QNTMEX Wallet
/// React Native project.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Project root containing the wallet directory (defaults to the current directory)
    #[clap(long, global = true)]
    root: Option<PathBuf>,

    /// Configuration file (defaults to qntmex.toml in the project root)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[clap(long, global = true)]
    json: bool,

    /// Raise log verbosity, repeatable
    #[clap(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[clap(flatten)]
    Diagnose(DiagnoseCommand),

    #[clap(flatten)]
    Fix(FixCommand),

    #[clap(flatten)]
    Run(RunCommand),

    /// Walk the wallet screens headlessly
    Screens(ScreensArgs),
}

fn init_logging(config: &ToolConfig, verbose: u8) {
    let level = config.log_level.more_verbose(verbose);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn dispatch(command: Commands, ctx: &Context) -> qntmex_core::Result<Report> {
    let mut runner = SystemRunner;
    match command {
        Commands::Diagnose(cmd) => commands::diagnose::execute(cmd, ctx, &mut runner),
        Commands::Fix(cmd) => commands::fix::execute(cmd, ctx, &mut runner),
        Commands::Run(cmd) => commands::run::execute(cmd, ctx, &mut runner),
        Commands::Screens(args) => commands::screens::execute_screens(&args),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };
    let config = ToolConfig::resolve(&root, cli.config.as_deref())?;
    init_logging(&config, cli.verbose);
    log::debug!("Project root: {}", root.display());

    let ctx = Context::new(root, Environment::from_process(), config);
    let report = match dispatch(cli.command, &ctx) {
        Ok(report) => report,
        Err(Error::Precondition(e)) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
