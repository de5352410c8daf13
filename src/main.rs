use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use dolarwatch::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for dolarwatch::AppCommand {
    fn from(cmd: Commands) -> dolarwatch::AppCommand {
        match cmd {
            Commands::Quotes => dolarwatch::AppCommand::Quotes,
            Commands::Watch => dolarwatch::AppCommand::Watch,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch and display current quotes once
    Quotes,
    /// Live dashboard with quote history and the cheque ledger
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => dolarwatch::cli::setup::setup(),
        Some(cmd) => dolarwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
