pub mod cli;
pub mod core;
pub mod providers;

use crate::core::Session;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Quotes,
    Watch,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Dolar watch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let source = providers::build_rate_source(&config)?;

    match command {
        AppCommand::Quotes => cli::quotes::run(&source).await,
        AppCommand::Watch => {
            let session = Session::new(source, &config.refresh);
            cli::watch::run(session, &config.refresh).await
        }
    }
}
