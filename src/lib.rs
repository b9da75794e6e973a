pub mod cli;
pub mod core;
pub mod providers;

use crate::core::DateInput;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Look up rates for a date, refreshing the store on a miss.
    Rates { date: DateInput, with_history: bool },
    /// Show recently saved rate rows.
    History { limit: Option<usize> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("cbrates starting...");

    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Rates { date, with_history } => {
            let outcome = cli::rates::run(&config, &date, with_history).await?;
            debug!(?outcome, "Rate retrieval finished");
        }
        AppCommand::History { limit } => {
            let view = cli::history::run(&config, limit).await;
            debug!(?view, "History load finished");
        }
    }
    Ok(())
}
