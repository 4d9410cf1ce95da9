mod cli;
mod config;
mod endpoint;
mod http;
mod logging;
mod metrics;
mod service;
mod types;

use clap::Parser;
use std::sync::Arc;
use tracing::info;

use crate::cli::{Cli, Commands, RunArgs};
use crate::config::SystemConfig;
use crate::metrics::Metrics;
use crate::types::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config for logging setup, but don't fail if it doesn't exist
    let system_config = match &cli.command {
        Some(Commands::Version) => None,
        _ => SystemConfig::load_from_file(&cli.config).ok(),
    };

    crate::logging::init(
        cli.log_level_override(),
        cli.log_format_override(),
        system_config.as_ref(),
    )?;

    info!("Starting Hasher");

    match cli.command.clone().unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            // Single aggregator shared by the service chain and the /metrics endpoint
            let metrics = Arc::new(Metrics::new()?);
            cli::run_server(cli, args, system_config, metrics).await
        }
        Commands::Validate => cli::validate_config(cli, system_config).await,
        Commands::Version => cli::show_version().await,
    }
}
