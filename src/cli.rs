use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, instrument, warn};

use crate::config::SystemConfig;
use crate::metrics::Metrics;
use crate::types::{ConfigError, Error, Result};

#[derive(Parser)]
#[command(name = "hasher")]
#[command(about = "A small HTTP service that returns SHA-256 digests")]
#[command(long_about = "
A single-binary HTTP service that accepts a JSON string on POST /hash and
answers with its SHA-256 digest, with structured logging and Prometheus metrics.
")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// System configuration file path
    #[arg(short, long, default_value = "/etc/hasher/config.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run the hash server (default if no subcommand given)
    Run(RunArgs),
    /// Validate the configuration file
    Validate,
    /// Show version and build information
    Version,
}

#[derive(Args, Clone, Default)]
pub struct RunArgs {
    /// Override listen address (format: "host:port")
    #[arg(long)]
    pub listen: Option<String>,

    /// Set log format
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Get effective log level considering verbose/quiet flags
    pub fn effective_log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Error
        } else {
            self.log_level.clone().unwrap_or(LogLevel::Info)
        }
    }

    /// Convert LogLevel enum to string for logging module
    pub fn log_level_to_str(&self) -> &'static str {
        match self.effective_log_level() {
            LogLevel::Trace => crate::logging::level::TRACE,
            LogLevel::Debug => crate::logging::level::DEBUG,
            LogLevel::Info => crate::logging::level::INFO,
            LogLevel::Warn => crate::logging::level::WARN,
            LogLevel::Error => crate::logging::level::ERROR,
        }
    }

    /// Log level override from the command line, if any flag was given
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.log_level.is_some() || self.verbose || self.quiet {
            Some(self.log_level_to_str())
        } else {
            None
        }
    }

    /// Get log format override from CLI arguments
    pub fn log_format_override(&self) -> Option<&'static str> {
        match &self.command {
            Some(Commands::Run(args)) => args.log_format.as_ref().map(|fmt| match fmt {
                LogFormat::Json => crate::logging::format::JSON,
                LogFormat::Pretty => crate::logging::format::PRETTY,
            }),
            _ => None,
        }
    }
}

/// Run the hash server
#[instrument(skip_all)]
pub async fn run_server(
    cli: Cli,
    args: RunArgs,
    system_config: Option<SystemConfig>,
    metrics: Arc<Metrics>,
) -> Result<()> {
    // Only a missing file falls back to defaults; anything else stops startup
    let mut system_config = match system_config {
        Some(config) => config,
        None => match SystemConfig::load_from_file(&cli.config) {
            Ok(config) => config,
            Err(Error::Config(ConfigError::FileNotFound { .. })) => {
                warn!(
                    config_path = %cli.config.display(),
                    "Configuration file not found, using defaults"
                );
                SystemConfig::default()
            }
            Err(e) => {
                error!(
                    config_path = %cli.config.display(),
                    error = %e,
                    "Failed to load configuration file"
                );
                return Err(e);
            }
        },
    };

    if let Some(listen) = args.listen {
        system_config.server.listen = listen;
    }

    system_config.validate()?;

    info!(
        config_path = %cli.config.display(),
        listen = %system_config.server.listen,
        "Configuration loaded successfully"
    );

    // Set up graceful shutdown
    let shutdown_signal = setup_shutdown_signal();

    crate::http::start_server(system_config, metrics, shutdown_signal).await
}

/// Validate the configuration file
#[instrument(skip(cli, system_config))]
pub async fn validate_config(cli: Cli, system_config: Option<SystemConfig>) -> Result<()> {
    info!("Validating configuration file...");

    let config = match system_config {
        Some(config) => config,
        None => SystemConfig::load_from_file(&cli.config)?,
    };

    match config.validate() {
        Ok(()) => {
            info!(
                config_path = %cli.config.display(),
                "System configuration is valid"
            );
            Ok(())
        }
        Err(e) => {
            error!(
                config_path = %cli.config.display(),
                error = %e,
                "System configuration validation failed"
            );
            Err(e)
        }
    }
}

/// Show version and build information
#[instrument]
pub async fn show_version() -> Result<()> {
    println!("Hasher {}", env!("CARGO_PKG_VERSION"));
    println!("Description: {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!();

    println!("Build Information:");
    println!(
        "  Build Profile: {}",
        if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        }
    );
    println!();

    println!("Runtime Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Architecture: {}", std::env::consts::ARCH);

    Ok(())
}

/// Set up graceful shutdown signal handling
pub async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
