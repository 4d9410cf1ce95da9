//! Logging module for the hash service
//!
//! This module provides structured logging functionality with support for:
//! - JSON and pretty format output
//! - Configurable log levels via environment or configuration
//! - CLI argument integration for logging preferences
//!
//! # Usage
//!
//! Initialize logging early in your application:
//! ```rust,ignore
//! logging::init(cli_level, cli_format, system_config.as_ref())?;
//! ```

use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

use crate::config::SystemConfig;
use crate::types::{Error, Result};

/// Log level enum values as strings for configuration
pub mod level {
    pub const TRACE: &str = "trace";
    pub const DEBUG: &str = "debug";
    pub const INFO: &str = "info";
    pub const WARN: &str = "warn";
    pub const ERROR: &str = "error";
}

/// Log format enum values as strings for configuration
pub mod format {
    pub const JSON: &str = "json";
    pub const PRETTY: &str = "pretty";
}

/// Resolve the effective level and format
///
/// # Precedence
///
/// 1. CLI arguments (highest priority)
/// 2. System configuration file
/// 3. Default values (lowest priority)
pub fn resolve<'a>(
    log_level_override: Option<&'a str>,
    log_format_override: Option<&'a str>,
    system_config: Option<&'a SystemConfig>,
) -> (&'a str, &'a str) {
    let log_level = if let Some(level) = log_level_override {
        level
    } else if let Some(config) = system_config {
        &config.logging.level
    } else {
        level::INFO
    };

    let log_format = if let Some(fmt) = log_format_override {
        fmt
    } else if let Some(config) = system_config {
        &config.logging.format
    } else {
        format::JSON
    };

    (log_level, log_format)
}

/// Initialize logging with configuration
///
/// Installs the global tracing subscriber. `RUST_LOG`, when set, replaces the
/// resolved level filter.
pub fn init(
    log_level_override: Option<&str>,
    log_format_override: Option<&str>,
    system_config: Option<&SystemConfig>,
) -> Result<()> {
    let (log_level, log_format) = resolve(log_level_override, log_format_override, system_config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let timer = ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string());

    let installed = match log_format {
        format::JSON => tracing_subscriber::fmt()
            .json()
            .with_timer(timer)
            .with_env_filter(env_filter)
            .with_target(false)
            .with_current_span(true)
            .with_span_list(false)
            .try_init(),
        format::PRETTY => tracing_subscriber::fmt()
            .pretty()
            .with_timer(timer)
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_timer(timer)
            .with_env_filter(env_filter)
            .with_target(false)
            .try_init(),
    };

    installed.map_err(|e| Error::Application(format!("Failed to initialize logging: {}", e)))
}
