use std::net::SocketAddr;

use super::types::SystemConfig;
use crate::http::HASH_PATH;
use crate::types::{Error, Result};

// Validation helper functions

/// Validate listen address format (host:port)
pub(crate) fn validate_listen_address(addr: &str) -> Result<()> {
    addr.parse::<SocketAddr>()
        .map_err(|_| Error::Validation {
            field: "server.listen".to_string(),
            message: format!("Invalid listen address format '{}'. Expected format: 'host:port' (e.g., '127.0.0.1:8080')", addr),
        })?;
    Ok(())
}

/// Validate positive timeout value
pub(crate) fn validate_positive_timeout(value: u64, field: &str) -> Result<()> {
    if value == 0 {
        return Err(Error::Validation {
            field: field.to_string(),
            message: "Timeout must be greater than 0".to_string(),
        });
    }
    Ok(())
}

/// Parse size string with units (B, KB, MB, GB) into bytes
pub(crate) fn parse_size_string(size: &str) -> Result<u64> {
    let size = size.trim().to_uppercase();
    let invalid_number = || Error::Validation {
        field: "size".to_string(),
        message: format!("Invalid number in size '{}'", size),
    };

    let (number, multiplier) = if let Some(number) = size.strip_suffix("GB") {
        (number, 1024 * 1024 * 1024)
    } else if let Some(number) = size.strip_suffix("MB") {
        (number, 1024 * 1024)
    } else if let Some(number) = size.strip_suffix("KB") {
        (number, 1024)
    } else if let Some(number) = size.strip_suffix('B') {
        (number, 1)
    } else {
        // Try parsing as plain bytes
        return size.parse::<u64>().map_err(|_| Error::Validation {
            field: "size".to_string(),
            message: format!("Invalid size format '{}'. Expected format: number + unit (KB/MB/GB) or plain bytes", size),
        });
    };

    let bytes = number.trim().parse::<u64>().map_err(|_| invalid_number())?;
    Ok(bytes * multiplier)
}

/// Validate request size string and ensure reasonable limits
pub(crate) fn validate_request_size(size: &str, field: &str) -> Result<()> {
    let bytes = parse_size_string(size).map_err(|mut e| {
        if let Error::Validation {
            field: ref mut field_ref,
            ..
        } = e
        {
            *field_ref = field.to_string();
        }
        e
    })?;

    // Minimum 1KB, maximum 100MB
    const MIN_SIZE: u64 = 1024;
    const MAX_SIZE: u64 = 100 * 1024 * 1024;

    if bytes < MIN_SIZE {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!(
                "Request size {} bytes is below minimum {} (1KB)",
                bytes, MIN_SIZE
            ),
        });
    }

    if bytes > MAX_SIZE {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!(
                "Request size {} bytes exceeds maximum {} (100MB)",
                bytes, MAX_SIZE
            ),
        });
    }

    Ok(())
}

/// Validate a route path: must start with '/' and must not shadow the hash route
pub(crate) fn validate_route_path(path: &str, field: &str) -> Result<()> {
    if !path.starts_with('/') || path.len() < 2 {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!("Path '{}' must start with '/' and name a resource", path),
        });
    }

    if path.contains(char::is_whitespace) || path.contains('{') || path.contains('}') {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!("Path '{}' contains invalid characters", path),
        });
    }

    if path == HASH_PATH {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!("Path '{}' is reserved for the hash endpoint", path),
        });
    }

    Ok(())
}

impl SystemConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate server configuration
        validate_listen_address(&self.server.listen)?;
        validate_request_size(&self.server.max_request_size, "server.max_request_size")?;
        validate_positive_timeout(self.server.request_timeout, "server.request_timeout")?;
        validate_positive_timeout(self.server.shutdown_timeout, "server.shutdown_timeout")?;

        // Validate logging configuration
        if !matches!(
            self.logging.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(Error::Validation {
                field: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ),
            });
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(Error::Validation {
                field: "logging.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Must be one of: json, pretty",
                    self.logging.format
                ),
            });
        }

        // Validate monitoring configuration
        validate_route_path(&self.monitoring.health_path, "monitoring.health_path")?;
        if self.monitoring.metrics_enabled {
            validate_route_path(&self.monitoring.metrics_path, "monitoring.metrics_path")?;
            if self.monitoring.metrics_path == self.monitoring.health_path {
                return Err(Error::Validation {
                    field: "monitoring.metrics_path".to_string(),
                    message: format!(
                        "Metrics path '{}' collides with the health path",
                        self.monitoring.metrics_path
                    ),
                });
            }
        }

        Ok(())
    }
}
