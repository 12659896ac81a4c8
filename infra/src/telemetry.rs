//! Tracing subscriber initialization

use tracing_subscriber::EnvFilter;

use gk_shared::config::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Install the global `tracing` subscriber described by `config`
///
/// `RUST_LOG`, when set and valid, takes precedence over `logging.level`.
/// Calling this twice fails because a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = build_filter(&config.level, std::env::var("RUST_LOG").ok())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| InfrastructureError::Config(format!("Failed to install tracing subscriber: {}", e)))
}

/// Resolve the filter from an optional `RUST_LOG` override and the configured level
pub(crate) fn build_filter(
    level: &str,
    env_override: Option<String>,
) -> Result<EnvFilter, InfrastructureError> {
    if let Some(directives) = env_override.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(&directives) {
            Ok(filter) => return Ok(filter),
            Err(e) => eprintln!("Ignoring invalid RUST_LOG '{}': {}", directives, e),
        }
    }

    EnvFilter::try_new(level)
        .map_err(|e| InfrastructureError::Config(format!("Invalid log level '{}': {}", level, e)))
}
