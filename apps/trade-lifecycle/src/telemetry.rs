//! Tracing Setup
//!
//! Installs a `tracing_subscriber::fmt` subscriber configured from
//! [`LoggingConfig`]. `RUST_LOG` overrides the configured level.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trade_lifecycle::{config::LoggingConfig, telemetry::init_tracing};
//!
//! init_tracing(&LoggingConfig::default())?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

use crate::config::LoggingConfig;

/// Tracing initialization error.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("Invalid log filter '{directive}': {source}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser error.
        source: ParseError,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns `TelemetryError` if the level directive is invalid or a global
/// subscriber was already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    let result = if config.is_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_current_span(false)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
    };

    result.map_err(|e| TelemetryError::Init(e.to_string()))
}

fn level_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidFilter {
        directive: level.to_string(),
        source,
    })
}
