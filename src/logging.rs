//! logging
//!
//! `tracing` subscriber setup for the binary.
//!
//! Events go to stderr so that file contents written to stdout by the CLI
//! stay clean. `FORGEFS_LOG` takes precedence over the configured level
//! and accepts full `EnvFilter` directives (`forgefs::fs=debug,info`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::core::config::ConfigError;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "FORGEFS_LOG";

/// Output format of log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(format: &str) -> Result<Self, ConfigError> {
        match format {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue(format!(
                "invalid log format '{}', must be 'text' or 'json'",
                other
            ))),
        }
    }
}

/// Build the filter: `FORGEFS_LOG` if set and valid, else `level`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
///
/// # Errors
///
/// `ConfigError::InvalidValue` for an unknown format or when a global
/// subscriber is already installed.
pub fn init(level: &str, format: &str) -> Result<(), ConfigError> {
    let format = LogFormat::parse(format)?;
    let registry = Registry::default().with(build_filter(level));

    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| ConfigError::InvalidValue(format!("logging already initialized: {}", e)))
}
