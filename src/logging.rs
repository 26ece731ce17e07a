//! Diagnostic logging.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! The filter comes from `APPLYKIT_LOG` when set, otherwise from the config.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "APPLYKIT_LOG";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{value}': {source}")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to install log subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global `tracing` subscriber.
pub fn init(config_level: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => build_filter(config_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(LoggingError::Subscriber)
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|source| LoggingError::Filter {
        value: level.to_string(),
        source,
    })
}
