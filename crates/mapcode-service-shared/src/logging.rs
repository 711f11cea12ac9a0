//! Structured logging setup.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: Output format, either `json` (default) or `text`
//! - `RUST_LOG`: Log level filter (default: `info`)
//!
//! The CLI launcher overrides the level with [`LoggingConfig::with_level`]
//! for its `--silent` and `--debug` flags.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logging (default, production).
    #[default]
    Json,
    /// Human-readable text logging (development).
    Text,
}

impl LogFormat {
    /// Parse log format from string.
    ///
    /// Accepts "json", "text", or "pretty" (alias for text).
    /// Returns `Json` for any other value.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format (json or text).
    pub format: LogFormat,
    /// Log level filter (e.g., "info", "debug", "warn").
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables.
    ///
    /// - `LOG_FORMAT`: "json" (default) or "text"
    /// - `RUST_LOG`: Log level filter (default: "info")
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Json);

        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self { format, level }
    }

    /// Override the level, taking precedence over `RUST_LOG`.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Should be called once at application startup.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::new(&config.level);

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => {
            registry.with(fmt::layer().pretty()).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false);

            registry.with(json_layer).init();
        }
    }
}
