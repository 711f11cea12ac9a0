//! Application state and service configuration.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::constants::{DEFAULT_API_KEY, DEFAULT_PORT};
use crate::metrics::SystemMetrics;

/// Environment-based service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port the HTTP listener binds.
    pub port: u16,
    /// API key accepted by the guarded conversion endpoint.
    pub api_key: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// - `SERVICE_PORT`: listener port (default: 8080)
    /// - `MAPCODE_API_KEY`: accepted API key (default: "demo")
    pub fn from_env() -> Self {
        let port = std::env::var("SERVICE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_key =
            std::env::var("MAPCODE_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());

        Self { port, api_key }
    }

    /// Override the port, taking precedence over the environment.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); shared via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    version: String,
    api_key: String,
    metrics: SystemMetrics,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state for a service reporting `version` and guarding the
    /// conversion endpoint with `config.api_key`.
    pub fn new(version: impl Into<String>, config: &ServiceConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                version: version.into(),
                api_key: config.api_key.clone(),
                metrics: SystemMetrics::new(),
                started_at: Utc::now(),
            }),
        }
    }

    /// Version string reported by `/mapcode/version`.
    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// Whether a presented API key is accepted.
    pub fn api_key_matches(&self, presented: &str) -> bool {
        self.inner.api_key == presented
    }

    /// Per-operation request counters.
    pub fn metrics(&self) -> &SystemMetrics {
        &self.inner.metrics
    }

    /// Process start time (UTC).
    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("version", &self.inner.version)
            .field("started_at", &self.inner.started_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.api_key, DEFAULT_API_KEY);
    }

    #[test]
    fn config_port_override() {
        let config = ServiceConfig::default().with_port(9090);
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn state_checks_api_key() {
        let config = ServiceConfig {
            port: DEFAULT_PORT,
            api_key: "secret".to_string(),
        };
        let state = AppState::new("2.4.11", &config);

        assert!(state.api_key_matches("secret"));
        assert!(!state.api_key_matches("SECRET"));
        assert!(!state.api_key_matches(""));
    }

    #[test]
    fn state_clone_shares_metrics() {
        let state1 = AppState::new("2.4.11", &ServiceConfig::default());
        let state2 = state1.clone();

        state1.metrics().add_one_lat_lon_to_mapcode_request();
        assert_eq!(
            state2.metrics().snapshot().total_lat_lon_to_mapcode_requests,
            1
        );
    }

    #[test]
    fn state_debug_hides_api_key() {
        let state = AppState::new("2.4.11", &ServiceConfig::default());
        let debug = format!("{state:?}");
        assert!(debug.contains("AppState"));
        assert!(!debug.contains("demo"));
    }
}
