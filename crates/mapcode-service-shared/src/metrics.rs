//! Metrics infrastructure.
//!
//! Two layers:
//! - The Prometheus recorder ([`init_metrics`]) behind the `metrics` facade,
//!   fed by the HTTP middleware and the business helpers below. Installing it
//!   is a startup check; failure aborts initialization.
//! - [`SystemMetrics`], atomic per-operation counters whose snapshot backs
//!   the `GET /mapcode/metrics` endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);
        Self { enabled }
    }
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at application startup before any metrics are
/// recorded; subsequent calls return an error.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the Prometheus `/metrics` endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn prometheus_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone)]
pub enum MetricsError {
    /// Metrics are disabled in configuration.
    Disabled,
    /// The recorder has already been installed.
    AlreadyInitialized,
    /// The Prometheus builder failed to install.
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Record an encode (lat/lon to mapcode) request outcome.
///
/// Increments the `mapcode_encode_requests_total` counter.
pub fn record_encode_request(outcome: &str) {
    metrics::counter!(
        "mapcode_encode_requests_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a decode (mapcode to lat/lon) request outcome.
///
/// Increments the `mapcode_decode_requests_total` counter.
pub fn record_decode_request(outcome: &str) {
    metrics::counter!(
        "mapcode_decode_requests_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Per-operation request counters, safe for concurrent increment and read.
///
/// Counts total and valid (successfully answered) conversions in each
/// direction. A snapshot of these backs the `GET /mapcode/metrics` endpoint.
#[derive(Debug, Default)]
pub struct SystemMetrics {
    total_lat_lon_to_mapcode: AtomicU64,
    valid_lat_lon_to_mapcode: AtomicU64,
    total_mapcode_to_lat_lon: AtomicU64,
    valid_mapcode_to_lat_lon: AtomicU64,
}

impl SystemMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an incoming encode request, valid or not.
    pub fn add_one_lat_lon_to_mapcode_request(&self) {
        self.total_lat_lon_to_mapcode.fetch_add(1, Ordering::Relaxed);
        record_encode_request("received");
    }

    /// Count an encode request that produced a valid response.
    pub fn add_one_valid_lat_lon_to_mapcode_request(&self) {
        self.valid_lat_lon_to_mapcode.fetch_add(1, Ordering::Relaxed);
        record_encode_request("valid");
    }

    /// Count an incoming decode request, valid or not.
    pub fn add_one_mapcode_to_lat_lon_request(&self) {
        self.total_mapcode_to_lat_lon.fetch_add(1, Ordering::Relaxed);
        record_decode_request("received");
    }

    /// Count a decode request that produced a valid response.
    pub fn add_one_valid_mapcode_to_lat_lon_request(&self) {
        self.valid_mapcode_to_lat_lon.fetch_add(1, Ordering::Relaxed);
        record_decode_request("valid");
    }

    /// Consistent point-in-time view of all counters.
    pub fn snapshot(&self) -> SystemMetricsSnapshot {
        SystemMetricsSnapshot {
            total_lat_lon_to_mapcode_requests: self.total_lat_lon_to_mapcode.load(Ordering::Relaxed),
            valid_lat_lon_to_mapcode_requests: self.valid_lat_lon_to_mapcode.load(Ordering::Relaxed),
            total_mapcode_to_lat_lon_requests: self.total_mapcode_to_lat_lon.load(Ordering::Relaxed),
            valid_mapcode_to_lat_lon_requests: self.valid_mapcode_to_lat_lon.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of [`SystemMetrics`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename = "metrics", rename_all = "camelCase")]
pub struct SystemMetricsSnapshot {
    pub total_lat_lon_to_mapcode_requests: u64,
    pub valid_lat_lon_to_mapcode_requests: u64,
    pub total_mapcode_to_lat_lon_requests: u64,
    pub valid_mapcode_to_lat_lon_requests: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
    }

    #[test]
    fn metrics_config_from_env_defaults() {
        std::env::remove_var("METRICS_ENABLED");
        let config = MetricsConfig::from_env();
        assert!(config.enabled);
    }

    #[test]
    fn prometheus_handler_reports_uninitialized() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let output = rt.block_on(async { prometheus_handler().await });
        assert!(output.contains('#') || output.is_empty());
    }

    #[test]
    fn counters_increment_independently() {
        let metrics = SystemMetrics::new();
        metrics.add_one_lat_lon_to_mapcode_request();
        metrics.add_one_lat_lon_to_mapcode_request();
        metrics.add_one_valid_lat_lon_to_mapcode_request();
        metrics.add_one_mapcode_to_lat_lon_request();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_lat_lon_to_mapcode_requests, 2);
        assert_eq!(snapshot.valid_lat_lon_to_mapcode_requests, 1);
        assert_eq!(snapshot.total_mapcode_to_lat_lon_requests, 1);
        assert_eq!(snapshot.valid_mapcode_to_lat_lon_requests, 0);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let metrics = SystemMetrics::new();
        metrics.add_one_mapcode_to_lat_lon_request();
        let json = serde_json::to_string(&metrics.snapshot()).unwrap();
        assert!(json.contains("\"totalMapcodeToLatLonRequests\":1"));
        assert!(json.contains("\"validLatLonToMapcodeRequests\":0"));
    }

    #[test]
    fn metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
