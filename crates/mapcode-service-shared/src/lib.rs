//! Shared HTTP infrastructure for the mapcode REST service.
//!
//! This crate provides the glue between `mapcode-lib` and the axum binary:
//!
//! - [`dto`]: validated REST payload types
//! - [`ProblemDetails`]: RFC 9457 Problem Details for error responses
//! - [`reply`]: JSON/XML reply encoding with `Accept` negotiation
//! - [`metrics`]: Prometheus recorder plus per-operation system counters
//! - [`logging`]: structured JSON/text logging setup
//! - [`middleware`]: request correlation and HTTP metrics middleware
//! - [`AppState`]: shared handler state (version, API key, counters)
//!
//! # Architecture
//!
//! Handlers stay thin: they parse and validate parameters, call
//! `mapcode-lib`, build a DTO, validate it, and hand it to [`Reply`] in the
//! negotiated format. All conversion logic lives in the library.
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a fixed-key `AppState` for handler
//! tests. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod constants;
pub mod dto;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod reply;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dto::Validate;
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, prometheus_handler, record_decode_request, record_encode_request, MetricsConfig,
    MetricsError, SystemMetrics, SystemMetricsSnapshot,
};
pub use middleware::{extract_or_generate_request_id, RequestId, RequestTrackingLayer};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_API_KEY,
    PROBLEM_INVALID_PARAMETER, PROBLEM_MISSING_PATH_PARAMETERS, PROBLEM_NOT_FOUND,
    PROBLEM_UNKNOWN_MAPCODE,
};
pub use reply::{Reply, ReplyFormat};
pub use state::{AppState, ServiceConfig};
