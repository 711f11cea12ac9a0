//! Mapcode REST service: router assembly and handlers.
//!
//! The binary in `main.rs` stays thin; everything testable lives here so the
//! integration tests can drive the router in-process.

#![deny(warnings)]

pub mod cli;
pub mod format;
pub mod routes;
pub mod startup;

use axum::middleware::map_request;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use mapcode_service_shared::{prometheus_handler, AppState, RequestTrackingLayer};

/// The API routes, mounted under `prefix`.
///
/// Mounted three times: negotiated under `/mapcode`, and forced-format under
/// `/mapcode/xml` and `/mapcode/json`.
fn api_routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{prefix}/version"), get(routes::root::version))
        .route(&format!("{prefix}/status"), get(routes::root::status))
        .route(
            &format!("{prefix}/codes"),
            get(routes::codes::codes_forbidden),
        )
        .route(&format!("{prefix}/codes/{{lat_lon}}"), get(routes::codes::codes))
        .route(
            &format!("{prefix}/codes/{{lat_lon}}/{{type}}"),
            get(routes::codes::codes_typed),
        )
        .route(
            &format!("{prefix}/coords"),
            get(routes::coords::coords_forbidden),
        )
        .route(&format!("{prefix}/coords/{{mapcode}}"), get(routes::coords::coords))
        .route(
            &format!("{prefix}/territories"),
            get(routes::catalog::territories),
        )
        .route(
            &format!("{prefix}/territories/{{territory}}"),
            get(routes::catalog::territory),
        )
        .route(
            &format!("{prefix}/alphabets"),
            get(routes::catalog::alphabets),
        )
        .route(
            &format!("{prefix}/alphabets/{{alphabet}}"),
            get(routes::catalog::alphabet),
        )
}

/// Build the full application router around shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/mapcode", get(routes::root::help))
        .merge(api_routes("/mapcode"))
        .merge(api_routes("/mapcode/xml").layer(map_request(format::force_xml)))
        .merge(api_routes("/mapcode/json").layer(map_request(format::force_json)))
        .route("/mapcode/metrics", get(routes::root::system_metrics))
        .route(
            "/mapcode/{api_key}/from/{lat}/{lon}/{precision}",
            get(routes::codes::convert_with_api_key),
        )
        .route("/metrics", get(prometheus_handler))
        .layer(CorsLayer::permissive())
        .layer(RequestTrackingLayer)
        .with_state(state)
}
