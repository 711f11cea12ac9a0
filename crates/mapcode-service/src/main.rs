//! Service binary: parse the command line, run startup checks, bind and serve.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mapcode_service::cli::{filter_known_args, Cli};
use mapcode_service::{build_router, startup};
use mapcode_service_shared::{
    init_logging, AppState, LoggingConfig, MetricsConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_from(filter_known_args(std::env::args()));

    let mut logging = LoggingConfig::from_env();
    if cli.debug {
        logging = logging.with_level("debug");
    } else if cli.silent {
        logging = logging.with_level("warn");
    }
    init_logging(&logging);

    startup::run_startup_checks(&MetricsConfig::from_env())?;

    let mut config = ServiceConfig::from_env();
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }

    let state = AppState::new(env!("CARGO_PKG_VERSION"), &config);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        addr = %addr,
        version = env!("CARGO_PKG_VERSION"),
        "mapcode service listening"
    );
    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;
    Ok(())
}
