//! Startup self-checks, run before the listener binds.

use anyhow::{bail, Context, Result};

use mapcode_lib::{decode, distance_meters, encode_to_shortest, GeoPoint};
use mapcode_service_shared::{init_metrics, MetricsConfig, MetricsError};

/// Self-check coordinate (Amsterdam).
const CHECK_LAT: f64 = 52.376514;
const CHECK_LON: f64 = 4.908542;

/// Maximum acceptable round-trip drift for the self-check, in meters.
const CHECK_MAX_DRIFT_METERS: f64 = 5_000.0;

/// Run all startup checks. Any error here is fatal; the service must not
/// serve requests with a broken codec or without its metrics recorder.
pub fn run_startup_checks(metrics: &MetricsConfig) -> Result<()> {
    codec_self_test().context("codec self-check failed")?;

    match init_metrics(metrics) {
        Ok(()) => {}
        Err(MetricsError::Disabled) => {
            tracing::warn!("metrics collection disabled by configuration");
        }
        Err(err) => return Err(err).context("metrics recorder installation failed"),
    }
    Ok(())
}

/// Encode and decode a known coordinate and verify the result lands nearby.
fn codec_self_test() -> Result<()> {
    let mapcode = encode_to_shortest(CHECK_LAT, CHECK_LON, None, 0)
        .context("encoding the self-check coordinate failed")?;
    let center = decode(&mapcode.full_code(), None)
        .context("decoding the self-check mapcode failed")?;

    let drift = distance_meters(GeoPoint::new(CHECK_LAT, CHECK_LON), center);
    if drift > CHECK_MAX_DRIFT_METERS {
        bail!(
            "codec round trip for {} drifted {drift:.1} meters",
            mapcode.full_code()
        );
    }
    tracing::debug!(
        mapcode = %mapcode.full_code(),
        drift_meters = drift,
        "codec self-check passed"
    );
    Ok(())
}
