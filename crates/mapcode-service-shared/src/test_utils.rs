//! Test fixtures for handler testing.
//!
//! Enable the `test-utils` feature to use these from dependent crates.

use crate::state::{AppState, ServiceConfig};

/// API key accepted by [`test_state`].
pub const TEST_API_KEY: &str = "test-key";

/// Version string reported by [`test_state`].
pub const TEST_VERSION: &str = "0.0.0-test";

/// Build an `AppState` with a fixed version and API key.
pub fn test_state() -> AppState {
    let config = ServiceConfig {
        port: 0,
        api_key: TEST_API_KEY.to_string(),
    };
    AppState::new(TEST_VERSION, &config)
}
