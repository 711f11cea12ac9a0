//! Bounds shared by DTO validation and parameter parsing.

/// Length bounds for free-form names (territory full names, aliases).
pub const API_NAME_LEN_MIN: usize = 1;
pub const API_NAME_LEN_MAX: usize = 250;

/// Length bounds for a mapcode string (without territory prefix).
pub const API_MAPCODE_LEN_MIN: usize = 1;
pub const API_MAPCODE_LEN_MAX: usize = 19;

/// Length bounds for a territory alpha code.
pub const API_TERRITORY_LEN_MIN: usize = 2;
pub const API_TERRITORY_LEN_MAX: usize = 7;

/// Length bounds for the version string.
pub const API_VERSION_LEN_MIN: usize = 1;
pub const API_VERSION_LEN_MAX: usize = 250;

/// Latitude bounds in degrees. Longitude is unbounded and wrapped instead.
pub const API_LAT_MIN: f64 = -90.0;
pub const API_LAT_MAX: f64 = 90.0;

/// Precision bounds for mapcode extension digits.
pub const API_PRECISION_MIN: i32 = 0;
pub const API_PRECISION_MAX: i32 = 8;

/// Default page size for territory and alphabet listings.
pub const API_DEFAULT_COUNT: usize = 1000;

/// Port the HTTP server binds when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// API key accepted by the guarded conversion endpoint when the
/// `MAPCODE_API_KEY` environment variable is not set.
pub const DEFAULT_API_KEY: &str = "demo";
