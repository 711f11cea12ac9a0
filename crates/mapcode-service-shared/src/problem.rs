//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use mapcode_lib::Error as LibError;

/// Problem type URI for a request parameter with an invalid value or format.
pub const PROBLEM_INVALID_PARAMETER: &str = "/problems/invalid-parameter";

/// Problem type URI for collection endpoints called without their path
/// parameters. These would enumerate an intractable result set, so they are
/// forbidden rather than paged.
pub const PROBLEM_MISSING_PATH_PARAMETERS: &str = "/problems/missing-path-parameters";

/// Problem type URI for a rejected API key.
pub const PROBLEM_INVALID_API_KEY: &str = "/problems/invalid-api-key";

/// Problem type URI for mapcodes that do not resolve to a coordinate.
pub const PROBLEM_UNKNOWN_MAPCODE: &str = "/problems/unknown-mapcode";

/// Problem type URI for resources that do not exist.
pub const PROBLEM_NOT_FOUND: &str = "/problems/not-found";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// Provides a consistent format for error responses across all endpoints.
/// Validation problems carry the failing parameter or field name in `param`.
///
/// # Example
///
/// ```
/// use mapcode_service_shared::ProblemDetails;
///
/// let problem = ProblemDetails::invalid_parameter(
///     "precision",
///     "12",
///     "[0, 8]",
///     "req-12345",
/// );
/// assert_eq!(problem.status, 400);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Name of the request parameter or DTO field that failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,

    /// URI reference identifying the specific occurrence (the request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            param: None,
            instance: None,
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Name the parameter or field that caused the problem.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 400 Bad Request problem for a parameter with a bad value.
    ///
    /// `expected` describes the accepted values, e.g. `"[0, 8]"` or a list of
    /// territory codes.
    pub fn invalid_parameter(
        param: &str,
        value: &str,
        expected: &str,
        request_id: impl Into<String>,
    ) -> Self {
        Self::new(
            PROBLEM_INVALID_PARAMETER,
            "Invalid Parameter",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(format!(
            "Parameter '{param}' has invalid value '{value}', expected: {expected}"
        ))
        .with_param(param)
        .with_request_id(request_id)
    }

    /// Create a 403 Forbidden problem for collection endpoints called without
    /// their required path parameters.
    pub fn missing_path_parameters(expected: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_MISSING_PATH_PARAMETERS,
            "Missing Path Parameters",
            StatusCode::FORBIDDEN,
        )
        .with_detail(format!("Missing URL path parameters: {expected}"))
        .with_request_id(request_id)
    }

    /// Create a 403 Forbidden problem for a rejected API key.
    pub fn invalid_api_key(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_API_KEY,
            "Invalid API Key",
            StatusCode::FORBIDDEN,
        )
        .with_detail("The supplied API key is not valid")
        .with_param("apiKey")
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem.
    pub fn not_found(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_NOT_FOUND, "Not Found", StatusCode::NOT_FOUND)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Implement IntoResponse for axum to return ProblemDetails as HTTP responses.
impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't
/// carry one.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::UnknownTerritory { name } => ProblemDetails::invalid_parameter(
            "territory",
            name,
            &mapcode_lib::valid_territory_codes(),
            request_id,
        ),
        LibError::AmbiguousTerritory { name, candidates } => ProblemDetails::invalid_parameter(
            "territory",
            name,
            &format!("one of the unambiguous codes: {}", candidates.join(", ")),
            request_id,
        ),
        LibError::UnknownAlphabet { name } => ProblemDetails::invalid_parameter(
            "alphabet",
            name,
            "an alphabet name or its numeric code",
            request_id,
        ),
        LibError::PrecisionOutOfRange { value, min, max } => ProblemDetails::invalid_parameter(
            "precision",
            &value.to_string(),
            &format!("[{min}, {max}]"),
            request_id,
        ),
        LibError::LatitudeOutOfRange { lat } => ProblemDetails::invalid_parameter(
            "lat",
            &lat.to_string(),
            "[-90.0, 90.0]",
            request_id,
        ),
        LibError::InvalidMapcodeFormat { code } => ProblemDetails::invalid_parameter(
            "mapcode",
            code,
            "a mapcode, optionally prefixed with a territory code",
            request_id,
        ),
        LibError::UnknownMapcode { code, context } => ProblemDetails::new(
            PROBLEM_UNKNOWN_MAPCODE,
            "Unknown Mapcode",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("Mapcode '{code}' cannot be decoded in territory '{context}'"))
        .with_request_id(request_id),
        LibError::NoLocalMapcode { lat, lon } => ProblemDetails::not_found(
            format!("No local mapcode exists for ({lat}, {lon}) in the requested territory"),
            request_id,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_names_the_param() {
        let problem = ProblemDetails::invalid_parameter("precision", "12", "[0, 8]", "req-1");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.param.as_deref(), Some("precision"));
        assert!(problem.detail.as_deref().unwrap().contains("'12'"));
        assert_eq!(problem.instance.as_deref(), Some("req-1"));
    }

    #[test]
    fn missing_path_parameters_is_forbidden() {
        let problem = ProblemDetails::missing_path_parameters("/{lat,lon}/{type}", "req-2");
        assert_eq!(problem.status, 403);
        assert!(problem
            .detail
            .as_deref()
            .unwrap()
            .contains("/{lat,lon}/{type}"));
    }

    #[test]
    fn invalid_api_key_is_forbidden() {
        let problem = ProblemDetails::invalid_api_key("req-3");
        assert_eq!(problem.status, 403);
        assert_eq!(problem.param.as_deref(), Some("apiKey"));
    }

    #[test]
    fn serialization_uses_rfc9457_member_names() {
        let problem = ProblemDetails::invalid_parameter("territory", "ZZ", "codes", "req-4");
        let json = serde_json::to_string(&problem).unwrap();

        assert!(json.contains("\"type\":\"/problems/invalid-parameter\""));
        assert!(json.contains("\"title\":\"Invalid Parameter\""));
        assert!(json.contains("\"status\":400"));
        assert!(json.contains("\"param\":\"territory\""));
        assert!(json.contains("\"instance\":\"req-4\""));
    }

    #[test]
    fn lib_unknown_territory_maps_to_400() {
        let error = LibError::UnknownTerritory {
            name: "XYZ".to_string(),
        };
        let problem = from_lib_error(&error, "req-5");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.param.as_deref(), Some("territory"));
        assert!(problem.detail.as_deref().unwrap().contains("NLD"));
    }

    #[test]
    fn lib_unknown_mapcode_maps_to_404() {
        let error = LibError::UnknownMapcode {
            code: "XX.XX".to_string(),
            context: "AAA".to_string(),
        };
        let problem = from_lib_error(&error, "req-6");
        assert_eq!(problem.status, 404);
        assert_eq!(problem.type_uri, PROBLEM_UNKNOWN_MAPCODE);
    }

    #[test]
    fn lib_ambiguous_territory_lists_candidates() {
        let error = LibError::AmbiguousTerritory {
            name: "CA".to_string(),
            candidates: vec!["US-CA".to_string(), "CAN".to_string()],
        };
        let problem = from_lib_error(&error, "req-7");
        assert_eq!(problem.status, 400);
        assert!(problem.detail.as_deref().unwrap().contains("US-CA"));
        assert!(problem.detail.as_deref().unwrap().contains("CAN"));
    }
}
