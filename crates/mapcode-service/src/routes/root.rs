//! Root resource: help text, version, status and the system metrics snapshot.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::Json;

use mapcode_service_shared::dto::{Validate, VersionDto};
use mapcode_service_shared::{
    extract_or_generate_request_id, AppState, ProblemDetails, Reply, SystemMetricsSnapshot,
};

use crate::format::Format;

const HELP_TEXT: &str = "\
MAPCODE REST SERVICES
---------------------

GET /mapcode/codes/{lat},{lon}[/mapcodes|local|international] [?precision=[0..8]&territory={territory}&alphabet={alphabet}&include={offset|territory|alphabet|rectangle}]
   Convert latitude/longitude to one or more mapcodes.

   Path parameters:
   lat             : latitude, range [-90, 90]
   lon             : longitude, any value (wrapped to [-180, 180))
   mapcodes        : return all mapcodes (most specific first)
   local           : return the shortest local mapcode
   international   : return the international mapcode

   Query parameters:
   precision       : precision, range [0, 8] (default=0)
   territory       : territory context, numeric or alpha code
   alphabet        : alphabet name or numeric code
   include         : comma-separated extras per mapcode

GET /mapcode/coords/{mapcode} [?context={territory}&include=rectangle]
   Convert a mapcode into a latitude/longitude pair.

GET /mapcode/territories [?offset={offset}&count={count}]
GET /mapcode/territories/{territory} [?context={territory}]
   Return the territory catalog, or one territory.

GET /mapcode/alphabets [?offset={offset}&count={count}]
GET /mapcode/alphabets/{alphabet}
   Return the alphabet catalog, or one alphabet.

GET /mapcode/version
GET /mapcode/status
GET /mapcode/metrics

All endpoints accept an Accept header of application/json (default) or
application/xml, and exist as /mapcode/xml/... and /mapcode/json/...
forced-format variants.

   Query parameters:
   offset          : return list from 'offset' (negative value starts counting from end)
   count           : return 'count' items at most
";

/// `GET /mapcode`: HTML help text, with the service version.
pub async fn help(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html><pre>\nMapcode REST API version {}\n\n{}</pre></html>\n",
        state.version(),
        HELP_TEXT
    ))
}

/// `GET /mapcode/version`.
pub async fn version(
    State(state): State<AppState>,
    Format(format): Format,
    headers: HeaderMap,
) -> Result<Reply<VersionDto>, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);

    let dto = VersionDto {
        version: state.version().to_string(),
    };
    dto.validate(request_id.as_str()).map_err(|problem| {
        tracing::error!(problem = %problem, "version response failed validation");
        ProblemDetails::internal_error("Response validation failed", request_id.as_str())
    })?;

    Ok(Reply::new(format, dto))
}

/// `GET /mapcode/status`: 200 with an empty body when the service is up.
pub async fn status() -> StatusCode {
    StatusCode::OK
}

/// `GET /mapcode/metrics`: JSON snapshot of the per-operation counters.
pub async fn system_metrics(State(state): State<AppState>) -> Json<SystemMetricsSnapshot> {
    Json(state.metrics().snapshot())
}
