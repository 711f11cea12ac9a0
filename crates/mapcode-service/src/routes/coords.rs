//! Mapcode to lat/lon conversion endpoints.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use mapcode_lib::{decode, decode_to_rect, is_valid_mapcode_format, Territory};
use mapcode_service_shared::dto::{CoordinatesDto, RectangleDto, Validate};
use mapcode_service_shared::{
    extract_or_generate_request_id, from_lib_error, AppState, ProblemDetails, Reply,
};

use crate::format::Format;

#[derive(Debug, Default, Deserialize)]
pub struct CoordsQuery {
    context: Option<String>,
    include: Option<String>,
    territory: Option<String>,
}

/// `GET /mapcode/coords`: forbidden, the full result set is intractable.
pub async fn coords_forbidden(headers: HeaderMap) -> ProblemDetails {
    let request_id = extract_or_generate_request_id(&headers);
    ProblemDetails::missing_path_parameters("/{mapcode}", request_id.as_str())
}

/// `GET /mapcode/coords/{mapcode}`.
pub async fn coords(
    State(state): State<AppState>,
    Format(format): Format,
    headers: HeaderMap,
    Path(code): Path<String>,
    Query(query): Query<CoordsQuery>,
) -> Result<Response, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);
    let rid = request_id.as_str();

    state.metrics().add_one_mapcode_to_lat_lon_request();

    tracing::info!(
        request_id = %request_id,
        code = %code,
        context = query.context.as_deref().unwrap_or("-"),
        "convert mapcode to lat/lon"
    );

    // The territory context travels in `context` here; `territory` belongs to
    // the encode endpoint only.
    if let Some(territory) = &query.territory {
        return Err(ProblemDetails::invalid_parameter(
            "territory",
            territory,
            "no value (use 'context' on this endpoint)",
            rid,
        ));
    }

    let context = match query.context.as_deref() {
        Some(name) => {
            Some(Territory::resolve_context(name).map_err(|e| {
                let mut problem = from_lib_error(&e, rid);
                problem.param = Some("context".to_string());
                problem
            })?)
        }
        None => None,
    };

    let include_rectangle = match query.include.as_deref() {
        None => false,
        Some(raw) if raw.trim().eq_ignore_ascii_case("rectangle") => true,
        Some(raw) if raw.trim().is_empty() => false,
        Some(raw) => {
            return Err(ProblemDetails::invalid_parameter(
                "include",
                raw,
                "rectangle",
                rid,
            ))
        }
    };

    if !is_valid_mapcode_format(&code) {
        return Err(ProblemDetails::invalid_parameter(
            "mapcode",
            &code,
            "[XXX] XX.XX[-XX]",
            rid,
        ));
    }

    let point = decode(&code, context).map_err(|e| from_lib_error(&e, rid))?;
    let rectangle = if include_rectangle {
        decode_to_rect(&code, context)
            .ok()
            .map(|rect| RectangleDto::from(&rect))
    } else {
        None
    };

    let dto = CoordinatesDto {
        lat_deg: point.lat_deg,
        lon_deg: point.lon_deg,
        rectangle,
    };
    dto.validate(rid).map_err(|problem| {
        tracing::error!(problem = %problem, "response failed validation");
        ProblemDetails::internal_error("Response validation failed", rid)
    })?;

    state.metrics().add_one_valid_mapcode_to_lat_lon_request();
    Ok(Reply::new(format, dto).into_response())
}
