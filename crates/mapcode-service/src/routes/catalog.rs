//! Territory and alphabet catalog endpoints.

use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use mapcode_lib::{Alphabet, Territory};
use mapcode_service_shared::constants::API_DEFAULT_COUNT;
use mapcode_service_shared::dto::{
    AlphabetDto, AlphabetsDto, TerritoriesDto, TerritoryDto, Validate,
};
use mapcode_service_shared::{extract_or_generate_request_id, from_lib_error, ProblemDetails, Reply};

use crate::format::Format;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    offset: Option<String>,
    count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TerritoryQuery {
    context: Option<String>,
}

/// Resolve a page `[from, to)` over a catalog of `len` items.
///
/// A negative offset counts from the end of the catalog.
fn page_bounds(
    query: &PageQuery,
    len: usize,
    request_id: &str,
) -> Result<(usize, usize), ProblemDetails> {
    let offset: i64 = match query.offset.as_deref() {
        None => 0,
        Some(raw) => raw.trim().parse().map_err(|_| {
            ProblemDetails::invalid_parameter("offset", raw, "an integer", request_id)
        })?,
    };
    let count: i64 = match query.count.as_deref() {
        None => API_DEFAULT_COUNT as i64,
        Some(raw) => raw.trim().parse().map_err(|_| {
            ProblemDetails::invalid_parameter("count", raw, "a non-negative integer", request_id)
        })?,
    };
    if count < 0 {
        return Err(ProblemDetails::invalid_parameter(
            "count",
            &count.to_string(),
            &format!("[0, {}]", i64::MAX),
            request_id,
        ));
    }

    let len = len as i64;
    let from = if offset < 0 {
        (len + offset).max(0)
    } else {
        offset.min(len)
    };
    let to = from.saturating_add(count).min(len);
    Ok((from as usize, to as usize))
}

/// `GET /mapcode/territories`.
pub async fn territories(
    Format(format): Format,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Response, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);
    let rid = request_id.as_str();

    let catalog = Territory::all();
    let (from, to) = page_bounds(&query, catalog.len(), rid)?;

    let dto = TerritoriesDto {
        total: catalog.len(),
        territories: catalog[from..to]
            .iter()
            .map(TerritoryDto::from_territory)
            .collect(),
    };
    validated(&dto, rid)?;
    Ok(Reply::new(format, dto).into_response())
}

/// `GET /mapcode/territories/{territory}`.
pub async fn territory(
    Format(format): Format,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(query): Query<TerritoryQuery>,
) -> Result<Response, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);
    let rid = request_id.as_str();

    let context = match query.context.as_deref() {
        Some(raw) => Some(Territory::resolve_context(raw).map_err(|e| {
            let mut problem = from_lib_error(&e, rid);
            problem.param = Some("context".to_string());
            problem
        })?),
        None => None,
    };

    let territory =
        Territory::resolve(&name, context).map_err(|e| from_lib_error(&e, rid))?;

    let dto = TerritoryDto::from_territory(territory);
    validated(&dto, rid)?;
    Ok(Reply::new(format, dto).into_response())
}

/// `GET /mapcode/alphabets`.
pub async fn alphabets(
    Format(format): Format,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Response, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);
    let rid = request_id.as_str();

    let catalog = Alphabet::all();
    let (from, to) = page_bounds(&query, catalog.len(), rid)?;

    let dto = AlphabetsDto {
        total: catalog.len(),
        alphabets: catalog[from..to]
            .iter()
            .map(|&a| AlphabetDto::from_alphabet(a))
            .collect(),
    };
    validated(&dto, rid)?;
    Ok(Reply::new(format, dto).into_response())
}

/// `GET /mapcode/alphabets/{alphabet}`.
pub async fn alphabet(
    Format(format): Format,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Response, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);
    let rid = request_id.as_str();

    let alphabet = Alphabet::resolve(&name).map_err(|e| from_lib_error(&e, rid))?;

    let dto = AlphabetDto::from_alphabet(alphabet);
    validated(&dto, rid)?;
    Ok(Reply::new(format, dto).into_response())
}

fn validated<T: Validate>(dto: &T, request_id: &str) -> Result<(), ProblemDetails> {
    dto.validate(request_id).map_err(|problem| {
        tracing::error!(problem = %problem, "response failed validation");
        ProblemDetails::internal_error("Response validation failed", request_id)
    })
}
