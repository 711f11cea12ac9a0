//! Lat/lon to mapcode conversion endpoints.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use mapcode_lib::{
    decode, decode_to_rect, distance_meters, encode, encode_to_international, encode_to_shortest,
    Alphabet, GeoPoint, Mapcode, Territory,
};
use mapcode_service_shared::constants::{
    API_LAT_MAX, API_LAT_MIN, API_PRECISION_MAX, API_PRECISION_MIN,
};
use mapcode_service_shared::dto::{MapcodeDto, MapcodeListDto, MapcodesDto, RectangleDto, Validate};
use mapcode_service_shared::{
    extract_or_generate_request_id, from_lib_error, AppState, ProblemDetails, Reply, ReplyFormat,
    RequestId,
};

use crate::format::Format;

/// What the `{type}` path segment selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodesType {
    Mapcodes,
    Local,
    International,
}

impl CodesType {
    fn parse(raw: &str, request_id: &str) -> Result<Self, ProblemDetails> {
        match raw.to_ascii_lowercase().as_str() {
            "mapcodes" => Ok(CodesType::Mapcodes),
            "local" => Ok(CodesType::Local),
            "international" => Ok(CodesType::International),
            _ => Err(ProblemDetails::invalid_parameter(
                "type",
                raw,
                "mapcodes|local|international",
                request_id,
            )),
        }
    }
}

/// Parsed `include` query parameter.
#[derive(Debug, Default, Clone, Copy)]
struct Includes {
    offset: bool,
    territory: bool,
    alphabet: bool,
    rectangle: bool,
}

impl Includes {
    fn parse(raw: Option<&str>, request_id: &str) -> Result<Self, ProblemDetails> {
        let mut includes = Includes::default();
        let Some(raw) = raw else {
            return Ok(includes);
        };
        for item in raw.split(',') {
            match item.trim().to_ascii_lowercase().as_str() {
                "" => {}
                "offset" => includes.offset = true,
                "territory" => includes.territory = true,
                "alphabet" => includes.alphabet = true,
                "rectangle" => includes.rectangle = true,
                _ => {
                    return Err(ProblemDetails::invalid_parameter(
                        "include",
                        raw,
                        "offset|territory|alphabet|rectangle",
                        request_id,
                    ))
                }
            }
        }
        Ok(includes)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CodesQuery {
    precision: Option<String>,
    territory: Option<String>,
    alphabet: Option<String>,
    include: Option<String>,
    context: Option<String>,
}

/// `GET /mapcode/codes`: forbidden, the full result set is intractable.
pub async fn codes_forbidden(headers: HeaderMap) -> ProblemDetails {
    let request_id = extract_or_generate_request_id(&headers);
    ProblemDetails::missing_path_parameters(
        "/{lat},{lon}[/mapcodes|local|international]",
        request_id.as_str(),
    )
}

/// `GET /mapcode/codes/{lat},{lon}`.
pub async fn codes(
    State(state): State<AppState>,
    Format(format): Format,
    headers: HeaderMap,
    Path(lat_lon): Path<String>,
    Query(query): Query<CodesQuery>,
) -> Result<Response, ProblemDetails> {
    handle_codes(&state, format, &headers, &lat_lon, None, &query)
}

/// `GET /mapcode/codes/{lat},{lon}/{type}`.
pub async fn codes_typed(
    State(state): State<AppState>,
    Format(format): Format,
    headers: HeaderMap,
    Path((lat_lon, kind)): Path<(String, String)>,
    Query(query): Query<CodesQuery>,
) -> Result<Response, ProblemDetails> {
    handle_codes(&state, format, &headers, &lat_lon, Some(&kind), &query)
}

/// `GET /mapcode/{apiKey}/from/{lat}/{lon}/{precision}`: API-key-guarded
/// conversion to the shortest mapcode. An invalid key is rejected before any
/// parameter validation happens.
pub async fn convert_with_api_key(
    State(state): State<AppState>,
    Format(format): Format,
    headers: HeaderMap,
    Path((api_key, lat, lon, precision)): Path<(String, String, String, String)>,
) -> Result<Response, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);

    if !state.api_key_matches(&api_key) {
        tracing::warn!(request_id = %request_id, "rejected api key");
        return Err(ProblemDetails::invalid_api_key(request_id.as_str()));
    }

    state.metrics().add_one_lat_lon_to_mapcode_request();

    let lat = parse_lat(&lat, request_id.as_str())?;
    let lon = parse_lon(&lon, request_id.as_str())?;
    let precision = parse_precision(Some(&precision), request_id.as_str())?;

    let shortest = encode_to_shortest(lat, lon, None, precision)
        .map_err(|e| from_lib_error(&e, request_id.as_str()))?;

    let point = GeoPoint::new(lat, lon);
    let dto = mapcode_dto(&shortest, None, Includes::default(), point);
    validated(&dto, &request_id)?;

    state.metrics().add_one_valid_lat_lon_to_mapcode_request();
    Ok(Reply::new(format, dto).into_response())
}

fn handle_codes(
    state: &AppState,
    format: ReplyFormat,
    headers: &HeaderMap,
    lat_lon: &str,
    kind: Option<&str>,
    query: &CodesQuery,
) -> Result<Response, ProblemDetails> {
    let request_id = extract_or_generate_request_id(headers);
    let rid = request_id.as_str();

    state.metrics().add_one_lat_lon_to_mapcode_request();

    tracing::info!(
        request_id = %request_id,
        lat_lon = %lat_lon,
        kind = kind.unwrap_or("-"),
        territory = query.territory.as_deref().unwrap_or("-"),
        "convert lat/lon to mapcode"
    );

    let (lat, lon) = parse_lat_lon(lat_lon, rid)?;
    let precision = parse_precision(query.precision.as_deref(), rid)?;

    // The territory context travels in `territory` here; `context` belongs to
    // the decode endpoint only.
    if let Some(context) = &query.context {
        return Err(ProblemDetails::invalid_parameter(
            "context",
            context,
            "no value (use 'territory' on this endpoint)",
            rid,
        ));
    }

    let territory = match query.territory.as_deref() {
        Some(name) => Some(Territory::resolve(name, None).map_err(|e| from_lib_error(&e, rid))?),
        None => None,
    };
    let alphabet = match query.alphabet.as_deref() {
        Some(name) => Some(Alphabet::resolve(name).map_err(|e| from_lib_error(&e, rid))?),
        None => None,
    };
    let includes = Includes::parse(query.include.as_deref(), rid)?;
    let kind = kind.map(|raw| CodesType::parse(raw, rid)).transpose()?;

    let all = encode(lat, lon, territory, precision).map_err(|e| from_lib_error(&e, rid))?;
    let international =
        encode_to_international(lat, lon, precision).map_err(|e| from_lib_error(&e, rid))?;

    // The shortest local code only exists when exactly one territory (chain)
    // covers the point, or when the caller picked the territory explicitly.
    let mut multiple_territories = false;
    let local: Option<&Mapcode> = if territory.is_some() {
        all.first().filter(|m| !m.territory().is_international())
    } else {
        let mut locals = all.iter().filter(|m| !m.territory().is_international());
        let first = locals.next();
        if let Some(first_code) = first {
            if locals.any(|m| m.territory().root() != first_code.territory().root()) {
                multiple_territories = true;
                None
            } else {
                Some(first_code)
            }
        } else {
            None
        }
    };

    let point = GeoPoint::new(lat, lon);
    let build = |mapcode: &Mapcode| mapcode_dto(mapcode, alphabet, includes, point);

    let response = match kind {
        None => {
            let dto = MapcodesDto {
                local: local.map(build),
                international: build(&international),
                mapcodes: all.iter().map(build).collect(),
            };
            validated(&dto, &request_id)?;
            Reply::new(format, dto).into_response()
        }
        Some(CodesType::Local) => match local {
            Some(mapcode) => {
                let dto = build(mapcode);
                validated(&dto, &request_id)?;
                Reply::new(format, dto).into_response()
            }
            None => {
                let reason = if multiple_territories {
                    "Local mapcodes for multiple territories exist"
                } else {
                    "Only an international mapcode exists"
                };
                return Err(ProblemDetails::not_found(
                    format!("{reason} for ({lat}, {lon})"),
                    rid,
                ));
            }
        },
        Some(CodesType::International) => {
            let dto = build(&international);
            validated(&dto, &request_id)?;
            Reply::new(format, dto).into_response()
        }
        Some(CodesType::Mapcodes) => {
            let dto = MapcodeListDto {
                mapcodes: all.iter().map(build).collect(),
            };
            validated(&dto, &request_id)?;
            Reply::new(format, dto).into_response()
        }
    };

    state.metrics().add_one_valid_lat_lon_to_mapcode_request();
    Ok(response)
}

/// Build a `MapcodeDto` honoring the `include` and `alphabet` parameters.
///
/// The transliterated forms are emitted when explicitly requested or when
/// they differ from the Roman forms; the territory is emitted for any
/// non-international mapcode.
fn mapcode_dto(
    mapcode: &Mapcode,
    alphabet: Option<Alphabet>,
    includes: Includes,
    point: GeoPoint,
) -> MapcodeDto {
    let code = mapcode.code().to_string();
    let code_in_alphabet = mapcode.code_in(alphabet.unwrap_or(Alphabet::Roman));
    let territory = mapcode.territory();
    let territory_code = territory.alpha_code.to_string();
    let territory_in_alphabet = alphabet
        .unwrap_or(Alphabet::Roman)
        .transliterate(&territory_code);

    let show_territory = includes.territory || !territory.is_international();
    let context = Some(territory);

    let offset_meters = includes.offset.then(|| {
        decode(&code, context)
            .map(|center| {
                let meters = distance_meters(point, center);
                (meters * 1.0e6).round() / 1.0e6
            })
            .unwrap_or(0.0)
    });
    let rectangle = if includes.rectangle {
        decode_to_rect(&code, context)
            .ok()
            .map(|rect| RectangleDto::from(&rect))
    } else {
        None
    };

    MapcodeDto {
        mapcode_in_alphabet: if includes.alphabet {
            Some(code_in_alphabet)
        } else {
            (code_in_alphabet != code).then_some(code_in_alphabet)
        },
        mapcode: code,
        territory_in_alphabet: if show_territory {
            if includes.alphabet {
                Some(territory_in_alphabet)
            } else {
                (territory_in_alphabet != territory_code).then_some(territory_in_alphabet)
            }
        } else {
            None
        },
        territory: show_territory.then_some(territory_code),
        offset_meters,
        rectangle,
    }
}

fn validated<T: Validate>(dto: &T, request_id: &RequestId) -> Result<(), ProblemDetails> {
    dto.validate(request_id.as_str()).map_err(|problem| {
        tracing::error!(problem = %problem, "response failed validation");
        ProblemDetails::internal_error("Response validation failed", request_id.as_str())
    })
}

fn parse_lat_lon(raw: &str, request_id: &str) -> Result<(f64, f64), ProblemDetails> {
    let Some((lat_raw, lon_raw)) = raw.split_once(',') else {
        return Err(ProblemDetails::invalid_parameter(
            "lat,lon",
            raw,
            "{lat},{lon}",
            request_id,
        ));
    };
    Ok((parse_lat(lat_raw, request_id)?, parse_lon(lon_raw, request_id)?))
}

fn parse_lat(raw: &str, request_id: &str) -> Result<f64, ProblemDetails> {
    let lat: f64 = raw.trim().parse().map_err(|_| {
        ProblemDetails::invalid_parameter("lat", raw, "a number in [-90.0, 90.0]", request_id)
    })?;
    if !lat.is_finite() || !(API_LAT_MIN..=API_LAT_MAX).contains(&lat) {
        return Err(ProblemDetails::invalid_parameter(
            "lat",
            raw,
            &format!("[{API_LAT_MIN}, {API_LAT_MAX}]"),
            request_id,
        ));
    }
    Ok(lat)
}

fn parse_lon(raw: &str, request_id: &str) -> Result<f64, ProblemDetails> {
    // Any finite longitude is accepted; the codec wraps it.
    let lon: f64 = raw.trim().parse().map_err(|_| {
        ProblemDetails::invalid_parameter("lon", raw, "a number", request_id)
    })?;
    if !lon.is_finite() {
        return Err(ProblemDetails::invalid_parameter(
            "lon",
            raw,
            "a finite number",
            request_id,
        ));
    }
    Ok(lon)
}

fn parse_precision(raw: Option<&str>, request_id: &str) -> Result<u8, ProblemDetails> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let expected = format!("[{API_PRECISION_MIN}, {API_PRECISION_MAX}]");
    let value: i32 = raw
        .trim()
        .parse()
        .map_err(|_| ProblemDetails::invalid_parameter("precision", raw, &expected, request_id))?;
    if !(API_PRECISION_MIN..=API_PRECISION_MAX).contains(&value) {
        return Err(ProblemDetails::invalid_parameter(
            "precision",
            raw,
            &expected,
            request_id,
        ));
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lat_lon_accepts_comma_pair() {
        let (lat, lon) = parse_lat_lon("52.376514,4.908542", "req-1").unwrap();
        assert!((lat - 52.376514).abs() < 1e-9);
        assert!((lon - 4.908542).abs() < 1e-9);
    }

    #[test]
    fn parse_lat_lon_rejects_missing_comma() {
        let problem = parse_lat_lon("52.376514", "req-2").unwrap_err();
        assert_eq!(problem.status, 400);
        assert_eq!(problem.param.as_deref(), Some("lat,lon"));
    }

    #[test]
    fn parse_lat_rejects_out_of_range() {
        let problem = parse_lat("90.001", "req-3").unwrap_err();
        assert_eq!(problem.param.as_deref(), Some("lat"));
    }

    #[test]
    fn parse_lon_accepts_any_finite_value() {
        assert!(parse_lon("540.0", "req-4").is_ok());
        assert!(parse_lon("NaN", "req-4").is_err());
    }

    #[test]
    fn parse_precision_defaults_to_zero() {
        assert_eq!(parse_precision(None, "req-5").unwrap(), 0);
        assert_eq!(parse_precision(Some("8"), "req-5").unwrap(), 8);
    }

    #[test]
    fn parse_precision_rejects_out_of_range() {
        let problem = parse_precision(Some("9"), "req-6").unwrap_err();
        assert_eq!(problem.param.as_deref(), Some("precision"));
        let problem = parse_precision(Some("-1"), "req-6").unwrap_err();
        assert_eq!(problem.param.as_deref(), Some("precision"));
    }

    #[test]
    fn includes_parse_is_case_insensitive() {
        let includes = Includes::parse(Some("Offset,TERRITORY"), "req-7").unwrap();
        assert!(includes.offset);
        assert!(includes.territory);
        assert!(!includes.alphabet);
        assert!(!includes.rectangle);
    }

    #[test]
    fn includes_parse_rejects_unknown_value() {
        let problem = Includes::parse(Some("offset,bogus"), "req-8").unwrap_err();
        assert_eq!(problem.param.as_deref(), Some("include"));
    }

    #[test]
    fn codes_type_parse() {
        assert_eq!(
            CodesType::parse("LOCAL", "req-9").unwrap(),
            CodesType::Local
        );
        assert!(CodesType::parse("everything", "req-9").is_err());
    }

    #[test]
    fn dto_omits_territory_for_international_code() {
        let mapcode = encode_to_international(52.4, 4.9, 0).unwrap();
        let dto = mapcode_dto(&mapcode, None, Includes::default(), GeoPoint::new(52.4, 4.9));
        assert!(dto.territory.is_none());
        assert!(dto.mapcode_in_alphabet.is_none());
    }

    #[test]
    fn dto_offset_is_small_for_encoded_point() {
        let point = GeoPoint::new(52.376514, 4.908542);
        let mapcode = encode_to_shortest(point.lat_deg, point.lon_deg, None, 8).unwrap();
        let includes = Includes {
            offset: true,
            ..Includes::default()
        };
        let dto = mapcode_dto(&mapcode, None, includes, point);
        assert!(dto.offset_meters.unwrap() < 1.0);
    }

    #[test]
    fn dto_reports_transliteration_when_requested() {
        let point = GeoPoint::new(37.9838, 23.7275);
        let greece = Territory::find_exact("GRC").unwrap();
        let mapcode = encode_to_shortest(point.lat_deg, point.lon_deg, Some(greece), 0).unwrap();
        let includes = Includes {
            alphabet: true,
            ..Includes::default()
        };
        let dto = mapcode_dto(&mapcode, Some(Alphabet::Greek), includes, point);
        assert!(dto.mapcode_in_alphabet.is_some());
        assert_eq!(dto.territory.as_deref(), Some("GRC"));
    }
}
