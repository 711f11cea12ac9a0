//! REST payload types and their validation.
//!
//! Every DTO implements [`Validate`], which checks required fields, the length
//! and numeric bounds from [`crate::constants`], and nested DTOs recursively.
//! Handlers validate each DTO before returning it as an internal consistency
//! check; a violation names the failing field in the resulting problem.

use serde::{Deserialize, Serialize};

use mapcode_lib::{Alphabet, GeoPoint, GeoRect, Territory};

use crate::constants::{
    API_LAT_MAX, API_LAT_MIN, API_MAPCODE_LEN_MAX, API_MAPCODE_LEN_MIN, API_NAME_LEN_MAX,
    API_NAME_LEN_MIN, API_TERRITORY_LEN_MAX, API_TERRITORY_LEN_MIN, API_VERSION_LEN_MAX,
    API_VERSION_LEN_MIN,
};
use crate::ProblemDetails;

/// Validation trait for response payloads.
///
/// The `request_id` populates the `instance` field of any returned problem.
/// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
pub trait Validate {
    /// Validate the payload, returning an error naming the failing field.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

fn check_string_len(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    request_id: &str,
) -> Result<(), Box<ProblemDetails>> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(Box::new(ProblemDetails::invalid_parameter(
            field,
            value,
            &format!("a string of length [{min}, {max}]"),
            request_id,
        )));
    }
    Ok(())
}

/// A single mapcode, optionally with its transliteration, territory, offset
/// from the requested point, and cell rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "mapcode", rename_all = "camelCase")]
pub struct MapcodeDto {
    pub mapcode: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapcode_in_alphabet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory_in_alphabet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_meters: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rectangle: Option<RectangleDto>,
}

impl Validate for MapcodeDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_string_len(
            "mapcode",
            &self.mapcode,
            API_MAPCODE_LEN_MIN,
            API_MAPCODE_LEN_MAX,
            request_id,
        )?;
        if let Some(in_alphabet) = &self.mapcode_in_alphabet {
            check_string_len(
                "mapcodeInAlphabet",
                in_alphabet,
                API_MAPCODE_LEN_MIN,
                API_MAPCODE_LEN_MAX,
                request_id,
            )?;
        }
        if let Some(territory) = &self.territory {
            check_string_len(
                "territory",
                territory,
                API_TERRITORY_LEN_MIN,
                API_TERRITORY_LEN_MAX,
                request_id,
            )?;
        }
        if let Some(rectangle) = &self.rectangle {
            rectangle.validate(request_id)?;
        }
        Ok(())
    }
}

/// Full encode result: the shortest local mapcode (when one territory covers
/// the point), the international mapcode, and all candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "mapcodes", rename_all = "camelCase")]
pub struct MapcodesDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<MapcodeDto>,

    pub international: MapcodeDto,

    pub mapcodes: Vec<MapcodeDto>,
}

impl Validate for MapcodesDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Some(local) = &self.local {
            local.validate(request_id)?;
        }
        self.international.validate(request_id)?;
        for mapcode in &self.mapcodes {
            mapcode.validate(request_id)?;
        }
        Ok(())
    }
}

/// List-only encode result for `type=mapcodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "mapcodes", rename_all = "camelCase")]
pub struct MapcodeListDto {
    pub mapcodes: Vec<MapcodeDto>,
}

impl Validate for MapcodeListDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        for mapcode in &self.mapcodes {
            mapcode.validate(request_id)?;
        }
        Ok(())
    }
}

/// Territory catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "territory", rename_all = "camelCase")]
pub struct TerritoryDto {
    /// Full alpha code, e.g. `US-CA`.
    pub name: String,

    /// Shortest code that is still unambiguous across the catalog.
    pub name_minimal_unambiguous: String,

    /// Shortest code, possibly ambiguous without context.
    pub name_minimal: String,

    /// Numeric territory code, bounded by the catalog size.
    pub code: usize,

    pub full_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_territory: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub full_name_aliases: Vec<String>,
}

impl TerritoryDto {
    /// Build the DTO for a catalog territory.
    pub fn from_territory(territory: &'static Territory) -> Self {
        Self {
            name: territory.alpha_code.to_string(),
            name_minimal_unambiguous: territory.alpha_code_minimal_unambiguous.to_string(),
            name_minimal: territory.alpha_code_minimal.to_string(),
            code: territory.number(),
            full_name: territory.full_name.to_string(),
            parent_territory: territory.parent.map(str::to_string),
            aliases: territory.aliases.iter().map(|s| s.to_string()).collect(),
            full_name_aliases: territory
                .full_name_aliases
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Validate for TerritoryDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_string_len(
            "name",
            &self.name,
            API_TERRITORY_LEN_MIN,
            API_TERRITORY_LEN_MAX,
            request_id,
        )?;
        if self.code >= Territory::count() {
            return Err(Box::new(ProblemDetails::invalid_parameter(
                "code",
                &self.code.to_string(),
                &format!("[0, {}]", Territory::count() - 1),
                request_id,
            )));
        }
        check_string_len(
            "fullName",
            &self.full_name,
            API_NAME_LEN_MIN,
            API_NAME_LEN_MAX,
            request_id,
        )?;
        if let Some(parent) = &self.parent_territory {
            check_string_len("parentTerritory", parent, API_NAME_LEN_MIN, API_NAME_LEN_MAX, request_id)?;
        }
        Ok(())
    }
}

/// Paged territory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "territories", rename_all = "camelCase")]
pub struct TerritoriesDto {
    /// Size of the whole catalog, not of this page.
    pub total: usize,

    pub territories: Vec<TerritoryDto>,
}

impl Validate for TerritoriesDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.total > Territory::count() {
            return Err(Box::new(ProblemDetails::invalid_parameter(
                "total",
                &self.total.to_string(),
                &format!("[0, {}]", Territory::count()),
                request_id,
            )));
        }
        for territory in &self.territories {
            territory.validate(request_id)?;
        }
        Ok(())
    }
}

/// Alphabet catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "alphabet", rename_all = "camelCase")]
pub struct AlphabetDto {
    pub name: String,

    /// Numeric alphabet code, bounded by the catalog size.
    pub number: usize,
}

impl AlphabetDto {
    /// Build the DTO for a catalog alphabet.
    pub fn from_alphabet(alphabet: Alphabet) -> Self {
        Self {
            name: alphabet.name().to_string(),
            number: alphabet.number(),
        }
    }
}

impl Validate for AlphabetDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_string_len("name", &self.name, API_NAME_LEN_MIN, API_NAME_LEN_MAX, request_id)?;
        if self.number >= Alphabet::count() {
            return Err(Box::new(ProblemDetails::invalid_parameter(
                "number",
                &self.number.to_string(),
                &format!("[0, {}]", Alphabet::count() - 1),
                request_id,
            )));
        }
        Ok(())
    }
}

/// Paged alphabet listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "alphabets", rename_all = "camelCase")]
pub struct AlphabetsDto {
    /// Size of the whole catalog, not of this page.
    pub total: usize,

    pub alphabets: Vec<AlphabetDto>,
}

impl Validate for AlphabetsDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.total > Alphabet::count() {
            return Err(Box::new(ProblemDetails::invalid_parameter(
                "total",
                &self.total.to_string(),
                &format!("[0, {}]", Alphabet::count()),
                request_id,
            )));
        }
        for alphabet in &self.alphabets {
            alphabet.validate(request_id)?;
        }
        Ok(())
    }
}

/// Service version payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "version", rename_all = "camelCase")]
pub struct VersionDto {
    pub version: String,
}

impl Validate for VersionDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_string_len(
            "version",
            &self.version,
            API_VERSION_LEN_MIN,
            API_VERSION_LEN_MAX,
            request_id,
        )
    }
}

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename = "point", rename_all = "camelCase")]
pub struct PointDto {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl From<GeoPoint> for PointDto {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat_deg: point.lat_deg,
            lon_deg: point.lon_deg,
        }
    }
}

impl Validate for PointDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        // Longitude is unbounded here; the library wraps it instead.
        if !self.lat_deg.is_finite() || self.lat_deg < API_LAT_MIN || self.lat_deg > API_LAT_MAX {
            return Err(Box::new(ProblemDetails::invalid_parameter(
                "latDeg",
                &self.lat_deg.to_string(),
                &format!("[{API_LAT_MIN}, {API_LAT_MAX}]"),
                request_id,
            )));
        }
        if !self.lon_deg.is_finite() {
            return Err(Box::new(ProblemDetails::invalid_parameter(
                "lonDeg",
                &self.lon_deg.to_string(),
                "a finite number",
                request_id,
            )));
        }
        Ok(())
    }
}

/// Decode result: the center of the encoded cell, optionally with the cell
/// rectangle itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "coordinates", rename_all = "camelCase")]
pub struct CoordinatesDto {
    pub lat_deg: f64,
    pub lon_deg: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rectangle: Option<RectangleDto>,
}

impl Validate for CoordinatesDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        PointDto {
            lat_deg: self.lat_deg,
            lon_deg: self.lon_deg,
        }
        .validate(request_id)?;
        if let Some(rectangle) = &self.rectangle {
            rectangle.validate(request_id)?;
        }
        Ok(())
    }
}

/// Axis-aligned geographic rectangle with its center point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "rectangle", rename_all = "camelCase")]
pub struct RectangleDto {
    pub south_west: PointDto,
    pub north_east: PointDto,
    pub center: PointDto,
}

impl From<&GeoRect> for RectangleDto {
    fn from(rect: &GeoRect) -> Self {
        Self {
            south_west: rect.south_west.into(),
            north_east: rect.north_east.into(),
            center: rect.center().into(),
        }
    }
}

impl Validate for RectangleDto {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        self.south_west.validate(request_id)?;
        self.north_east.validate(request_id)?;
        self.center.validate(request_id)
    }
}
