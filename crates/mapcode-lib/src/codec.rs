//! Mapcode grid codec.
//!
//! Encodes a coordinate into short cell codes over territory coding bounds
//! and decodes them back to the cell center. Local codes quantize a territory
//! into a 961x961 grid (`RR.CC`, two base-31 digits per axis); the
//! international code uses three digits per axis over the whole earth
//! (`RRR.CCC`). Precision characters (`-X...`, up to eight) each subdivide
//! the cell into a 5x6 sub-grid, mirroring how mapcode high-precision
//! extensions behave.
//!
//! The codec is deterministic and invertible: `decode(encode(p))` always
//! lies within the encoded cell, and the offset to `p` shrinks as precision
//! grows.

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};
use crate::geo::{wrap_lon, GeoPoint, GeoRect};
use crate::territory::Territory;

/// The mapcode character set: digits plus consonants, 31 symbols.
const BASE31: &[u8; 31] = b"0123456789BCDFGHJKLMNPQRSTVWXYZ";

/// Digits per axis for local codes (`RR.CC`).
const LOCAL_DIGITS: usize = 2;

/// Digits per axis for the international code (`RRR.CCC`).
const INTERNATIONAL_DIGITS: usize = 3;

/// Precision range accepted by the codec.
pub const PRECISION_MIN: u8 = 0;
pub const PRECISION_MAX: u8 = 8;

/// Sub-grid shape per precision character (5 lat x 6 lon = 30 values).
const EXT_LAT_DIV: f64 = 5.0;
const EXT_LON_DIV: f64 = 6.0;

/// A mapcode: the code string plus the territory it is valid in.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapcode {
    code: String,
    territory: &'static Territory,
}

impl Mapcode {
    /// The code without territory prefix, e.g. `XQ.PZ` or `XQ.PZ-3F`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The territory this code is valid in.
    pub fn territory(&self) -> &'static Territory {
        self.territory
    }

    /// The code transliterated into the given alphabet.
    pub fn code_in(&self, alphabet: Alphabet) -> String {
        alphabet.transliterate(&self.code)
    }

    /// The full code including territory prefix, e.g. `NLD XQ.PZ`.
    /// International codes carry no prefix.
    pub fn full_code(&self) -> String {
        if self.territory.is_international() {
            self.code.clone()
        } else {
            format!("{} {}", self.territory.alpha_code, self.code)
        }
    }
}

impl std::fmt::Display for Mapcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_code())
    }
}

fn digit_value(c: u8) -> Option<u32> {
    BASE31.iter().position(|&b| b == c).map(|i| i as u32)
}

fn encode_axis(fraction: f64, digits: usize) -> (String, f64) {
    let cells = 31u64.pow(digits as u32) as f64;
    let scaled = (fraction * cells).min(cells - 1.0).max(0.0);
    let mut index = scaled.floor() as u64;
    let remainder = scaled - scaled.floor();

    let mut out = vec![b'0'; digits];
    for slot in out.iter_mut().rev() {
        *slot = BASE31[(index % 31) as usize];
        index /= 31;
    }
    (String::from_utf8(out).expect("base-31 output is ASCII"), remainder)
}

fn decode_axis(digits: &str) -> Option<u64> {
    let mut index = 0u64;
    for &b in digits.as_bytes() {
        index = index * 31 + u64::from(digit_value(b)?);
    }
    Some(index)
}

fn validate_precision(precision: u8) -> Result<()> {
    if precision > PRECISION_MAX {
        return Err(Error::PrecisionOutOfRange {
            value: i32::from(precision),
            min: PRECISION_MIN,
            max: PRECISION_MAX,
        });
    }
    Ok(())
}

fn validate_lat(lat_deg: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat_deg) || lat_deg.is_nan() {
        return Err(Error::LatitudeOutOfRange { lat: lat_deg });
    }
    Ok(())
}

/// Encode a point into a single code within the given territory bounds.
fn encode_in(point: GeoPoint, territory: &'static Territory, precision: u8) -> Mapcode {
    let bounds = territory.bounds;
    let digits = if territory.is_international() {
        INTERNATIONAL_DIGITS
    } else {
        LOCAL_DIGITS
    };

    let lat_span = bounds.north_east.lat_deg - bounds.south_west.lat_deg;
    let lon_span = bounds.north_east.lon_deg - bounds.south_west.lon_deg;
    let u = ((point.lat_deg - bounds.south_west.lat_deg) / lat_span).clamp(0.0, 1.0);
    let v = ((point.lon_deg - bounds.south_west.lon_deg) / lon_span).clamp(0.0, 1.0);

    let (row, mut frac_lat) = encode_axis(u, digits);
    let (col, mut frac_lon) = encode_axis(v, digits);

    let mut code = format!("{row}.{col}");
    if precision > 0 {
        code.push('-');
        for _ in 0..precision {
            frac_lat *= EXT_LAT_DIV;
            frac_lon *= EXT_LON_DIV;
            let d_lat = (frac_lat.floor() as u32).min(EXT_LAT_DIV as u32 - 1);
            let d_lon = (frac_lon.floor() as u32).min(EXT_LON_DIV as u32 - 1);
            frac_lat -= d_lat as f64;
            frac_lon -= d_lon as f64;
            code.push(BASE31[(d_lat * EXT_LON_DIV as u32 + d_lon) as usize] as char);
        }
    }

    Mapcode {
        code,
        territory,
    }
}

/// Encode a coordinate into all applicable mapcodes.
///
/// Without a territory context this returns one local code per territory
/// whose coding bounds contain the point, most specific (smallest bounds)
/// first, followed by the international code. With a territory context the
/// result is restricted to that territory's local code plus the
/// international code; a context that does not contain the point is an
/// error.
///
/// Longitude is wrapped to [-180, 180); latitude outside [-90, 90] is
/// rejected.
pub fn encode(
    lat_deg: f64,
    lon_deg: f64,
    territory: Option<&'static Territory>,
    precision: u8,
) -> Result<Vec<Mapcode>> {
    validate_lat(lat_deg)?;
    validate_precision(precision)?;
    let point = GeoPoint::new(lat_deg, wrap_lon(lon_deg));

    let international = encode_in(point, Territory::international(), precision);

    match territory {
        Some(t) if t.is_international() => Ok(vec![international]),
        Some(t) => {
            if !t.contains(point) {
                return Err(Error::NoLocalMapcode {
                    lat: point.lat_deg,
                    lon: point.lon_deg,
                });
            }
            Ok(vec![encode_in(point, t, precision), international])
        }
        None => {
            let mut locals: Vec<&'static Territory> = Territory::all()
                .iter()
                .filter(|t| !t.is_international() && t.contains(point))
                .collect();
            locals.sort_by(|a, b| {
                let area = |t: &Territory| {
                    (t.bounds.north_east.lat_deg - t.bounds.south_west.lat_deg)
                        * (t.bounds.north_east.lon_deg - t.bounds.south_west.lon_deg)
                };
                area(a).partial_cmp(&area(b)).unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut result: Vec<Mapcode> = locals
                .into_iter()
                .map(|t| encode_in(point, t, precision))
                .collect();
            result.push(international);
            Ok(result)
        }
    }
}

/// Encode a coordinate into its international mapcode.
pub fn encode_to_international(lat_deg: f64, lon_deg: f64, precision: u8) -> Result<Mapcode> {
    validate_lat(lat_deg)?;
    validate_precision(precision)?;
    let point = GeoPoint::new(lat_deg, wrap_lon(lon_deg));
    Ok(encode_in(point, Territory::international(), precision))
}

/// Encode a coordinate into its shortest mapcode: the most specific local
/// code when one exists, otherwise the international code. With an explicit
/// non-international territory that has no local code for the point, this is
/// an error.
pub fn encode_to_shortest(
    lat_deg: f64,
    lon_deg: f64,
    territory: Option<&'static Territory>,
    precision: u8,
) -> Result<Mapcode> {
    let mut all = encode(lat_deg, lon_deg, territory, precision)?;
    Ok(all.remove(0))
}

/// Parsed form of a mapcode string.
struct ParsedCode {
    territory_prefix: Option<String>,
    lat_digits: String,
    lon_digits: String,
    extension: String,
}

fn parse_code(code: &str) -> Option<ParsedCode> {
    let cleaned = code.trim().to_ascii_uppercase();

    let (territory_prefix, payload) = match cleaned.split_once(' ') {
        Some((prefix, rest)) => (Some(prefix.to_string()), rest.trim().to_string()),
        None => (None, cleaned),
    };

    let (cells, extension) = match payload.split_once('-') {
        Some((cells, ext)) => (cells.to_string(), ext.to_string()),
        None => (payload, String::new()),
    };
    if extension.len() > PRECISION_MAX as usize {
        return None;
    }
    if !extension.bytes().all(|b| digit_value(b).is_some()) {
        return None;
    }

    let (lat_digits, lon_digits) = cells.split_once('.')?;
    let valid_shape = (lat_digits.len() == LOCAL_DIGITS && lon_digits.len() == LOCAL_DIGITS)
        || (lat_digits.len() == INTERNATIONAL_DIGITS && lon_digits.len() == INTERNATIONAL_DIGITS);
    if !valid_shape {
        return None;
    }
    if !lat_digits.bytes().all(|b| digit_value(b).is_some())
        || !lon_digits.bytes().all(|b| digit_value(b).is_some())
    {
        return None;
    }

    Some(ParsedCode {
        territory_prefix,
        lat_digits: lat_digits.to_string(),
        lon_digits: lon_digits.to_string(),
        extension,
    })
}

/// Whether a string is syntactically a mapcode (optionally with a territory
/// prefix). This checks the shape only, not decodability.
pub fn is_valid_mapcode_format(code: &str) -> bool {
    match parse_code(code) {
        Some(parsed) => match parsed.territory_prefix {
            Some(prefix) => Territory::resolve_context(&prefix).is_ok(),
            None => true,
        },
        None => false,
    }
}

/// Decode a mapcode to the rectangle of its cell.
///
/// A territory prefix embedded in the code takes precedence over `context`.
/// Local codes (`RR.CC`) require a non-international territory; the
/// international shape (`RRR.CCC`) always decodes against the whole earth.
pub fn decode_to_rect(code: &str, context: Option<&'static Territory>) -> Result<GeoRect> {
    let parsed = parse_code(code).ok_or_else(|| Error::InvalidMapcodeFormat {
        code: code.to_string(),
    })?;

    let embedded = match &parsed.territory_prefix {
        Some(prefix) => {
            Some(
                Territory::resolve(prefix, context).map_err(|_| Error::InvalidMapcodeFormat {
                    code: code.to_string(),
                })?,
            )
        }
        None => None,
    };

    let international_shape = parsed.lat_digits.len() == INTERNATIONAL_DIGITS;
    let territory = if international_shape {
        Territory::international()
    } else {
        match embedded.or(context) {
            Some(t) if !t.is_international() => t,
            _ => {
                return Err(Error::UnknownMapcode {
                    code: code.to_string(),
                    context: "AAA".to_string(),
                })
            }
        }
    };

    let digits = parsed.lat_digits.len();
    let cells = 31u64.pow(digits as u32) as f64;
    let row = decode_axis(&parsed.lat_digits).ok_or_else(|| Error::InvalidMapcodeFormat {
        code: code.to_string(),
    })?;
    let col = decode_axis(&parsed.lon_digits).ok_or_else(|| Error::InvalidMapcodeFormat {
        code: code.to_string(),
    })?;

    let bounds = territory.bounds;
    let lat_span = bounds.north_east.lat_deg - bounds.south_west.lat_deg;
    let lon_span = bounds.north_east.lon_deg - bounds.south_west.lon_deg;

    let mut lat0 = bounds.south_west.lat_deg + lat_span * (row as f64 / cells);
    let mut lon0 = bounds.south_west.lon_deg + lon_span * (col as f64 / cells);
    let mut lat_size = lat_span / cells;
    let mut lon_size = lon_span / cells;

    for &b in parsed.extension.as_bytes() {
        let value = digit_value(b).expect("validated in parse_code");
        if value >= (EXT_LAT_DIV * EXT_LON_DIV) as u32 {
            return Err(Error::InvalidMapcodeFormat {
                code: code.to_string(),
            });
        }
        let d_lat = value / EXT_LON_DIV as u32;
        let d_lon = value % EXT_LON_DIV as u32;
        lat_size /= EXT_LAT_DIV;
        lon_size /= EXT_LON_DIV;
        lat0 += lat_size * d_lat as f64;
        lon0 += lon_size * d_lon as f64;
    }

    Ok(GeoRect::new(
        GeoPoint::new(lat0, lon0),
        GeoPoint::new(lat0 + lat_size, lon0 + lon_size),
    ))
}

/// Decode a mapcode to the center of its cell.
pub fn decode(code: &str, context: Option<&'static Territory>) -> Result<GeoPoint> {
    Ok(decode_to_rect(code, context)?.center())
}
