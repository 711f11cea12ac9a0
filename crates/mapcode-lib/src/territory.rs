//! Territory catalog and resolution.
//!
//! Territories carry the coding bounds used by the codec plus the naming
//! metadata exposed over REST: alpha code, minimal code variants, full name,
//! parent, aliases and the alphabets commonly used in the territory.
//!
//! The catalog is a static table; the numeric territory code is the position
//! in the table. The international territory `AAA` covers the whole earth and
//! is always last.

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};
use crate::geo::{GeoPoint, GeoRect};

/// A single territory in the catalog.
#[derive(Debug)]
pub struct Territory {
    /// Full alpha code, e.g. `NLD` or `US-CA`.
    pub alpha_code: &'static str,
    /// Shortest code that is still unambiguous across the catalog.
    pub alpha_code_minimal_unambiguous: &'static str,
    /// Shortest code, possibly ambiguous (e.g. `CA` for `US-CA`).
    pub alpha_code_minimal: &'static str,
    /// Human-readable name.
    pub full_name: &'static str,
    /// Alpha code of the parent territory for subdivisions.
    pub parent: Option<&'static str>,
    /// Alternative alpha codes.
    pub aliases: &'static [&'static str],
    /// Alternative full names.
    pub full_name_aliases: &'static [&'static str],
    /// Alphabets commonly used in the territory (Roman always included).
    pub alphabets: &'static [Alphabet],
    /// Coding bounds of the territory.
    pub bounds: GeoRect,
}

const fn rect(s: f64, w: f64, n: f64, e: f64) -> GeoRect {
    GeoRect {
        south_west: GeoPoint { lat_deg: s, lon_deg: w },
        north_east: GeoPoint { lat_deg: n, lon_deg: e },
    }
}

use Alphabet::*;

/// The full territory catalog. Subdivisions follow their parent; `AAA` is
/// always the last entry.
static TERRITORIES: &[Territory] = &[
    Territory {
        alpha_code: "VAT",
        alpha_code_minimal_unambiguous: "VAT",
        alpha_code_minimal: "VAT",
        full_name: "Vatican City",
        parent: None,
        aliases: &[],
        full_name_aliases: &["Holy See"],
        alphabets: &[Roman],
        bounds: rect(41.900, 12.445, 41.908, 12.459),
    },
    Territory {
        alpha_code: "NLD",
        alpha_code_minimal_unambiguous: "NLD",
        alpha_code_minimal: "NLD",
        full_name: "Netherlands",
        parent: None,
        aliases: &[],
        full_name_aliases: &["The Netherlands", "Holland"],
        alphabets: &[Roman],
        bounds: rect(50.75, 3.35, 53.56, 7.23),
    },
    Territory {
        alpha_code: "BEL",
        alpha_code_minimal_unambiguous: "BEL",
        alpha_code_minimal: "BEL",
        full_name: "Belgium",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(49.49, 2.54, 51.51, 6.41),
    },
    Territory {
        alpha_code: "DEU",
        alpha_code_minimal_unambiguous: "DEU",
        alpha_code_minimal: "DEU",
        full_name: "Germany",
        parent: None,
        aliases: &["GER"],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(47.27, 5.86, 55.06, 15.05),
    },
    Territory {
        alpha_code: "FRA",
        alpha_code_minimal_unambiguous: "FRA",
        alpha_code_minimal: "FRA",
        full_name: "France",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(41.33, -5.15, 51.09, 9.56),
    },
    Territory {
        alpha_code: "GBR",
        alpha_code_minimal_unambiguous: "GBR",
        alpha_code_minimal: "GBR",
        full_name: "United Kingdom",
        parent: None,
        aliases: &["UK", "GB"],
        full_name_aliases: &["Great Britain", "Britain"],
        alphabets: &[Roman],
        bounds: rect(49.86, -8.65, 60.86, 1.77),
    },
    Territory {
        alpha_code: "ESP",
        alpha_code_minimal_unambiguous: "ESP",
        alpha_code_minimal: "ESP",
        full_name: "Spain",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(35.95, -9.39, 43.79, 4.33),
    },
    Territory {
        alpha_code: "ITA",
        alpha_code_minimal_unambiguous: "ITA",
        alpha_code_minimal: "ITA",
        full_name: "Italy",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(36.62, 6.63, 47.09, 18.52),
    },
    Territory {
        alpha_code: "GRC",
        alpha_code_minimal_unambiguous: "GRC",
        alpha_code_minimal: "GRC",
        full_name: "Greece",
        parent: None,
        aliases: &[],
        full_name_aliases: &["Hellas"],
        alphabets: &[Greek, Roman],
        bounds: rect(34.80, 19.37, 41.75, 28.25),
    },
    Territory {
        alpha_code: "RUS",
        alpha_code_minimal_unambiguous: "RUS",
        alpha_code_minimal: "RUS",
        full_name: "Russia",
        parent: None,
        aliases: &[],
        full_name_aliases: &["Russian Federation"],
        alphabets: &[Cyrillic, Roman],
        bounds: rect(41.19, 19.64, 81.86, 180.0),
    },
    Territory {
        alpha_code: "ISR",
        alpha_code_minimal_unambiguous: "ISR",
        alpha_code_minimal: "ISR",
        full_name: "Israel",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Hebrew, Roman],
        bounds: rect(29.49, 34.27, 33.34, 35.90),
    },
    Territory {
        alpha_code: "SAU",
        alpha_code_minimal_unambiguous: "SAU",
        alpha_code_minimal: "SAU",
        full_name: "Saudi Arabia",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Arabic, Roman],
        bounds: rect(16.35, 34.49, 32.16, 55.67),
    },
    Territory {
        alpha_code: "IND",
        alpha_code_minimal_unambiguous: "IND",
        alpha_code_minimal: "IND",
        full_name: "India",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Devanagari, Roman],
        bounds: rect(6.55, 68.11, 35.67, 97.40),
    },
    Territory {
        alpha_code: "IN-MH",
        alpha_code_minimal_unambiguous: "MH",
        alpha_code_minimal: "MH",
        full_name: "Maharashtra",
        parent: Some("IND"),
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Devanagari, Roman],
        bounds: rect(15.60, 72.65, 22.03, 80.90),
    },
    Territory {
        alpha_code: "IN-DL",
        alpha_code_minimal_unambiguous: "DL",
        alpha_code_minimal: "DL",
        full_name: "Delhi",
        parent: Some("IND"),
        aliases: &[],
        full_name_aliases: &["National Capital Territory of Delhi"],
        alphabets: &[Devanagari, Roman],
        bounds: rect(28.40, 76.84, 28.89, 77.35),
    },
    Territory {
        alpha_code: "CHN",
        alpha_code_minimal_unambiguous: "CHN",
        alpha_code_minimal: "CHN",
        full_name: "China",
        parent: None,
        aliases: &[],
        full_name_aliases: &["People's Republic of China"],
        alphabets: &[Roman],
        bounds: rect(18.16, 73.50, 53.56, 134.77),
    },
    Territory {
        alpha_code: "JPN",
        alpha_code_minimal_unambiguous: "JPN",
        alpha_code_minimal: "JPN",
        full_name: "Japan",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Katakana, Roman],
        bounds: rect(24.04, 122.93, 45.55, 145.82),
    },
    Territory {
        alpha_code: "THA",
        alpha_code_minimal_unambiguous: "THA",
        alpha_code_minimal: "THA",
        full_name: "Thailand",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Thai, Roman],
        bounds: rect(5.61, 97.34, 20.46, 105.64),
    },
    Territory {
        alpha_code: "AUS",
        alpha_code_minimal_unambiguous: "AUS",
        alpha_code_minimal: "AUS",
        full_name: "Australia",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(-43.66, 112.91, -9.10, 153.64),
    },
    Territory {
        alpha_code: "USA",
        alpha_code_minimal_unambiguous: "USA",
        alpha_code_minimal: "USA",
        full_name: "United States of America",
        parent: None,
        aliases: &["US"],
        full_name_aliases: &["United States", "America"],
        alphabets: &[Roman],
        bounds: rect(18.91, -179.15, 71.44, -66.95),
    },
    Territory {
        alpha_code: "US-CA",
        alpha_code_minimal_unambiguous: "US-CA",
        alpha_code_minimal: "CA",
        full_name: "California",
        parent: Some("USA"),
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(32.53, -124.42, 42.01, -114.13),
    },
    Territory {
        alpha_code: "US-NY",
        alpha_code_minimal_unambiguous: "NY",
        alpha_code_minimal: "NY",
        full_name: "New York",
        parent: Some("USA"),
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(40.50, -79.76, 45.02, -71.85),
    },
    Territory {
        alpha_code: "CAN",
        alpha_code_minimal_unambiguous: "CAN",
        alpha_code_minimal: "CAN",
        full_name: "Canada",
        parent: None,
        // "CA" collides with US-CA's minimal code; resolution requires context.
        aliases: &["CA"],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(41.68, -141.00, 83.11, -52.62),
    },
    Territory {
        alpha_code: "MEX",
        alpha_code_minimal_unambiguous: "MEX",
        alpha_code_minimal: "MEX",
        full_name: "Mexico",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(14.53, -118.45, 32.72, -86.71),
    },
    Territory {
        alpha_code: "BRA",
        alpha_code_minimal_unambiguous: "BRA",
        alpha_code_minimal: "BRA",
        full_name: "Brazil",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(-33.75, -73.99, 5.27, -28.85),
    },
    Territory {
        alpha_code: "ATA",
        alpha_code_minimal_unambiguous: "ATA",
        alpha_code_minimal: "ATA",
        full_name: "Antarctica",
        parent: None,
        aliases: &[],
        full_name_aliases: &[],
        alphabets: &[Roman],
        bounds: rect(-90.0, -180.0, -60.0, 180.0),
    },
    Territory {
        alpha_code: "AAA",
        alpha_code_minimal_unambiguous: "AAA",
        alpha_code_minimal: "AAA",
        full_name: "International",
        parent: None,
        aliases: &["WORLD", "EARTH"],
        full_name_aliases: &["Worldwide", "Earth"],
        alphabets: &[Roman],
        bounds: rect(-90.0, -180.0, 90.0, 180.0),
    },
];

impl Territory {
    /// All territories, in numeric-code order. `AAA` is the last entry.
    pub fn all() -> &'static [Territory] {
        TERRITORIES
    }

    /// Number of territories in the catalog.
    pub fn count() -> usize {
        TERRITORIES.len()
    }

    /// The international territory `AAA`.
    pub fn international() -> &'static Territory {
        &TERRITORIES[TERRITORIES.len() - 1]
    }

    /// Whether this is the international territory.
    pub fn is_international(&self) -> bool {
        self.alpha_code == "AAA"
    }

    /// Numeric territory code (position in the catalog).
    pub fn number(&self) -> usize {
        TERRITORIES
            .iter()
            .position(|t| std::ptr::eq(t, self))
            .unwrap_or_else(|| {
                TERRITORIES
                    .iter()
                    .position(|t| t.alpha_code == self.alpha_code)
                    .expect("territory not in catalog")
            })
    }

    /// Parent territory for subdivisions.
    pub fn parent_territory(&self) -> Option<&'static Territory> {
        self.parent.and_then(Self::find_exact)
    }

    /// The top-level territory for this entry: the parent for subdivisions,
    /// self otherwise.
    pub fn root(&'static self) -> &'static Territory {
        self.parent_territory().unwrap_or(self)
    }

    /// Whether the coding bounds contain the point.
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.bounds.contains(point)
    }

    /// Look up a territory by its exact alpha code.
    pub fn find_exact(alpha_code: &str) -> Option<&'static Territory> {
        TERRITORIES.iter().find(|t| t.alpha_code == alpha_code)
    }

    /// Resolve a territory from user input.
    ///
    /// Accepts the full alpha code, the numeric code, an alias, a full name
    /// (or full-name alias), or a minimal code. Matching is case-insensitive
    /// and treats `_` and `-` as equivalent. Minimal codes that are ambiguous
    /// are resolved through `context` (matched against the candidate's
    /// top-level territory); without a disambiguating context they produce
    /// [`Error::AmbiguousTerritory`].
    pub fn resolve(input: &str, context: Option<&'static Territory>) -> Result<&'static Territory> {
        let normalized = input.trim().to_ascii_uppercase().replace('_', "-");
        if normalized.is_empty() {
            return Err(Error::UnknownTerritory {
                name: input.to_string(),
            });
        }

        // Exact alpha code.
        if let Some(t) = Self::find_exact(&normalized) {
            return Ok(t);
        }

        // Numeric code.
        if let Ok(number) = normalized.parse::<usize>() {
            return TERRITORIES.get(number).ok_or_else(|| Error::UnknownTerritory {
                name: input.to_string(),
            });
        }

        // Full name or full-name alias.
        if let Some(t) = TERRITORIES.iter().find(|t| {
            t.full_name.eq_ignore_ascii_case(input.trim())
                || t.full_name_aliases
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(input.trim()))
        }) {
            return Ok(t);
        }

        // Minimal codes and aliases, disambiguated by context.
        let candidates: Vec<&'static Territory> = TERRITORIES
            .iter()
            .filter(|t| {
                t.alpha_code_minimal == normalized
                    || t.alpha_code_minimal_unambiguous == normalized
                    || t.aliases.contains(&normalized.as_str())
            })
            .collect();

        match candidates.len() {
            0 => Err(Error::UnknownTerritory {
                name: input.to_string(),
            }),
            1 => Ok(candidates[0]),
            _ => {
                if let Some(context) = context {
                    let root = context.root();
                    if let Some(t) = candidates
                        .iter()
                        .find(|t| std::ptr::eq(t.root(), root))
                    {
                        return Ok(t);
                    }
                }
                Err(Error::AmbiguousTerritory {
                    name: input.to_string(),
                    candidates: candidates.iter().map(|t| t.alpha_code.to_string()).collect(),
                })
            }
        }
    }

    /// Resolve a context territory from user input, without further context.
    pub fn resolve_context(input: &str) -> Result<&'static Territory> {
        Self::resolve(input, None)
    }
}

impl PartialEq for Territory {
    fn eq(&self, other: &Self) -> bool {
        self.alpha_code == other.alpha_code
    }
}

impl std::fmt::Display for Territory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.alpha_code)
    }
}

/// A `|`-joined list of all valid alpha codes, used in error messages.
pub fn valid_territory_codes() -> String {
    TERRITORIES
        .iter()
        .map(|t| t.alpha_code)
        .collect::<Vec<_>>()
        .join("|")
}
