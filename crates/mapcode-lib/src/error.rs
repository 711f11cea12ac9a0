use thiserror::Error;

/// Convenient result alias for the mapcode library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a territory name or code could not be resolved.
    #[error("unknown territory: {name}")]
    UnknownTerritory { name: String },

    /// Raised when a minimal territory code matches more than one territory
    /// and no context was given to disambiguate it.
    #[error("ambiguous territory code {name}; candidates: {}", candidates.join(", "))]
    AmbiguousTerritory {
        name: String,
        candidates: Vec<String>,
    },

    /// Raised when an alphabet name or index could not be resolved.
    #[error("unknown alphabet: {name}")]
    UnknownAlphabet { name: String },

    /// Raised when a precision value falls outside [{min}, {max}].
    #[error("precision {value} out of range [{min}, {max}]")]
    PrecisionOutOfRange { value: i32, min: u8, max: u8 },

    /// Raised when a latitude falls outside [-90, 90].
    #[error("latitude {lat} out of range [-90, 90]")]
    LatitudeOutOfRange { lat: f64 },

    /// Raised when a string does not look like a mapcode at all.
    #[error("invalid mapcode format: {code}")]
    InvalidMapcodeFormat { code: String },

    /// Raised when a syntactically valid mapcode does not decode to a
    /// location for the given territory context.
    #[error("unknown mapcode {code} for context {context}")]
    UnknownMapcode { code: String, context: String },

    /// Raised when no local mapcode exists for a coordinate.
    #[error("no local mapcode for lat={lat}, lon={lon}")]
    NoLocalMapcode { lat: f64, lon: f64 },
}
