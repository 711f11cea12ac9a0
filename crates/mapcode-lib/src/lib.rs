//! Mapcode domain library.
//!
//! This crate provides everything the mapcode REST service needs below the
//! HTTP layer:
//!
//! - [`territory`]: the territory catalog (alpha codes, aliases, parents,
//!   coding bounds) and name resolution
//! - [`alphabet`]: the alphabet catalog and mapcode transliteration
//! - [`codec`]: encoding coordinates to mapcodes and decoding them back
//! - [`geo`]: points, rectangles, longitude wrapping and distances
//!
//! The crate contains no HTTP types; the service crates layer request
//! validation and serialization on top of it.

#![deny(warnings)]

pub mod alphabet;
pub mod codec;
mod error;
pub mod geo;
pub mod territory;

pub use alphabet::Alphabet;
pub use codec::{
    decode, decode_to_rect, encode, encode_to_international, encode_to_shortest,
    is_valid_mapcode_format, Mapcode, PRECISION_MAX, PRECISION_MIN,
};
pub use error::{Error, Result};
pub use geo::{distance_meters, wrap_lon, GeoPoint, GeoRect};
pub use territory::{valid_territory_codes, Territory};
