//! Geographic primitives shared by the codec and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters, used for offset calculations.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// A latitude/longitude rectangle, south-west to north-east.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRect {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl GeoRect {
    pub fn new(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south_west.lat_deg + self.north_east.lat_deg) / 2.0,
            (self.south_west.lon_deg + self.north_east.lon_deg) / 2.0,
        )
    }

    /// Whether the rectangle contains the point. The northern and eastern
    /// edges are exclusive so adjacent cells do not overlap.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat_deg >= self.south_west.lat_deg
            && point.lat_deg < self.north_east.lat_deg
            && point.lon_deg >= self.south_west.lon_deg
            && point.lon_deg < self.north_east.lon_deg
    }
}

/// Wrap a longitude to [-180, 180).
///
/// Latitudes are validated at the API boundary instead; longitudes are
/// accepted unbounded and wrapped along the earth.
pub fn wrap_lon(lon_deg: f64) -> f64 {
    let wrapped = (lon_deg + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can return 360.0 - epsilon artifacts for exact negatives
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Great-circle distance between two points in meters (haversine).
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let dlat = (b.lat_deg - a.lat_deg).to_radians();
    let dlon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}
