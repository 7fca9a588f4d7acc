use crate::core::constants::{BASE_DEGREES_PER_PIXEL, MAX_LATITUDE, METERS_PER_DEGREE, REFERENCE_ZOOM};
use serde::{Deserialize, Serialize};

/// A geographical coordinate, longitude first to match the static-map and
/// geocoder services' `lon,lat` wire order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    /// Creates a new coordinate, applying the wrap/clamp invariants.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon: wrap_lon(lon),
            lat: clamp_lat(lat),
        }
    }

    /// Formats the coordinate as the `lon,lat` string the services expect.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }

    /// Distance to another coordinate in meters, using a flat-earth local
    /// approximation (valid for short separations only): degree differences
    /// are scaled to meters at the mean latitude, then combined as a planar
    /// Euclidean distance.
    pub fn distance_to(&self, other: &LonLat) -> f64 {
        let mean_lat = ((self.lat + other.lat) / 2.0).to_radians();
        let dx = (self.lon - other.lon) * METERS_PER_DEGREE * mean_lat.cos();
        let dy = (self.lat - other.lat) * METERS_PER_DEGREE;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for LonLat {
    fn default() -> Self {
        Self { lon: 0.0, lat: 0.0 }
    }
}

/// Normalizes longitude into [-180, 180). Panning past the antimeridian
/// wraps to the symmetric value on the other side.
pub fn wrap_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid rounding can land exactly on the open upper bound
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Clamps latitude into [-85, 85]. Saturates rather than wrapping.
pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

/// Converts a pixel offset from the viewport center into a geographic delta
/// at the given zoom level.
///
/// `offset_x` grows eastward, `offset_y` grows northward; callers flip the
/// screen y axis (`offset_y = height/2 - pixel_y`) before use. The
/// `cos(reference_latitude)` factor corrects for meridian convergence in the
/// provider's Mercator-like projection. The reference latitude is taken from
/// the current view center, which is an acceptable approximation because a
/// per-click delta is small relative to the viewport.
pub fn pixel_to_geo(offset_x: f64, offset_y: f64, zoom: u8, reference_latitude: f64) -> (f64, f64) {
    let scale = BASE_DEGREES_PER_PIXEL * zoom_scale(zoom);
    let delta_lon = offset_x * scale;
    let delta_lat = offset_y * scale * reference_latitude.to_radians().cos();
    (delta_lon, delta_lat)
}

/// Degrees-per-pixel multiplier relative to the calibration zoom: each zoom
/// step out doubles the ground distance a pixel covers.
pub fn zoom_scale(zoom: u8) -> f64 {
    2_f64.powi(REFERENCE_ZOOM as i32 - zoom as i32)
}
