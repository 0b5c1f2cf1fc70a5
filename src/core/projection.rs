//! Spherical mercator projection into world-pixel space.
//!
//! The world at zoom `z` is a square of `TILE_SIZE * 2^z` units with the
//! antimeridian at `x = 0` and the northern mercator limit at `y = 0`. The
//! same function feeds both the renderer and the offline pre-cacher, so it
//! must stay free of any state: identical inputs give bit-identical output.

use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, Point};
use std::f64::consts::PI;

/// Side length of the world square at `zoom`, in world-pixel units
pub fn world_size(zoom: u8) -> f64 {
    f64::from(TILE_SIZE) * 2_f64.powi(i32::from(zoom))
}

/// Projects a latitude/longitude pair into world-pixel coordinates at `zoom`.
///
/// Latitude is clamped to `±MAX_LATITUDE` first; longitude maps linearly.
pub fn project_lat_lng_to_world(lat: f64, lng: f64, zoom: u8) -> Point {
    let scale = world_size(zoom);
    let sin_lat = (LatLng::clamp_lat(lat) * PI / 180.0).sin();

    let x = (lng + 180.0) / 360.0 * scale;
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale;

    Point::new(x, y)
}

/// Convenience wrapper over [`project_lat_lng_to_world`]
pub fn project(lat_lng: &LatLng, zoom: u8) -> Point {
    project_lat_lng_to_world(lat_lng.lat, lat_lng.lng, zoom)
}
