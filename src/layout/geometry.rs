//! Static route geometry: zoom selection and viewport origin for one render.

use crate::core::{
    bounds::Bounds,
    config::{CanvasConfig, ZoomSearchConfig},
    geo::{LatLng, Point},
    projection::project,
};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// A point projected at the geometry's zoom and translated by `-origin`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub position: Point,
    /// 1-based position in the input sequence
    pub order: usize,
}

/// Layout of one rendering pass. Rebuilt per render, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapGeometry {
    pub zoom: u8,
    /// World-pixel coordinate of the canvas' top-left corner
    pub origin: Point,
    pub points: Vec<ProjectedPoint>,
    /// `false` when no zoom level fitted and the minimum level was used.
    /// Containment inside the canvas is best-effort in that case.
    pub contained: bool,
}

impl MapGeometry {
    /// Position of any coordinate in this geometry's canvas space
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        project(lat_lng, self.zoom).subtract(&self.origin)
    }

    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(|p| p.position)
    }
}

/// Picks the most detailed zoom level at which every point fits inside the
/// padded canvas, then centres the points' bounding box on the canvas.
pub fn build_map_geometry(
    points: &[LatLng],
    canvas: &CanvasConfig,
    zoom_search: &ZoomSearchConfig,
) -> Result<MapGeometry> {
    if points.is_empty() {
        return Err(MapError::EmptyGeometry);
    }
    if let Some(bad) = points.iter().find(|p| !p.lat.is_finite() || !p.lng.is_finite()) {
        return Err(MapError::InvalidCoordinates(format!("{}, {}", bad.lat, bad.lng)));
    }

    let available_width = canvas.available_width();
    let available_height = canvas.available_height();

    let mut chosen = None;
    for zoom in zoom_search.candidates() {
        let world = project_all(points, zoom);
        let Some(bounds) = Bounds::from_points(&world) else {
            continue;
        };
        if bounds.fits_within(available_width, available_height) {
            chosen = Some((zoom, world, bounds));
            break;
        }
    }

    let contained = chosen.is_some();
    let (zoom, world, bounds) = match chosen {
        Some(found) => found,
        None => {
            let zoom = zoom_search.min_zoom;
            let world = project_all(points, zoom);
            let bounds = Bounds::from_points(&world).ok_or(MapError::EmptyGeometry)?;
            log::debug!(
                "{} points do not fit {}x{} at any zoom, falling back to {}",
                points.len(),
                available_width,
                available_height,
                zoom
            );
            (zoom, world, bounds)
        }
    };

    let center = bounds.center();
    let origin = Point::new(center.x - canvas.width / 2.0, center.y - canvas.height / 2.0);

    log::debug!(
        "map geometry: {} points at zoom {} (origin {:.2}, {:.2})",
        points.len(),
        zoom,
        origin.x,
        origin.y
    );

    Ok(MapGeometry {
        zoom,
        origin,
        points: world
            .iter()
            .enumerate()
            .map(|(i, p)| ProjectedPoint {
                position: p.subtract(&origin),
                order: i + 1,
            })
            .collect(),
        contained,
    })
}

fn project_all(points: &[LatLng], zoom: u8) -> Vec<Point> {
    points.iter().map(|p| project(p, zoom)).collect()
}
