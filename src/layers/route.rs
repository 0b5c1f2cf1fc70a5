//! A day's route laid out on the canvas: numbered stops, the lines between
//! them and the hotel.

use crate::core::config::{CanvasConfig, ZoomSearchConfig};
use crate::core::geo::{LatLng, Point};
use crate::core::viewport::ViewBox;
use crate::data::itinerary::Day;
use crate::layers::marker::{HotelMarker, RouteMarker};
use crate::layers::tile::TileLayer;
use crate::layout::geometry::{build_map_geometry, MapGeometry};
use crate::tiles::source::TileSource;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Straight line between two consecutive stops
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub from: Point,
    pub to: Point,
    /// Order of the stop the segment leaves from
    pub from_order: usize,
}

impl RouteSegment {
    pub fn length(&self) -> f64 {
        self.from.distance_to(&self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLayout {
    pub day_id: String,
    pub width: f64,
    pub height: f64,
    pub geometry: MapGeometry,
    pub markers: Vec<RouteMarker>,
    pub segments: Vec<RouteSegment>,
    pub hotel: Option<HotelMarker>,
    /// Activities without usable coordinates, in visiting order
    pub missing: Vec<String>,
}

impl RouteLayout {
    /// Lays out `day`, or returns `None` when neither an activity nor the
    /// hotel can be placed on a map.
    pub fn build(
        day: &Day,
        canvas: &CanvasConfig,
        zoom_search: &ZoomSearchConfig,
    ) -> Result<Option<Self>> {
        let stops = day.mappable_activities();
        let hotel = day.hotel.as_ref().and_then(|h| {
            let position = h.map_point()?;
            let maps_url = h.location.as_ref()?.maps_url.clone()?;
            Some((h.name.clone(), maps_url, position))
        });
        let missing: Vec<String> = day
            .missing_locations()
            .into_iter()
            .map(|a| a.activity_id.clone())
            .collect();

        if stops.is_empty() && hotel.is_none() {
            log::debug!("day {}: no map data", day.day_id);
            return Ok(None);
        }

        let mut points: Vec<LatLng> = stops.iter().map(|(_, p)| *p).collect();
        if let Some((_, _, position)) = &hotel {
            points.push(*position);
        }
        let geometry = build_map_geometry(&points, canvas, zoom_search)?;

        let markers: Vec<RouteMarker> = stops
            .iter()
            .enumerate()
            .map(|(i, (activity, position))| {
                RouteMarker::new(
                    activity.activity_id.clone(),
                    activity.name.clone(),
                    i + 1,
                    *position,
                    geometry.project(position),
                )
            })
            .collect();

        let segments = markers
            .windows(2)
            .map(|pair| RouteSegment {
                from: pair[0].point,
                to: pair[1].point,
                from_order: pair[0].order,
            })
            .collect();

        let hotel = hotel.map(|(name, maps_url, position)| HotelMarker {
            name,
            maps_url,
            point: geometry.project(&position),
            position,
        });

        log::debug!(
            "day {}: {} stops, hotel: {}, {} missing, zoom {}",
            day.day_id,
            markers.len(),
            hotel.is_some(),
            missing.len(),
            geometry.zoom
        );

        Ok(Some(Self {
            day_id: day.day_id.clone(),
            width: canvas.width,
            height: canvas.height,
            geometry,
            markers,
            segments,
            hotel,
            missing,
        }))
    }

    pub fn mapped_count(&self) -> usize {
        self.markers.len()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// View box of the unzoomed map
    pub fn base_view_box(&self) -> ViewBox {
        ViewBox {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
    }

    pub fn tile_layer(&self, source: &dyn TileSource) -> TileLayer {
        TileLayer::build(&self.geometry, self.width, self.height, source)
    }
}
