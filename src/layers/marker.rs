use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Numbered stop on a day's route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMarker {
    pub activity_id: String,
    pub name: String,
    /// 1-based position along the route, shown on the marker
    pub order: usize,
    pub position: LatLng,
    /// Canvas position at the layout's zoom
    pub point: Point,
}

impl RouteMarker {
    pub fn new(
        activity_id: impl Into<String>,
        name: impl Into<String>,
        order: usize,
        position: LatLng,
        point: Point,
    ) -> Self {
        Self {
            activity_id: activity_id.into(),
            name: name.into(),
            order,
            position,
            point,
        }
    }

    /// Accessible label for the marker button
    pub fn label(&self) -> String {
        format!("Open {} in Google Maps", self.name)
    }
}

/// The night's accommodation, drawn apart from the numbered stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelMarker {
    pub name: String,
    pub maps_url: String,
    pub position: LatLng,
    pub point: Point,
}

impl HotelMarker {
    pub fn label(&self) -> String {
        format!("Open hotel {} in Google Maps", self.name)
    }
}
