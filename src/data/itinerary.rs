//! The slice of the itinerary document the route map needs.
//!
//! Schema validation happens elsewhere; this model only reads what it knows
//! and treats missing or non-numeric coordinates as "no map data", so one bad
//! activity never hides the rest of a day's route.

use crate::core::geo::LatLng;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub trip_id: String,
    pub title: String,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Itinerary {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn day(&self, day_id: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.day_id == day_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub day_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub hotel: Option<Hotel>,
}

impl Day {
    /// Activities in visiting order; ties keep document order
    pub fn sorted_activities(&self) -> Vec<&Activity> {
        let mut sorted: Vec<&Activity> = self.activities.iter().collect();
        sorted.sort_by_key(|a| a.order);
        sorted
    }

    /// Activities with usable coordinates, in visiting order
    pub fn mappable_activities(&self) -> Vec<(&Activity, LatLng)> {
        self.sorted_activities()
            .into_iter()
            .filter_map(|a| a.map_point().map(|p| (a, p)))
            .collect()
    }

    /// Activities that cannot be placed on the map, in visiting order
    pub fn missing_locations(&self) -> Vec<&Activity> {
        self.sorted_activities()
            .into_iter()
            .filter(|a| a.map_point().is_none())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_id: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Activity {
    pub fn map_point(&self) -> Option<LatLng> {
        self.location.as_ref()?.lat_lng()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Hotel {
    /// The hotel is only mapped with a name, coordinates and a maps link
    pub fn map_point(&self) -> Option<LatLng> {
        if self.name.trim().is_empty() {
            return None;
        }
        let location = self.location.as_ref()?;
        let has_link = location
            .maps_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if !has_link {
            return None;
        }
        location.lat_lng()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, deserialize_with = "number_or_none")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "number_or_none")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub maps_url: Option<String>,
}

impl Location {
    pub fn lat_lng(&self) -> Option<LatLng> {
        let point = LatLng::new(self.lat?, self.lng?);
        point.is_valid().then_some(point)
    }
}

fn number_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}
