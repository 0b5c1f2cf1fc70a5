//! # itinerary-map
//!
//! Route maps for offline travel itineraries, without a mapping library.
//!
//! The crate turns a day's activity coordinates into a fixed map layout
//! (zoom level, canvas origin, projected markers and the background tiles
//! behind them), lists the same tiles for offline pre-caching, and drives
//! pan and zoom over the rendered map through a [`ViewportController`].

pub mod core;
pub mod data;
pub mod input;
pub mod interaction;
pub mod layers;
pub mod layout;
pub mod tiles;
#[cfg(feature = "wasm")]
pub mod web;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::{CanvasConfig, InteractionConfig, MapConfig, TileConfig, ZoomSearchConfig},
    geo::{LatLng, Point, TileCoord},
    projection::project_lat_lng_to_world,
    viewport::{SurfaceRect, ViewBox, Viewport, ViewportState},
};

pub use data::itinerary::{Day, Itinerary};

pub use input::{events::InputEvent, gestures::GestureState};

pub use interaction::{
    attach, InteractionSlot, MapHost, SurfaceView, Teardown, ViewportController,
};

pub use layers::{route::RouteLayout, tile::TileLayer};

pub use layout::geometry::{build_map_geometry, MapGeometry};

pub use tiles::{
    cache::TileStore,
    coverage::compute_covering_tiles,
    disk::TileDirectory,
    precache::{collect_tile_requests, collect_tile_urls, PrecacheProgress, Precacher, TileRequest},
    source::{TileSource, UrlTemplateSource},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "net")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("No mappable points to lay out")]
    EmptyGeometry,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Pre-cache error: {0}")]
    Precache(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
