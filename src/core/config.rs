//! Configuration for route map layout, interaction and offline tiles
//!
//! Every section deserializes from JSON with per-field defaults, so a config
//! file only needs to name the values it overrides. The defaults reproduce the
//! reference behaviour: a 360x280 canvas with 32px padding, zoom levels 15..2,
//! scale limits 0.5..6 and a 1.25x zoom step.

use crate::core::constants::*;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub canvas: CanvasConfig,
    pub zoom_search: ZoomSearchConfig,
    pub interaction: InteractionConfig,
    pub tiles: TileConfig,
}

impl MapConfig {
    /// Parses a (possibly partial) JSON config and validates it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.canvas.validate()?;
        self.zoom_search.validate()?;
        self.interaction.validate()?;
        self.tiles.validate()
    }
}

/// Drawing surface the static geometry is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl CanvasConfig {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn available_width(&self) -> f64 {
        self.width - self.padding * 2.0
    }

    pub fn available_height(&self) -> f64 {
        self.height - self.padding * 2.0
    }

    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(MapError::Config(format!(
                "canvas must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.padding >= 0.0) || self.available_width() <= 0.0 || self.available_height() <= 0.0
        {
            return Err(MapError::Config(format!(
                "padding {} leaves no drawable area in a {}x{} canvas",
                self.padding, self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CANVAS_WIDTH,
            DEFAULT_CANVAS_HEIGHT,
            DEFAULT_CANVAS_PADDING,
        )
    }
}

/// Discrete zoom levels tried when fitting a route, most detailed first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSearchConfig {
    pub max_zoom: u8,
    pub min_zoom: u8,
}

impl ZoomSearchConfig {
    /// Candidate levels in the order they are tried
    pub fn candidates(&self) -> impl Iterator<Item = u8> {
        (self.min_zoom..=self.max_zoom).rev()
    }

    fn validate(&self) -> Result<()> {
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        // 2^z must stay addressable as a u32 tile column.
        if self.max_zoom > 30 {
            return Err(MapError::Config(format!(
                "max_zoom {} is beyond the tile grid",
                self.max_zoom
            )));
        }
        Ok(())
    }
}

impl Default for ZoomSearchConfig {
    fn default() -> Self {
        Self {
            max_zoom: DEFAULT_MAX_FIT_ZOOM,
            min_zoom: DEFAULT_MIN_FIT_ZOOM,
        }
    }
}

/// Viewport controller tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
    pub pan_margin: f64,
    pub drag_click_threshold: f64,
    pub touch_click_threshold: f64,
}

impl InteractionConfig {
    /// Double-click and double-tap zoom two steps at once
    pub fn double_click_factor(&self) -> f64 {
        self.zoom_step * self.zoom_step
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0 && self.max_scale >= 1.0) {
            return Err(MapError::Config(format!(
                "scale range {}..{} must be positive and contain 1",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.zoom_step > 1.0) {
            return Err(MapError::Config(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if !(self.pan_margin > 0.0 && self.pan_margin < 1.0) {
            return Err(MapError::Config(format!(
                "pan_margin must be within (0, 1), got {}",
                self.pan_margin
            )));
        }
        Ok(())
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            pan_margin: DEFAULT_PAN_MARGIN,
            drag_click_threshold: DEFAULT_DRAG_CLICK_THRESHOLD,
            touch_click_threshold: DEFAULT_TOUCH_CLICK_THRESHOLD,
        }
    }
}

/// Basemap source and offline cache limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub url_template: String,
    pub max_entries: usize,
    pub concurrency: usize,
}

impl TileConfig {
    fn validate(&self) -> Result<()> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(MapError::Config(format!(
                    "tile url template is missing {placeholder}: {}",
                    self.url_template
                )));
            }
        }
        if self.max_entries == 0 {
            return Err(MapError::Config("tile max_entries must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(MapError::Config("tile concurrency must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL_TEMPLATE.to_string(),
            max_entries: DEFAULT_MAX_TILE_ENTRIES,
            concurrency: DEFAULT_PRECACHE_CONCURRENCY,
        }
    }
}
