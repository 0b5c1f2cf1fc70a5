use crate::core::config::InteractionConfig;
use crate::core::constants::ZOOMED_SCALE_THRESHOLD;
use crate::core::geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Continuous magnification and top-left offset of the visible window.
///
/// `scale = 1` with `origin = (0, 0)` shows the static geometry 1:1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f64,
    pub origin: Point,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            origin: Point::new(0.0, 0.0),
        }
    }
}

/// Visible window in geometry coordinates, as applied to an SVG `viewBox`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// On-screen rectangle of the drawing surface in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Zero-area or unmeasurable surfaces cannot map client points
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Fraction of the surface a client point sits at, per axis
    pub fn relative(&self, client: Point) -> Point {
        Point::new(
            (client.x - self.left) / self.width,
            (client.y - self.top) / self.height,
        )
    }
}

/// Manages the live window into one rendered map geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    state: ViewportState,
    /// Size of the base map (the canvas the geometry was built for)
    base_size: Point,
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
    pan_margin: f64,
}

impl Viewport {
    pub fn new(base_size: Point, config: &InteractionConfig) -> Self {
        Self {
            state: ViewportState::default(),
            base_size,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            zoom_step: config.zoom_step,
            pan_margin: config.pan_margin,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn origin(&self) -> Point {
        self.state.origin
    }

    pub fn base_size(&self) -> Point {
        self.base_size
    }

    /// Size of the visible window in geometry units
    pub fn view_size(&self) -> Point {
        Point::new(
            self.base_size.x / self.state.scale,
            self.base_size.y / self.state.scale,
        )
    }

    pub fn view_box(&self) -> ViewBox {
        let size = self.view_size();
        ViewBox {
            x: self.state.origin.x,
            y: self.state.origin.y,
            width: size.x,
            height: size.y,
        }
    }

    pub fn view_center(&self) -> Point {
        self.state.origin.add(&self.view_size().multiply(0.5))
    }

    pub fn is_zoomed(&self) -> bool {
        self.state.scale > ZOOMED_SCALE_THRESHOLD
    }

    /// Converts a client point into geometry coordinates under the current view
    pub fn client_to_view(&self, client: Point, rect: &SurfaceRect) -> Point {
        let rel = rect.relative(client);
        let size = self.view_size();
        Point::new(
            self.state.origin.x + rel.x * size.x,
            self.state.origin.y + rel.y * size.y,
        )
    }

    /// Converts a client-space delta into geometry units under the current view
    pub fn screen_delta_to_view(&self, delta: Point, rect: &SurfaceRect) -> Point {
        let size = self.view_size();
        Point::new(delta.x / rect.width * size.x, delta.y / rect.height * size.y)
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Zooms by `factor` keeping `focal` (geometry coordinates) fixed on screen.
    ///
    /// Returns `false` when the clamped scale does not change.
    pub fn zoom_at(&mut self, factor: f64, focal: Point) -> bool {
        let new_scale = self.clamp_scale(self.state.scale * factor);
        if new_scale == self.state.scale {
            return false;
        }
        self.apply_focal_zoom(new_scale, focal);
        true
    }

    /// Re-applies a zoom from a recorded starting state. Used by pinch so the
    /// ratio always refers to the gesture start rather than the previous frame.
    pub fn zoom_from(&mut self, start: ViewportState, factor: f64, focal: Point) {
        self.state = start;
        let new_scale = self.clamp_scale(start.scale * factor);
        self.apply_focal_zoom(new_scale, focal);
    }

    fn apply_focal_zoom(&mut self, new_scale: f64, focal: Point) {
        let ratio = self.state.scale / new_scale;
        let origin = self.state.origin;
        self.state.origin = Point::new(
            focal.x - (focal.x - origin.x) * ratio,
            focal.y - (focal.y - origin.y) * ratio,
        );
        self.state.scale = new_scale;
        self.clamp_pan();
    }

    pub fn zoom_in(&mut self) -> bool {
        let center = self.view_center();
        self.zoom_at(self.zoom_step, center)
    }

    pub fn zoom_out(&mut self) -> bool {
        let center = self.view_center();
        self.zoom_at(1.0 / self.zoom_step, center)
    }

    /// Back to the fit view
    pub fn reset(&mut self) {
        self.state = ViewportState::default();
    }

    /// Moves the origin to `start - delta` (delta in geometry units), clamped
    pub fn pan_from(&mut self, start: Point, delta: Point) {
        self.state.origin = start.subtract(&delta);
        self.clamp_pan();
    }

    /// Keeps at least `pan_margin` of the view over the base map on each axis
    pub fn clamp_pan(&mut self) {
        let size = self.view_size();
        let m = self.pan_margin;
        let origin = &mut self.state.origin;
        origin.x = origin
            .x
            .min(self.base_size.x - size.x * m)
            .max(-size.x * (1.0 - m));
        origin.y = origin
            .y
            .min(self.base_size.y - size.y * m)
            .max(-size.y * (1.0 - m));
    }
}
