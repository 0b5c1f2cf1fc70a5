use crate::core::{geo::Point, viewport::ViewportState};
use crate::input::events::TouchPoint;

/// Gesture in progress on one map surface.
///
/// Wheel, double-click and zoom buttons are instantaneous and never change
/// the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    /// Primary mouse button held
    Dragging {
        start_client: Point,
        start_origin: Point,
    },
    /// One finger down
    TouchPanning {
        start_client: Point,
        start_origin: Point,
    },
    /// Two fingers down; everything is measured from the gesture start
    Pinching {
        start_distance: f64,
        start: ViewportState,
        /// Midpoint at gesture start, in geometry coordinates
        focal: Point,
    },
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging { .. } => "dragging",
            GestureState::TouchPanning { .. } => "touch-panning",
            GestureState::Pinching { .. } => "pinching",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState::Idle
    }
}

/// Distance between the first two touches
pub fn touch_distance(touches: &[TouchPoint]) -> Option<f64> {
    match touches {
        [a, b, ..] => Some(a.position.distance_to(&b.position)),
        _ => None,
    }
}

/// Midpoint of the first two touches
pub fn touch_center(touches: &[TouchPoint]) -> Option<Point> {
    match touches {
        [a, b, ..] => Some(a.position.midpoint(&b.position)),
        _ => None,
    }
}
