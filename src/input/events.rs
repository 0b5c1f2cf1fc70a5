use crate::core::geo::Point;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pointer, wheel and touch input delivered to a map surface.
///
/// Positions are client coordinates; the controller maps them through the
/// surface rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Scroll wheel notch; negative `delta_y` scrolls up (zoom in)
    Wheel { position: Point, delta_y: f64 },
    /// Mouse button pressed over the surface
    MouseDown {
        position: Point,
        button: MouseButton,
    },
    /// Mouse moved anywhere in the document
    MouseMove { position: Point },
    /// Mouse button released anywhere in the document
    MouseUp { position: Point },
    /// Touch change; `touches` are the touches still active after it
    Touch {
        event_type: TouchEventType,
        touches: Vec<TouchPoint>,
    },
    /// Double click or double tap
    DoubleClick { position: Point },
    /// Click; `action` is set when it landed on a zoom control
    Click {
        position: Point,
        action: Option<MapAction>,
    },
}

/// Types of touch events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventType {
    Start,
    Move,
    End,
    Cancel,
}

/// Individual touch point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    /// Maps a DOM `MouseEvent.button` index
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            other => MouseButton::Other(other.max(0) as u16),
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, MouseButton::Left)
    }
}

/// Zoom control buttons, named by their `data-map-action` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapAction {
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

impl MapAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapAction::ZoomIn => "zoom-in",
            MapAction::ZoomOut => "zoom-out",
            MapAction::ZoomReset => "zoom-reset",
        }
    }
}

impl FromStr for MapAction {
    type Err = crate::MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zoom-in" => Ok(MapAction::ZoomIn),
            "zoom-out" => Ok(MapAction::ZoomOut),
            "zoom-reset" => Ok(MapAction::ZoomReset),
            other => Err(crate::MapError::ParseError(format!("unknown map action {other:?}"))),
        }
    }
}

/// Event kinds a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Wheel,
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    DoubleClick,
    Click,
}

impl EventKind {
    /// DOM event type name
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::Wheel => "wheel",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseUp => "mouseup",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::TouchCancel => "touchcancel",
            EventKind::DoubleClick => "dblclick",
            EventKind::Click => "click",
        }
    }
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Wheel { .. } => EventKind::Wheel,
            InputEvent::MouseDown { .. } => EventKind::MouseDown,
            InputEvent::MouseMove { .. } => EventKind::MouseMove,
            InputEvent::MouseUp { .. } => EventKind::MouseUp,
            InputEvent::Touch { event_type, .. } => match event_type {
                TouchEventType::Start => EventKind::TouchStart,
                TouchEventType::Move => EventKind::TouchMove,
                TouchEventType::End => EventKind::TouchEnd,
                TouchEventType::Cancel => EventKind::TouchCancel,
            },
            InputEvent::DoubleClick { .. } => EventKind::DoubleClick,
            InputEvent::Click { .. } => EventKind::Click,
        }
    }
}

/// What a listener asks of the host after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
    /// View box or surface flags changed and should be re-applied
    pub redraw: bool,
}

impl EventResponse {
    pub const IGNORED: EventResponse = EventResponse {
        prevent_default: false,
        stop_propagation: false,
        redraw: false,
    };

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::IGNORED
        }
    }

    pub fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    /// Swallow the event entirely
    pub fn consumed() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: true,
            redraw: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_action_parsing() {
        assert_eq!("zoom-in".parse::<MapAction>().unwrap(), MapAction::ZoomIn);
        assert_eq!("zoom-out".parse::<MapAction>().unwrap(), MapAction::ZoomOut);
        assert_eq!(
            "zoom-reset".parse::<MapAction>().unwrap(),
            MapAction::ZoomReset
        );
        assert!("toggle-map-key".parse::<MapAction>().is_err());
        assert_eq!(MapAction::ZoomReset.as_str(), "zoom-reset");
    }

    #[test]
    fn test_event_kinds() {
        let cancel = InputEvent::Touch {
            event_type: TouchEventType::Cancel,
            touches: vec![],
        };
        assert_eq!(cancel.kind(), EventKind::TouchCancel);
        assert_eq!(cancel.kind().dom_name(), "touchcancel");
        assert_eq!(EventKind::DoubleClick.dom_name(), "dblclick");
    }

    #[test]
    fn test_dom_buttons() {
        assert!(MouseButton::from_dom(0).is_primary());
        assert_eq!(MouseButton::from_dom(2), MouseButton::Right);
        assert_eq!(MouseButton::from_dom(4), MouseButton::Other(4));
    }

    #[test]
    fn test_response_builders() {
        let r = EventResponse::redraw().prevent_default();
        assert!(r.redraw && r.prevent_default && !r.stop_propagation);
        assert_eq!(EventResponse::default(), EventResponse::IGNORED);
    }
}
