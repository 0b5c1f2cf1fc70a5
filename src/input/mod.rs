pub mod events;
pub mod gestures;

// Re-export the essential types
pub use events::{
    EventKind, EventResponse, InputEvent, MapAction, MouseButton, TouchEventType, TouchPoint,
};
pub use gestures::GestureState;
