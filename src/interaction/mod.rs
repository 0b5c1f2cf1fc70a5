//! Pan and zoom over a rendered map.

pub mod controller;
pub mod host;

pub use controller::{SurfaceView, ViewportController};
pub use host::{
    attach, InteractionSlot, Listener, ListenerId, ListenerOptions, ListenerTarget, MapHost,
    Teardown,
};
