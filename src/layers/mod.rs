pub mod marker;
pub mod route;
pub mod tile;

pub use marker::{HotelMarker, RouteMarker};
pub use route::{RouteLayout, RouteSegment};
pub use tile::{PlacedTile, TileLayer};
