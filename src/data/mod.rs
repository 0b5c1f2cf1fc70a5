pub mod itinerary;

pub use itinerary::{Activity, Day, Hotel, Itinerary, Location};
