pub mod geometry;

pub use geometry::{build_map_geometry, MapGeometry, ProjectedPoint};
