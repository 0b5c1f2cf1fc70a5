//! Background tiles covering a geometry's canvas.
//!
//! Pure functions of the geometry: the renderer and the offline pre-cacher
//! call these independently and must arrive at the same tile set.

use crate::core::{
    constants::TILE_SIZE,
    geo::{Point, TileCoord},
};
use crate::layout::geometry::MapGeometry;

/// A covering tile together with its unwrapped grid column, which the
/// renderer needs to place the image left or right of the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoveringTile {
    pub coord: TileCoord,
    pub grid_x: i64,
    pub grid_y: i64,
}

impl CoveringTile {
    /// Top-left corner of this tile in the geometry's canvas space
    pub fn placement(&self, origin: &Point) -> Point {
        let size = f64::from(TILE_SIZE);
        Point::new(
            self.grid_x as f64 * size - origin.x,
            self.grid_y as f64 * size - origin.y,
        )
    }
}

/// Tiles intersecting `[origin, origin + (width, height)]`, columns outer and
/// rows inner. Rows past the poles are dropped; columns wrap around.
pub fn covering_tiles(geometry: &MapGeometry, width: f64, height: f64) -> Vec<CoveringTile> {
    let size = f64::from(TILE_SIZE);
    let zoom = geometry.zoom;
    let tile_count = TileCoord::tiles_per_axis(zoom);

    let min_x = (geometry.origin.x / size).floor() as i64;
    let max_x = ((geometry.origin.x + width) / size).floor() as i64;
    let min_y = (geometry.origin.y / size).floor() as i64;
    let max_y = ((geometry.origin.y + height) / size).floor() as i64;

    let mut tiles = Vec::new();
    for grid_x in min_x..=max_x {
        for grid_y in min_y..=max_y {
            if grid_y < 0 || grid_y >= tile_count {
                continue;
            }
            tiles.push(CoveringTile {
                coord: TileCoord::new(TileCoord::wrap_x(grid_x, zoom), grid_y as u32, zoom),
                grid_x,
                grid_y,
            });
        }
    }
    tiles
}

/// Tile addresses needed to cover a geometry's canvas
pub fn compute_covering_tiles(geometry: &MapGeometry, width: f64, height: f64) -> Vec<TileCoord> {
    covering_tiles(geometry, width, height)
        .into_iter()
        .map(|tile| tile.coord)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CanvasConfig, ZoomSearchConfig};
    use crate::core::geo::LatLng;
    use crate::layout::geometry::build_map_geometry;

    fn geometry_at(zoom: u8, origin: Point) -> MapGeometry {
        MapGeometry {
            zoom,
            origin,
            points: Vec::new(),
            contained: true,
        }
    }

    #[test]
    fn test_aligned_canvas_covers_expected_range() {
        let geometry = geometry_at(4, Point::new(512.0, 256.0));
        let tiles = compute_covering_tiles(&geometry, 360.0, 280.0);
        // columns 2..=3, rows 1..=2
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(2, 1, 4),
                TileCoord::new(2, 2, 4),
                TileCoord::new(3, 1, 4),
                TileCoord::new(3, 2, 4),
            ]
        );
    }

    #[test]
    fn test_columns_wrap_at_antimeridian() {
        let geometry = geometry_at(3, Point::new(-100.0, 300.0));
        let tiles = compute_covering_tiles(&geometry, 360.0, 280.0);
        let columns: Vec<u32> = tiles.iter().map(|t| t.x).collect();
        assert!(columns.contains(&7));
        assert!(columns.contains(&0));
        assert!(columns.contains(&1));
        assert!(tiles.iter().all(|t| t.is_valid()));
    }

    #[test]
    fn test_rows_outside_world_are_dropped() {
        let geometry = geometry_at(2, Point::new(100.0, -200.0));
        let tiles = compute_covering_tiles(&geometry, 360.0, 280.0);
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.y == 0));

        let below = geometry_at(2, Point::new(100.0, 1024.0 - 10.0));
        let tiles = compute_covering_tiles(&below, 360.0, 280.0);
        assert!(tiles.iter().all(|t| t.y == 3));
    }

    #[test]
    fn test_placement_uses_unwrapped_column() {
        let origin = Point::new(-100.0, 300.0);
        let geometry = geometry_at(3, origin);
        let tiles = covering_tiles(&geometry, 360.0, 280.0);
        let west = tiles.iter().find(|t| t.grid_x == -1).unwrap();
        assert_eq!(west.coord.x, 7);
        assert_eq!(west.placement(&origin), Point::new(-156.0, west.grid_y as f64 * 256.0 - 300.0));
    }

    #[test]
    fn test_tiles_are_reproducible_from_points() {
        let points = [LatLng::new(41.8902, 12.4922), LatLng::new(48.8584, 2.2945)];
        let canvas = CanvasConfig::default();
        let zoom = ZoomSearchConfig::default();
        let a = build_map_geometry(&points, &canvas, &zoom).unwrap();
        let b = build_map_geometry(&points, &canvas, &zoom).unwrap();
        assert_eq!(
            compute_covering_tiles(&a, canvas.width, canvas.height),
            compute_covering_tiles(&b, canvas.width, canvas.height)
        );
        assert!(!compute_covering_tiles(&a, canvas.width, canvas.height).is_empty());
    }
}
