use crate::core::constants::TILE_SIZE;
use crate::core::geo::{Point, TileCoord};
use crate::layout::geometry::MapGeometry;
use crate::tiles::{coverage::covering_tiles, source::TileSource};
use serde::{Deserialize, Serialize};

/// One background tile image positioned in canvas space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub coord: TileCoord,
    pub url: String,
    /// Top-left corner relative to the canvas; may be negative
    pub position: Point,
    pub size: f64,
}

/// Background tiles behind one rendered map, in drawing order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileLayer {
    tiles: Vec<PlacedTile>,
}

impl TileLayer {
    /// Places every tile covering a `width` x `height` canvas over `geometry`
    pub fn build(geometry: &MapGeometry, width: f64, height: f64, source: &dyn TileSource) -> Self {
        let tiles = covering_tiles(geometry, width, height)
            .into_iter()
            .map(|tile| PlacedTile {
                coord: tile.coord,
                url: source.url(tile.coord),
                position: tile.placement(&geometry.origin),
                size: f64::from(TILE_SIZE),
            })
            .collect();
        Self { tiles }
    }

    pub fn tiles(&self) -> &[PlacedTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.tiles.iter().map(|t| t.url.as_str())
    }
}
