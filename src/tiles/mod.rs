pub mod cache;
pub mod coverage;
pub mod disk;
pub mod loader;
pub mod precache;
pub mod source;

// Re-exports for convenience
pub use cache::TileStore;
pub use coverage::{compute_covering_tiles, covering_tiles, CoveringTile};
#[cfg(feature = "net")]
pub use loader::HttpTileFetcher;
pub use loader::TileFetcher;
pub use disk::TileDirectory;
pub use precache::{
    collect_tile_requests, collect_tile_urls, tile_requests_for_points, tile_urls_for_points,
    PrecacheProgress, Precacher, TileRequest,
};
pub use source::{TileSource, UrlTemplateSource};
