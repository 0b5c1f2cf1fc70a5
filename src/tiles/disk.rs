//! Tiles kept on disk as `{root}/{z}/{x}/{y}.png`, the layout static tile
//! servers and offline map viewers read directly.

use crate::core::geo::TileCoord;
use crate::tiles::loader::TileFetcher;
use crate::tiles::precache::{PrecacheProgress, Precacher, TileRequest};
use crate::Result;
use crossbeam_channel::Sender;
use fxhash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TileDirectory {
    root: PathBuf,
}

impl TileDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, coord: &TileCoord) -> PathBuf {
        self.root
            .join(coord.z.to_string())
            .join(coord.x.to_string())
            .join(format!("{}.png", coord.y))
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.path_for(coord).is_file()
    }

    pub fn write(&self, coord: &TileCoord, data: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(coord);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        Ok(path)
    }

    /// Fetches every request not yet on disk through `precacher`, then writes
    /// what it downloaded. Tiles already on disk count as already cached.
    pub fn precache<F: TileFetcher>(
        &self,
        precacher: &Precacher<F>,
        requests: &[TileRequest],
        batch_id: Option<u64>,
        progress: Option<&Sender<PrecacheProgress>>,
    ) -> Result<PrecacheProgress> {
        let coords: FxHashMap<&str, &TileCoord> = requests
            .iter()
            .map(|r| (r.url.as_str(), &r.coord))
            .collect();
        let urls: Vec<String> = requests.iter().map(|r| r.url.clone()).collect();

        let report = precacher.run_skipping(
            &urls,
            |url| coords.get(url).is_some_and(|coord| self.contains(coord)),
            batch_id,
            progress,
        );

        let mut written = 0;
        for request in requests {
            if self.contains(&request.coord) {
                continue;
            }
            if let Some(data) = precacher.store().get(&request.url) {
                self.write(&request.coord, &data)?;
                written += 1;
            }
        }
        log::info!("wrote {written} tiles under {}", self.root.display());
        Ok(report)
    }
}
