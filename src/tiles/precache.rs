//! Offline tile pre-caching.
//!
//! Consumes only the pure URL list derived from `compute_covering_tiles`, so
//! it can run on any thread (or in another process) without a rendered map.

use crate::core::config::{CanvasConfig, TileConfig, ZoomSearchConfig};
use crate::core::geo::{LatLng, TileCoord};
use crate::data::itinerary::Day;
use crate::layout::geometry::build_map_geometry;
use crate::tiles::{cache::TileStore, coverage::compute_covering_tiles, loader::TileFetcher};
use crate::tiles::source::TileSource;
use crate::Result;
use crossbeam_channel::Sender;
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// One tile the pre-cacher should fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRequest {
    pub coord: TileCoord,
    pub url: String,
}

/// Tiles covering one set of points, in render order
pub fn tile_requests_for_points(
    points: &[LatLng],
    canvas: &CanvasConfig,
    zoom_search: &ZoomSearchConfig,
    source: &dyn TileSource,
) -> Result<Vec<TileRequest>> {
    let geometry = build_map_geometry(points, canvas, zoom_search)?;
    Ok(compute_covering_tiles(&geometry, canvas.width, canvas.height)
        .into_iter()
        .map(|coord| TileRequest {
            coord,
            url: source.url(coord),
        })
        .collect())
}

/// Tile URLs for one set of points, in render order
pub fn tile_urls_for_points(
    points: &[LatLng],
    canvas: &CanvasConfig,
    zoom_search: &ZoomSearchConfig,
    source: &dyn TileSource,
) -> Result<Vec<String>> {
    Ok(tile_requests_for_points(points, canvas, zoom_search, source)?
        .into_iter()
        .map(|request| request.url)
        .collect())
}

/// Every tile the itinerary's day maps need, first occurrence order,
/// without duplicate URLs. Days without mappable activities contribute nothing.
pub fn collect_tile_requests(
    days: &[Day],
    canvas: &CanvasConfig,
    zoom_search: &ZoomSearchConfig,
    source: &dyn TileSource,
) -> Result<Vec<TileRequest>> {
    let mut seen = FxHashSet::default();
    let mut requests = Vec::new();
    for day in days {
        let points: Vec<_> = day.mappable_activities().into_iter().map(|(_, p)| p).collect();
        if points.is_empty() {
            continue;
        }
        for request in tile_requests_for_points(&points, canvas, zoom_search, source)? {
            if seen.insert(request.url.clone()) {
                requests.push(request);
            }
        }
    }
    log::debug!("{} unique tiles across {} days", requests.len(), days.len());
    Ok(requests)
}

/// URL-only form of [`collect_tile_requests`]
pub fn collect_tile_urls(
    days: &[Day],
    canvas: &CanvasConfig,
    zoom_search: &ZoomSearchConfig,
    source: &dyn TileSource,
) -> Result<Vec<String>> {
    Ok(collect_tile_requests(days, canvas, zoom_search, source)?
        .into_iter()
        .map(|request| request.url)
        .collect())
}

/// Progress report sent after every batch and once more when finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecacheProgress {
    /// Tiles fetched and stored so far in this run
    pub cached: usize,
    /// Tiles this run attempts to fetch
    pub total: usize,
    /// Requested tiles that were already stored
    pub already_cached: usize,
    pub done: bool,
    pub batch_id: Option<u64>,
}

/// Downloads tile URLs into a bounded [`TileStore`] a few at a time.
pub struct Precacher<F: TileFetcher> {
    fetcher: F,
    store: TileStore,
    concurrency: usize,
}

impl<F: TileFetcher> Precacher<F> {
    pub fn new(fetcher: F, store: TileStore, concurrency: usize) -> Self {
        Self {
            fetcher,
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Store sized and throttled according to `config`
    pub fn from_config(fetcher: F, config: &TileConfig) -> Self {
        Self::new(fetcher, TileStore::new(config.max_entries), config.concurrency)
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches the URLs not yet stored, up to the store's free capacity.
    ///
    /// Failed downloads are logged and skipped. Progress goes to
    /// `progress` when given; a closed receiver is ignored.
    pub fn run(
        &self,
        urls: &[String],
        batch_id: Option<u64>,
        progress: Option<&Sender<PrecacheProgress>>,
    ) -> PrecacheProgress {
        self.run_skipping(urls, |_| false, batch_id, progress)
    }

    /// Like [`Precacher::run`], but URLs for which `kept_elsewhere` holds
    /// count as already cached and are never fetched.
    pub fn run_skipping(
        &self,
        urls: &[String],
        kept_elsewhere: impl Fn(&str) -> bool,
        batch_id: Option<u64>,
        progress: Option<&Sender<PrecacheProgress>>,
    ) -> PrecacheProgress {
        let needed: Vec<&String> = urls
            .iter()
            .filter(|u| !self.store.contains(u) && !kept_elsewhere(u))
            .collect();
        let already_cached = urls.len() - needed.len();
        let to_fetch: Vec<&String> = needed.into_iter().take(self.store.remaining()).collect();
        let total = to_fetch.len();

        let report = |cached: usize, done: bool| {
            let update = PrecacheProgress {
                cached,
                total,
                already_cached,
                done,
                batch_id,
            };
            if let Some(tx) = progress {
                let _ = tx.send(update.clone());
            }
            update
        };

        if to_fetch.is_empty() {
            log::debug!("nothing to precache ({already_cached} already stored)");
            return report(0, true);
        }

        let cached = AtomicUsize::new(0);
        for batch in to_fetch.chunks(self.concurrency) {
            thread::scope(|scope| {
                for &url in batch {
                    let fetcher = &self.fetcher;
                    let store = &self.store;
                    let cached = &cached;
                    scope.spawn(move || match fetcher.fetch(url) {
                        Ok(data) => {
                            log::debug!("cached tile {} ({} bytes)", url, data.len());
                            store.insert(url.clone(), data);
                            cached.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(e) => log::warn!("tile {} precache failed: {}", url, e),
                    });
                }
            });
            report(cached.load(Ordering::SeqCst), false);
        }

        let cached = cached.load(Ordering::SeqCst);
        log::info!("precached {cached}/{total} tiles ({already_cached} already stored)");
        report(cached, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::data::itinerary::Itinerary;
    use crate::tiles::source::UrlTemplateSource;
    use crate::MapError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFetcher {
        requested: Mutex<Vec<String>>,
    }

    impl TileFetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.requested.lock().unwrap().push(url.to_string());
            if url.contains("fail") {
                return Err(MapError::Precache(format!("HTTP 404 for {url}")));
            }
            Ok(url.as_bytes().to_vec())
        }
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://t/4/{i}/0.png")).collect()
    }

    #[test]
    fn test_fetches_in_batches_and_reports() {
        let precacher = Precacher::new(FakeFetcher::default(), TileStore::new(600), 3);
        let (tx, rx) = crossbeam_channel::unbounded();

        let last = precacher.run(&urls(7), Some(9), Some(&tx));
        drop(tx);

        let updates: Vec<PrecacheProgress> = rx.iter().collect();
        // three batches (3 + 3 + 1) and the final report
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[0].cached, 3);
        assert!(!updates[0].done);
        assert_eq!(updates[2].cached, 7);
        assert_eq!(last.cached, 7);
        assert_eq!(last.total, 7);
        assert!(last.done);
        assert_eq!(last.batch_id, Some(9));
        assert_eq!(precacher.store().len(), 7);
    }

    #[test]
    fn test_skips_already_cached() {
        let precacher = Precacher::new(FakeFetcher::default(), TileStore::new(600), 3);
        precacher.run(&urls(4), None, None);

        let report = precacher.run(&urls(6), None, None);
        assert_eq!(report.already_cached, 4);
        assert_eq!(report.total, 2);
        assert_eq!(precacher.fetcher.requested.lock().unwrap().len(), 6);
    }

    #[test]
    fn test_nothing_to_fetch_still_reports_done() {
        let precacher = Precacher::new(FakeFetcher::default(), TileStore::new(600), 3);
        precacher.run(&urls(2), None, None);
        let (tx, rx) = crossbeam_channel::unbounded();
        let report = precacher.run(&urls(2), Some(1), Some(&tx));
        drop(tx);
        assert_eq!(
            rx.iter().collect::<Vec<_>>(),
            vec![PrecacheProgress {
                cached: 0,
                total: 0,
                already_cached: 2,
                done: true,
                batch_id: Some(1),
            }]
        );
        assert!(report.done);
    }

    #[test]
    fn test_respects_entry_limit() {
        let precacher = Precacher::new(FakeFetcher::default(), TileStore::new(5), 2);
        let report = precacher.run(&urls(8), None, None);
        assert_eq!(report.total, 5);
        assert_eq!(precacher.store().len(), 5);
    }

    #[test]
    fn test_failures_are_skipped() {
        let precacher = Precacher::new(FakeFetcher::default(), TileStore::new(10), 3);
        let list = vec![
            "https://t/fail/1.png".to_string(),
            "https://t/ok/1.png".to_string(),
        ];
        let report = precacher.run(&list, None, None);
        assert_eq!(report.cached, 1);
        assert_eq!(report.total, 2);
        assert!(!precacher.store().contains("https://t/fail/1.png"));
    }

    #[test]
    fn test_collect_tile_urls_dedupes_across_days() {
        let itinerary = Itinerary::from_json_str(
            r#"{
                "tripId": "t", "title": "T",
                "days": [
                    { "dayId": "d1", "activities": [
                        { "activityId": "a", "order": 1, "location": { "lat": 41.8902, "lng": 12.4922 } },
                        { "activityId": "b", "order": 2, "location": { "lat": 48.8584, "lng": 2.2945 } }
                    ] },
                    { "dayId": "d2", "activities": [
                        { "activityId": "c", "order": 1, "location": { "lat": 48.8584, "lng": 2.2945 } },
                        { "activityId": "d", "order": 2, "location": { "lat": 41.8902, "lng": 12.4922 } }
                    ] },
                    { "dayId": "d3", "activities": [
                        { "activityId": "e", "order": 1 }
                    ] }
                ]
            }"#,
        )
        .unwrap();
        let canvas = CanvasConfig::default();
        let zoom = ZoomSearchConfig::default();
        let source = UrlTemplateSource::default();

        let all = collect_tile_urls(&itinerary.days, &canvas, &zoom, &source).unwrap();
        let first_day = tile_urls_for_points(
            &[LatLng::new(41.8902, 12.4922), LatLng::new(48.8584, 2.2945)],
            &canvas,
            &zoom,
            &source,
        )
        .unwrap();

        // Same bounding box on both days, so the second day adds nothing.
        assert_eq!(all, first_day);
        let unique: FxHashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
        assert!(all.iter().all(|u| u.starts_with("https://basemaps.cartocdn.com/light_all/4/")));
    }
}
