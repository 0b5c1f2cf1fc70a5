use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// In-memory offline tile store keyed by tile URL.
///
/// Capacity is the entry limit for pre-caching; the pre-cacher never fetches
/// past it, so eviction only happens when tiles are inserted from elsewhere.
#[derive(Debug)]
pub struct TileStore {
    cache: Arc<Mutex<LruCache<String, Arc<Vec<u8>>>>>,
}

impl TileStore {
    /// Create a new tile store holding at most `capacity` tiles
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Get a tile from the store
    pub fn get(&self, url: &str) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(url).cloned()
    }

    /// Insert a tile into the store
    pub fn insert(&self, url: String, data: Vec<u8>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(url, Arc::new(data));
        }
    }

    /// Check if a tile is in the store
    pub fn contains(&self, url: &str) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.contains(url))
            .unwrap_or(false)
    }

    /// Get the current number of stored tiles
    pub fn len(&self) -> usize {
        self.cache.lock().ok().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get store capacity
    pub fn capacity(&self) -> usize {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.cap().get())
            .unwrap_or(0)
    }

    /// Free slots before the entry limit is reached
    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.len())
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl Clone for TileStore {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}
