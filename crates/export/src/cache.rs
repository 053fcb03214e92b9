//! Bounded cache of rendered symbol bitmaps
//!
//! Keys capture every input that changes the pixels: symbology, text,
//! rotation, module scale, bar height, encoder-drawn text, and the raster
//! size. Labels repeated across a sheet are therefore rasterized once.
//!
//! Entries are evicted least-recently-used first once the capacity is
//! reached. The cache is internally locked and can be shared between an
//! export and a preview through `Arc`.

use crate::{Bitmap, EncodeError, RasterSize};
use layout_engine::SymbolRequest;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default number of bitmaps kept
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Fixed-point conversion so float parameters can be hashed
fn fixed(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

/// Everything that affects a rendered symbol bitmap
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub symbology: String,
    pub text: String,
    pub rotation: char,
    /// Module scale in thousandths
    pub scale_fixed: i64,
    /// Bar height in thousandths
    pub bar_height_fixed: i64,
    pub native_font: Option<String>,
    pub native_size_fixed: Option<i64>,
    pub native_gap_fixed: Option<i64>,
    pub width_px: u32,
    pub height_px: u32,
}

impl RenderKey {
    pub fn new(request: &SymbolRequest, size: RasterSize) -> Self {
        let native = request.native_text.as_ref();
        Self {
            symbology: request.symbology.encoder_id().to_string(),
            text: request.text.clone(),
            rotation: request.rotation.encoder_code(),
            scale_fixed: fixed(request.scale),
            bar_height_fixed: fixed(request.bar_height),
            native_font: native.map(|style| style.font.clone()),
            native_size_fixed: native.map(|style| fixed(style.size)),
            native_gap_fixed: native.map(|style| fixed(style.gap)),
            width_px: size.width,
            height_px: size.height,
        }
    }
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<RenderKey, Arc<Bitmap>>,
    /// Most recently used at the front
    lru: VecDeque<RenderKey>,
    stats: CacheStats,
}

impl CacheInner {
    /// Move a key to the front of the recency list.
    ///
    /// This scans the list, so a hit costs O(capacity). Capacities stay in
    /// the hundreds, where the scan is cheaper than hashing into a linked
    /// map.
    fn touch(&mut self, key: &RenderKey) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            if let Some(existing) = self.lru.remove(pos) {
                self.lru.push_front(existing);
            }
        }
    }

    fn evict_to(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            let Some(oldest) = self.lru.pop_back() else {
                break;
            };
            self.entries.remove(&oldest);
            self.stats.evictions += 1;
        }
    }
}

/// LRU cache of rendered bitmaps
#[derive(Debug)]
pub struct BitmapCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl Default for BitmapCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl BitmapCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // the inner state stays consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Look up a bitmap without rendering
    pub fn get(&self, key: &RenderKey) -> Option<Arc<Bitmap>> {
        let mut inner = self.lock();
        let found = inner.entries.get(key).cloned();
        match found {
            Some(bitmap) => {
                inner.stats.hits += 1;
                inner.touch(key);
                Some(bitmap)
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Cached bitmap for `key`, rendering it with `render` on a miss.
    ///
    /// Failed renders are not cached. Rendering runs outside the lock, so
    /// two callers racing on the same key may both render; the first
    /// insert wins.
    pub fn get_or_render<F>(&self, key: RenderKey, render: F) -> Result<Arc<Bitmap>, EncodeError>
    where
        F: FnOnce() -> Result<Bitmap, EncodeError>,
    {
        if let Some(bitmap) = self.get(&key) {
            return Ok(bitmap);
        }

        let bitmap = Arc::new(render()?);

        let mut inner = self.lock();
        if let Some(existing) = inner.entries.get(&key).cloned() {
            inner.touch(&key);
            return Ok(existing);
        }
        inner.entries.insert(key.clone(), Arc::clone(&bitmap));
        inner.lru.push_front(key);
        inner.evict_to(self.capacity);
        Ok(bitmap)
    }

    /// Drop every entry, keeping the counters
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.lru.clear();
    }

    pub fn reset_stats(&self) {
        self.lock().stats = CacheStats::default();
    }
}
