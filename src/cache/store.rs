//! Cache store - Value to display string table

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use xxhash_rust::xxh3::Xxh3Builder;

use crate::cache::meta::{CacheConfig, CacheStats};
use crate::core::error::FormatError;
use crate::core::format::FormatSpec;
use crate::core::number::{NormalizedKey, Number};

/// Shared, immutable rendering of a cached value
pub type DisplayString = Arc<str>;

/// Maps numeric values to the string they were first rendered as.
///
/// Integer, single and double inputs share one key space (see
/// [`NormalizedKey`]), so `2`, `2.0f32` and `2.0f64` hit the same entry.
/// The table only grows; [`ValueStringCache::flush`] is the sole way to
/// drop entries. Not `Sync`: use [`crate::cache::global`] for the shared
/// process-wide instance.
#[derive(Debug)]
pub struct ValueStringCache {
    entries: HashMap<NormalizedKey, DisplayString, Xxh3Builder>,
    empty: DisplayString,
    hits: Cell<u64>,
    misses: Cell<u64>,
    inserted: u64,
    rejected: u64,
    flushes: u64,
}

impl Default for ValueStringCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueStringCache {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::with_capacity_and_hasher(config.initial_capacity, Xxh3Builder::new()),
            empty: Arc::from(""),
            hits: Cell::new(0),
            misses: Cell::new(0),
            inserted: 0,
            rejected: 0,
            flushes: 0,
        }
    }

    /// Drop every entry. Strings already handed out stay valid.
    pub fn flush(&mut self) {
        let discarded = self.entries.len();
        self.entries.clear();
        self.flushes += 1;
        debug!(discarded, "flushed value string cache");
    }

    /// Render `value` and store it unless its key is already present.
    ///
    /// An empty `format` selects the default rendering. Returns `Ok(true)`
    /// when a new entry was added and `Ok(false)` when the key was already
    /// cached, in which case the stored string is left untouched. An invalid
    /// specifier leaves the cache unmodified.
    pub fn allocate(&mut self, value: impl Into<Number>, format: &str) -> Result<bool, FormatError> {
        let value = value.into();
        let key = value.key();

        if self.entries.contains_key(&key) {
            self.rejected += 1;
            trace!(%value, format, "value already cached");
            return Ok(false);
        }

        let rendered = format
            .parse::<FormatSpec>()
            .and_then(|spec| spec.render(value))
            .inspect_err(|e| debug!(%value, format, error = %e, "rejected format specifier"))?;

        trace!(%value, rendered = rendered.as_str(), "cached value string");
        self.entries.insert(key, Arc::from(rendered));
        self.inserted += 1;
        Ok(true)
    }

    /// Cached string for `value`, or the empty string when absent
    pub fn borrow(&self, value: impl Into<Number>) -> DisplayString {
        self.try_borrow(value)
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }

    /// Cached string for `value`, if any
    pub fn try_borrow(&self, value: impl Into<Number>) -> Option<DisplayString> {
        match self.entries.get(&value.into().key()) {
            Some(display) => {
                self.hits.set(self.hits.get() + 1);
                Some(Arc::clone(display))
            }
            None => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    pub fn is_cached(&self, value: impl Into<Number>) -> bool {
        self.entries.contains_key(&value.into().key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.get(),
            misses: self.misses.get(),
            inserted: self.inserted,
            rejected: self.rejected,
            flushes: self.flushes,
        }
    }
}

#[cfg(test)]
#[allow(clippy::approx_constant)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_then_borrow() {
        let mut cache = ValueStringCache::new();
        assert!(cache.allocate(3.14159, "0.00").unwrap());
        assert_eq!(&*cache.borrow(3.14159), "3.14");
        assert!(cache.is_cached(3.14159));

        assert!(!cache.allocate(3.14159, "0.0000").unwrap());
        assert_eq!(&*cache.borrow(3.14159), "3.14");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cross_type_keys() {
        let mut cache = ValueStringCache::new();
        assert!(cache.allocate(2, "").unwrap());
        assert!(cache.is_cached(2.0f32));
        assert!(cache.is_cached(2.0f64));
        assert_eq!(&*cache.borrow(2.0f64), "2");
        assert!(!cache.allocate(2.0f32, "F2").unwrap());
        assert_eq!(&*cache.borrow(2), "2");
    }

    #[test]
    fn test_borrow_miss_is_empty_and_does_not_insert() {
        let cache = ValueStringCache::new();
        assert_eq!(&*cache.borrow(17), "");
        assert!(cache.try_borrow(17).is_none());
        assert!(!cache.is_cached(17));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_flush() {
        let mut cache = ValueStringCache::new();
        cache.allocate(1, "").unwrap();
        cache.allocate(2.5f32, "").unwrap();
        let held = cache.borrow(2.5f32);

        cache.flush();

        assert!(cache.is_empty());
        assert!(!cache.is_cached(1));
        assert_eq!(&*cache.borrow(2.5f32), "");
        assert_eq!(&*held, "2.5");
        assert!(cache.allocate(1, "000").unwrap());
        assert_eq!(&*cache.borrow(1), "001");
    }

    #[test]
    fn test_sentinels_do_not_collide() {
        let mut cache = ValueStringCache::new();
        assert!(cache.allocate(f64::NAN, "").unwrap());
        assert!(!cache.allocate(f32::NAN, "").unwrap());
        assert!(cache.allocate(f64::INFINITY, "").unwrap());
        assert!(!cache.allocate(f32::INFINITY, "").unwrap());
        assert!(cache.allocate(f64::NEG_INFINITY, "").unwrap());
        assert!(cache.allocate(0, "").unwrap());
        assert!(cache.allocate(f64::MAX, "").unwrap());

        assert_eq!(&*cache.borrow(f64::NAN), "NaN");
        assert_eq!(&*cache.borrow(f64::INFINITY), "Infinity");
        assert_eq!(&*cache.borrow(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(&*cache.borrow(0), "0");
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_invalid_format_leaves_cache_unmodified() {
        let mut cache = ValueStringCache::new();
        let err = cache.allocate(1.5, "Q2").unwrap_err();
        assert_eq!(err, FormatError::Unsupported("Q2".to_string()));
        assert!(!cache.is_cached(1.5));

        assert!(cache.allocate(1.5, "").unwrap());
        // present keys short-circuit before the specifier is parsed
        assert_eq!(cache.allocate(1.5, "Q2"), Ok(false));
    }

    #[test]
    fn test_stats() {
        let mut cache = ValueStringCache::with_config(CacheConfig {
            initial_capacity: 16,
        });
        cache.allocate(1, "").unwrap();
        cache.allocate(1, "").unwrap();
        cache.borrow(1);
        cache.borrow(2);
        cache.flush();

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.flushes, 1);
    }
}
