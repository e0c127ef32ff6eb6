//! Cache configuration and counters

use serde::{Deserialize, Serialize};

/// Construction-time settings for a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of entries to reserve room for up front
    #[serde(default)]
    pub initial_capacity: usize,
}

/// Counters describing cache usage since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries currently stored
    pub entries: usize,

    /// Lookups through `borrow`/`try_borrow` that found an entry
    pub hits: u64,

    /// Lookups through `borrow`/`try_borrow` that found nothing
    pub misses: u64,

    /// Successful allocations
    pub inserted: u64,

    /// Allocations for a value that was already cached
    pub rejected: u64,

    /// Number of flushes
    pub flushes: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, or 0 when nothing was looked up
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
