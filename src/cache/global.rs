//! Process-wide cache
//!
//! One [`ValueStringCache`] shared by the whole process, created on first
//! use and guarded by a mutex. Every function here is total: a lock poisoned
//! by a panicking caller is recovered rather than propagated.

use once_cell::sync::Lazy;
use std::sync::{Mutex, PoisonError};

use crate::cache::meta::CacheStats;
use crate::cache::store::{DisplayString, ValueStringCache};
use crate::core::error::FormatError;
use crate::core::number::Number;

static GLOBAL: Lazy<Mutex<ValueStringCache>> = Lazy::new(|| Mutex::new(ValueStringCache::new()));

/// Run `f` with exclusive access to the process-wide cache
pub fn with_global<R>(f: impl FnOnce(&mut ValueStringCache) -> R) -> R {
    let mut cache = GLOBAL.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut cache)
}

pub fn flush() {
    with_global(|cache| cache.flush())
}

pub fn allocate(value: impl Into<Number>, format: &str) -> Result<bool, FormatError> {
    let value = value.into();
    with_global(|cache| cache.allocate(value, format))
}

pub fn borrow(value: impl Into<Number>) -> DisplayString {
    let value = value.into();
    with_global(|cache| cache.borrow(value))
}

pub fn is_cached(value: impl Into<Number>) -> bool {
    let value = value.into();
    with_global(|cache| cache.is_cached(value))
}

/// See [`ValueStringCache::get_or_create`]
pub fn get_or_create(value: impl Into<Number>, format: &str) -> Result<DisplayString, FormatError> {
    let value = value.into();
    with_global(|cache| cache.get_or_create(value, format))
}

pub fn stats() -> CacheStats {
    with_global(|cache| cache.stats())
}
