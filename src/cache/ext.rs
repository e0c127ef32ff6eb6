//! Get-or-create helpers on top of the cache contract
//!
//! Nothing here touches the table directly: every call goes through
//! `is_cached`, `allocate` and `borrow`.

use crate::cache::global;
use crate::cache::store::{DisplayString, ValueStringCache};
use crate::core::error::FormatError;
use crate::core::number::Number;

impl ValueStringCache {
    /// Cached string for `value`, rendering it with `format` on first use.
    ///
    /// On a hit `format` is ignored and the string from the first allocation
    /// is returned, so the result depends on which call rendered the value
    /// first. Only a format error from that first rendering can fail.
    pub fn get_or_create(
        &mut self,
        value: impl Into<Number>,
        format: &str,
    ) -> Result<DisplayString, FormatError> {
        let value = value.into();
        if self.is_cached(value) {
            return Ok(self.borrow(value));
        }
        self.allocate(value, format)?;
        Ok(self.borrow(value))
    }
}

/// Render through the process-wide cache
pub trait ToCachedString {
    /// See [`ValueStringCache::get_or_create`]
    fn to_cached_string(self, format: &str) -> Result<DisplayString, FormatError>;
}

impl<T> ToCachedString for T
where
    T: Into<Number>,
{
    fn to_cached_string(self, format: &str) -> Result<DisplayString, FormatError> {
        global::get_or_create(self, format)
    }
}
