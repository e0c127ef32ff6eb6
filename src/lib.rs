//! numstr - A cache of display strings for frequently rendered numbers
//!
//! numstr provides:
//! - A table from numeric values (`i32`, `f32`, `f64`) to their rendered strings
//! - Key normalization so equal values of different types share an entry
//! - Culture-invariant formatting with standard (`F2`, `N0`, `P1`) and custom
//!   (`0.00`, `#,##0`) specifiers
//! - Get-or-create helpers and a process-wide shared instance
//!
//! ```
//! use numstr::{ToCachedString, ValueStringCache};
//!
//! let mut cache = ValueStringCache::new();
//! assert!(cache.allocate(2.71828, "0.00").unwrap());
//! assert_eq!(&*cache.borrow(2.71828), "2.72");
//!
//! // an integer and a float with the same value share one entry
//! cache.allocate(7, "").unwrap();
//! assert!(cache.is_cached(7.0f32));
//!
//! let hp = 42i32.to_cached_string("").unwrap();
//! assert_eq!(&*hp, "42");
//! ```

pub mod cache;
pub mod core;

pub use crate::cache::ext::ToCachedString;
pub use crate::cache::global;
pub use crate::cache::meta::{CacheConfig, CacheStats};
pub use crate::cache::store::{DisplayString, ValueStringCache};
pub use crate::core::error::FormatError;
pub use crate::core::format::{format_number, FormatSpec};
pub use crate::core::number::{NormalizedKey, Number};
