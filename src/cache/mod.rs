//! Cache module - Numeric value to display string cache
//!
//! Provides:
//! - The cache table (allocate, borrow, is_cached, flush)
//! - Configuration and usage counters
//! - Get-or-create helpers and the `ToCachedString` extension trait
//! - The process-wide shared instance

pub mod ext;
pub mod global;
pub mod meta;
pub mod store;
