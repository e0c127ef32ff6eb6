//! Core module - Numeric inputs and their rendering
//!
//! This module provides:
//! - The numeric sum type and its normalized cache key
//! - Culture-invariant formatting (default, standard and custom specifiers)
//! - Formatting errors

pub mod error;
pub mod format;
pub mod number;
