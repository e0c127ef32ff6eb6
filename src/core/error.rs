//! Formatting errors

use thiserror::Error;

/// Reasons a format specifier cannot render a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A standard specifier letter this crate does not implement
    #[error("unsupported format specifier: {0:?}")]
    Unsupported(String),

    /// Precision outside 0..=99
    #[error("invalid precision in format specifier: {0:?}")]
    InvalidPrecision(String),

    /// `D` applied to a floating-point value
    #[error("format specifier {0:?} is only valid for integers")]
    IntegerOnly(String),

    /// Custom pattern without any `0` or `#` placeholder
    #[error("format specifier {0:?} has no digit placeholder")]
    NoPlaceholder(String),
}
