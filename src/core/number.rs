//! Numeric inputs and their normalized cache keys
//!
//! The cache accepts three numeric kinds. All of them widen to `f64` without
//! loss, so the widened value is the common key domain.

use serde::Serialize;
use std::fmt;

/// A numeric value accepted by the cache
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Number {
    Int(i32),
    Single(f32),
    Double(f64),
}

impl Number {
    /// Widen to `f64`. Exact for every variant.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(v) => f64::from(v),
            Number::Single(v) => f64::from(v),
            Number::Double(v) => v,
        }
    }

    /// Whether the value is neither NaN nor infinite
    pub fn is_finite(self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Single(v) => v.is_finite(),
            Number::Double(v) => v.is_finite(),
        }
    }

    /// Canonical key for this value
    pub fn key(self) -> NormalizedKey {
        NormalizedKey::from(self)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Int(v)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Self {
        Number::Single(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Double(v)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}i32", v),
            Number::Single(v) => write!(f, "{}f32", v),
            Number::Double(v) => write!(f, "{}f64", v),
        }
    }
}

/// Canonical lookup key shared by all numeric kinds
///
/// Finite values are keyed by the bit pattern of their exact `f64` widening,
/// with `-0.0` folded onto `+0.0`. Non-finite values map to sentinels that
/// never equal any finite key or each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NormalizedKey {
    Finite(u64),
    NaN,
    PositiveInfinity,
    NegativeInfinity,
}

impl NormalizedKey {
    /// Recover the numeric value this key stands for
    pub fn value(self) -> f64 {
        match self {
            NormalizedKey::Finite(bits) => f64::from_bits(bits),
            NormalizedKey::NaN => f64::NAN,
            NormalizedKey::PositiveInfinity => f64::INFINITY,
            NormalizedKey::NegativeInfinity => f64::NEG_INFINITY,
        }
    }

    pub fn is_sentinel(self) -> bool {
        !matches!(self, NormalizedKey::Finite(_))
    }
}

impl From<f64> for NormalizedKey {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            NormalizedKey::NaN
        } else if v == f64::INFINITY {
            NormalizedKey::PositiveInfinity
        } else if v == f64::NEG_INFINITY {
            NormalizedKey::NegativeInfinity
        } else if v == 0.0 {
            // both zeros
            NormalizedKey::Finite(0.0f64.to_bits())
        } else {
            NormalizedKey::Finite(v.to_bits())
        }
    }
}

impl From<Number> for NormalizedKey {
    fn from(n: Number) -> Self {
        NormalizedKey::from(n.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_values_share_key_across_kinds() {
        assert_eq!(Number::from(2).key(), Number::from(2.0f32).key());
        assert_eq!(Number::from(2).key(), Number::from(2.0f64).key());
        assert_eq!(Number::from(-7).key(), Number::from(-7.0f32).key());
        assert_eq!(
            Number::from(i32::MAX).key(),
            Number::from(2_147_483_647.0f64).key()
        );
        assert_eq!(Number::from(0.5f32).key(), Number::from(0.5f64).key());
    }

    #[test]
    fn test_signed_zero_folds() {
        assert_eq!(Number::from(-0.0f64).key(), Number::from(0.0f64).key());
        assert_eq!(Number::from(-0.0f32).key(), Number::from(0).key());
    }

    #[test]
    fn test_distinct_values_distinct_keys() {
        // f32 0.1 is not the same number as f64 0.1
        assert_ne!(Number::from(0.1f32).key(), Number::from(0.1f64).key());

        let a = 1.0f64;
        let b = f64::from_bits(a.to_bits() + 1);
        assert_ne!(Number::from(a).key(), Number::from(b).key());

        let x = 16_777_216.0f32;
        let y = f32::from_bits(x.to_bits() + 1);
        assert_ne!(Number::from(x).key(), Number::from(y).key());
        assert_ne!(Number::from(16_777_217).key(), Number::from(x).key());
    }

    #[test]
    fn test_sentinels() {
        let nan = Number::from(f64::NAN).key();
        let other_nan = Number::from(f64::from_bits(0x7ff8_0000_0000_00ff)).key();
        let pos = Number::from(f32::INFINITY).key();
        let neg = Number::from(f64::NEG_INFINITY).key();

        assert_eq!(nan, NormalizedKey::NaN);
        assert_eq!(nan, other_nan);
        assert_eq!(Number::from(f32::NAN).key(), nan);
        assert_eq!(pos, NormalizedKey::PositiveInfinity);
        assert_eq!(neg, NormalizedKey::NegativeInfinity);
        assert_ne!(pos, neg);
        assert!(nan.is_sentinel() && pos.is_sentinel() && neg.is_sentinel());
        assert!(!Number::from(f64::MAX).key().is_sentinel());
    }

    #[test]
    fn test_is_finite() {
        assert!(Number::from(i32::MIN).is_finite());
        assert!(Number::from(f32::MAX).is_finite());
        assert!(!Number::from(f32::NAN).is_finite());
        assert!(!Number::from(f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn test_key_value_roundtrip() {
        assert_eq!(Number::from(3).key().value(), 3.0);
        assert_eq!(NormalizedKey::NegativeInfinity.value(), f64::NEG_INFINITY);
        assert!(NormalizedKey::NaN.value().is_nan());
    }

    #[test]
    fn test_number_serialize() {
        let json = serde_json::to_string(&Number::Int(4)).unwrap();
        assert_eq!(json, r#"{"kind":"int","value":4}"#);
    }
}
