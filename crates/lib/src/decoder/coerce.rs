//! Permissive scalar conversion.
//!
//! Every function here maps any [`Scalar`] to the destination type without
//! failing: text that does not parse yields the type's zero value.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::{duration::parse_duration, time::parse_time, tree::Scalar};

/// Text form of any scalar.
pub fn to_text(value: &Scalar) -> String {
    match value {
        Scalar::Text(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Boolean literals: `1 t T TRUE true True` and `0 f F FALSE false False`.
/// Anything else is `false`.
pub fn to_bool(value: &Scalar) -> bool {
    match value {
        Scalar::Bool(b) => *b,
        Scalar::Text(text) => parse_bool(text).unwrap_or(false),
        _ => false,
    }
}

/// Parses a boolean literal.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Signed integer; out-of-range or malformed values yield zero.
pub fn to_i64(value: &Scalar) -> i64 {
    match value {
        Scalar::Text(text) => text.trim().parse().unwrap_or(0),
        Scalar::Int(n) => *n,
        Scalar::Uint(n) => i64::try_from(*n).unwrap_or(0),
        Scalar::Bool(b) => i64::from(*b),
        Scalar::Float(_) | Scalar::Time(_) => 0,
    }
}

/// Unsigned integer; negative, out-of-range or malformed values yield zero.
pub fn to_u64(value: &Scalar) -> u64 {
    match value {
        Scalar::Text(text) => text.trim().parse().unwrap_or(0),
        Scalar::Int(n) => u64::try_from(*n).unwrap_or(0),
        Scalar::Uint(n) => *n,
        Scalar::Bool(b) => u64::from(*b),
        Scalar::Float(_) | Scalar::Time(_) => 0,
    }
}

/// Floating point number; malformed text yields zero.
pub fn to_f64(value: &Scalar) -> f64 {
    match value {
        Scalar::Text(text) => text.trim().parse().unwrap_or(0.0),
        Scalar::Int(n) => *n as f64,
        Scalar::Uint(n) => *n as f64,
        Scalar::Float(f) => *f,
        Scalar::Bool(_) | Scalar::Time(_) => 0.0,
    }
}

/// Instant in any canonical text form.
pub fn to_time(value: &Scalar) -> Option<DateTime<FixedOffset>> {
    match value {
        Scalar::Time(time) => Some(*time),
        Scalar::Text(text) => parse_time(text),
        _ => None,
    }
}

/// Duration text; plain numbers are read as nanoseconds. Anything else is
/// zero.
pub fn to_duration(value: &Scalar) -> Duration {
    match value {
        Scalar::Text(text) => parse_duration(text)
            .or_else(|| text.trim().parse().ok().map(Duration::from_nanos))
            .unwrap_or_default(),
        Scalar::Int(n) => u64::try_from(*n).map(Duration::from_nanos).unwrap_or_default(),
        Scalar::Uint(n) => Duration::from_nanos(*n),
        _ => Duration::ZERO,
    }
}

/// Narrows a signed integer, yielding zero when out of range.
pub fn narrow_signed<T: TryFrom<i64> + Default>(value: &Scalar) -> T {
    T::try_from(to_i64(value)).unwrap_or_default()
}

/// Narrows an unsigned integer, yielding zero when out of range.
pub fn narrow_unsigned<T: TryFrom<u64> + Default>(value: &Scalar) -> T {
    T::try_from(to_u64(value)).unwrap_or_default()
}
