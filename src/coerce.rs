//! Lenient numeric reads for CSV fields.
//!
//! A field is read by its leading numeric prefix, so `"12 units"` is 12 and
//! `"12.7"` read as an integer is 12. Anything without such a prefix,
//! including a missing field, is 0. Malformed numbers are never an error.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_INT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?\d+)").unwrap()
});

static RE_FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    // 12, 12., 12.5, .5, each with an optional exponent
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let caps = RE_INT_PREFIX.captures(s)?;
    let digits = caps.get(1)?.as_str();
    match digits.parse::<i64>() {
        Ok(v) => Some(v),
        // digit run too long for i64; clamp instead of dropping the value
        Err(_) if digits.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let caps = RE_FLOAT_PREFIX.captures(s)?;
    caps.get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

pub fn int_or_zero(field: Option<&str>) -> i64 {
    field.and_then(parse_int_prefix).unwrap_or(0)
}

pub fn float_or_zero(field: Option<&str>) -> f64 {
    field.and_then(parse_float_prefix).unwrap_or(0.0)
}
