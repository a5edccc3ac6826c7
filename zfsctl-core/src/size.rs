// zfsctl-core/src/size.rs

//! Parses human-readable capacities such as `10G` or `1.5T` into exact byte counts.
//!
//! The same parser reads `zfs`/`zpool` output columns and validates size
//! arguments (e.g. a volume size) before they are passed back to `zfs`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SIZE_PATTERN: Regex =
        Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)([KMGTP]?)$").expect("size pattern is valid");
}

/// Binary units in ascending order; each is 1024 times the previous one.
const UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];

fn unit_multiplier(unit: &str) -> Option<u64> {
    let rank = UNITS.iter().position(|u| *u == unit)?;
    1024u64.checked_pow(rank as u32)
}

/// Converts `text` into a byte count.
///
/// Accepts a decimal mantissa (at least one digit, optional fraction) followed by
/// an optional unit letter from `K`, `M`, `G`, `T`, `P`. Fractional results are
/// floored. Returns `None` for anything else, including trailing characters,
/// unsupported unit letters and values that overflow `u64`.
pub fn parse_size(text: &str) -> Option<u64> {
    let caps = SIZE_PATTERN.captures(text)?;
    let mantissa = caps.get(1)?.as_str();
    let multiplier = unit_multiplier(caps.get(2).map_or("", |m| m.as_str()))?;

    if let Ok(whole) = mantissa.parse::<u64>() {
        return whole.checked_mul(multiplier);
    }

    let value = mantissa.parse::<f64>().ok()? * multiplier as f64;
    if !value.is_finite() || value < 0.0 || value >= u64::MAX as f64 {
        return None;
    }
    Some(value.floor() as u64)
}
