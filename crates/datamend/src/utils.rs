//! Shared parsing and statistics helpers.

use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Leading decimal literal, optionally signed, with optional exponent.
static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float regex")
});

/// Parse a whole string as a finite number, ignoring surrounding whitespace.
///
/// ```rust,ignore
/// assert_eq!(parse_strict_number(" 7.5 "), Some(7.5));
/// assert_eq!(parse_strict_number("7.5 kg"), None);
/// ```
pub fn parse_strict_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse the longest numeric prefix of a string.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12kg"`
/// parses as 12. `Infinity` is accepted as a prefix as well.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    for (prefix, value) in [
        ("Infinity", f64::INFINITY),
        ("+Infinity", f64::INFINITY),
        ("-Infinity", f64::NEG_INFINITY),
    ] {
        if trimmed.starts_with(prefix) {
            return Some(value);
        }
    }
    LEADING_FLOAT
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

// =============================================================================
// Statistics
// =============================================================================

/// Sort floats ascending. NaN never reaches here since parsers reject it.
pub fn sort_floats(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; even-length input averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sort_floats(&mut sorted);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Element at `floor(n/2)` of the sorted input (upper median for even n).
pub fn positional_median(sorted: &[f64]) -> Option<f64> {
    sorted.get(sorted.len() / 2).copied()
}

/// Most frequent item by key; ties go to the first one encountered.
pub fn mode_by_key<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> Option<&'a T>
where
    T: 'a,
    K: Eq + std::hash::Hash,
    F: Fn(&T) -> K,
{
    let mut counts: std::collections::HashMap<K, (usize, usize, &'a T)> =
        std::collections::HashMap::new();
    for (order, item) in items.into_iter().enumerate() {
        counts
            .entry(key(item))
            .and_modify(|(count, _, _)| *count += 1)
            .or_insert((1, order, item));
    }

    counts
        .into_values()
        .max_by(|(ca, oa, _), (cb, ob, _)| ca.cmp(cb).then(ob.cmp(oa)))
        .map(|(_, _, item)| item)
}

// =============================================================================
// Tests
// =============================================================================
