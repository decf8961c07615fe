use crate::shared::core::primitives::{NEVER_READ, Timestamp};
use serde_json::Value;

/// Parses the leading integer of `raw`, the way cached values have always
/// been read back. Anything without leading digits is treated as never read.
pub fn parse_timestamp(raw: &str) -> Timestamp {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<Timestamp>()
        .map(|value| sign * value)
        .unwrap_or(NEVER_READ)
}

/// Reads a timestamp out of a JSON value, accepting numbers and numeric strings.
pub fn timestamp_from_json(value: &Value) -> Timestamp {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as Timestamp))
            .unwrap_or(NEVER_READ),
        Value::String(raw) => parse_timestamp(raw),
        _ => NEVER_READ,
    }
}
