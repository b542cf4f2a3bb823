//! Lenient value parsing for loosely typed listing fields.
//!
//! The REST API hands back budgets as `300`, `"300"` or `"300 USD"`, dates as
//! ISO strings or epoch milliseconds, and occasionally garbage. Nothing here
//! ever fails: every parser returns `NaN`, `None` or a default instead, and
//! callers decide what a missing value means for them.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Naive date-time layouts accepted after RFC 3339 and RFC 2822 fail.
/// Naive values are read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Number parsing
// =============================================================================

/// Parse the longest leading decimal number in `input`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"300 USD"`
/// gives `300.0`. An optional sign, `Infinity`, a fraction and an exponent are
/// understood. Returns `NaN` when no number prefix exists.
pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    let negative = matches!(bytes.first(), Some(b'-'));
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse the longest leading base-10 integer in `input`.
///
/// Returns `None` when there is no digit prefix. Values outside the `i64`
/// range saturate at `i64::MIN` or `i64::MAX`.
pub fn parse_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    let negative = matches!(bytes.first(), Some(b'-'));
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    // Only overflow can fail here: the prefix is a sign plus digits.
    Some(s[..end].parse::<i64>().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

// =============================================================================
// Date parsing
// =============================================================================

/// Parse a textual date.
///
/// Tries RFC 3339, then RFC 2822, then the naive layouts in
/// [`NAIVE_DATETIME_FORMATS`], then a bare `YYYY-MM-DD` at midnight UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Interpret a JSON number as epoch milliseconds.
pub fn date_from_millis(number: &Number) -> Option<DateTime<Utc>> {
    let millis = match number.as_i64() {
        Some(millis) => millis,
        None => {
            let float = number.as_f64()?;
            if !float.is_finite() {
                return None;
            }
            float.trunc() as i64
        }
    };
    DateTime::from_timestamp_millis(millis)
}

// =============================================================================
// Loosely typed field values
// =============================================================================

/// A numeric field that may arrive as a number, a string, or something else.
///
/// The original JSON representation is kept so a record serializes back to
/// exactly what was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(Number),
    Text(String),
    Other(Value),
}

impl NumberLike {
    /// Float view of the value; `NaN` when it is not numeric.
    pub fn to_f64(&self) -> f64 {
        match self {
            NumberLike::Number(number) => number.as_f64().unwrap_or(f64::NAN),
            NumberLike::Text(text) => parse_float(text),
            NumberLike::Other(_) => f64::NAN,
        }
    }

    /// Integer view of the value, truncating fractional numbers.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            NumberLike::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            }),
            NumberLike::Text(text) => parse_int(text),
            NumberLike::Other(_) => None,
        }
    }

    /// True for the empty string, which callers treat as "no value".
    pub fn is_blank(&self) -> bool {
        matches!(self, NumberLike::Text(text) if text.is_empty())
    }
}

impl From<f64> for NumberLike {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(NumberLike::Number)
            .unwrap_or(NumberLike::Other(Value::Null))
    }
}

impl From<i64> for NumberLike {
    fn from(value: i64) -> Self {
        NumberLike::Number(Number::from(value))
    }
}

impl From<&str> for NumberLike {
    fn from(value: &str) -> Self {
        NumberLike::Text(value.to_string())
    }
}

/// A date field that may arrive as epoch milliseconds, a string, or junk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateLike {
    Millis(Number),
    Text(String),
    Other(Value),
}

impl DateLike {
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            DateLike::Millis(number) => date_from_millis(number),
            DateLike::Text(text) => parse_date(text),
            DateLike::Other(_) => None,
        }
    }

    /// Empty strings, zero, `false` and `null` count as "not set", which makes
    /// a record fall back to its secondary date field.
    pub fn is_unset(&self) -> bool {
        match self {
            DateLike::Millis(number) => number.as_f64() == Some(0.0),
            DateLike::Text(text) => text.is_empty(),
            DateLike::Other(value) => matches!(value, Value::Null | Value::Bool(false)),
        }
    }
}

impl From<&str> for DateLike {
    fn from(value: &str) -> Self {
        DateLike::Text(value.to_string())
    }
}

/// Text view of a JSON value, used for search and display.
///
/// Strings are used as they are, numbers and booleans are rendered, and
/// arrays render their elements joined with commas. Objects and null have
/// no text.
pub fn text_view(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Bool(flag) => Some(Cow::Owned(flag.to_string())),
        Value::Array(items) => Some(Cow::Owned(
            items
                .iter()
                .map(|item| text_view(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        )),
        Value::Null | Value::Object(_) => None,
    }
}

/// `deserialize_with` helper for optional text criteria that must never
/// reject a request because of an unexpected JSON type.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_view).map(Cow::into_owned))
}

/// `deserialize_with` helper for record fields: a key that is present is
/// always `Some`, even when its value is `null`, so it is written back.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
