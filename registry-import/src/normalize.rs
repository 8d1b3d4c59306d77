//! Field normalization: raw source text to SQL literals.
//!
//! Every value that ends up in an insert statement passes through
//! [`normalize`]. Absent and empty values become the unquoted `NULL`
//! keyword; strings are quoted with embedded quotes doubled.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use registry_catalog::FieldKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The exact text of a value as it appears inside an insert statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(String);

impl Literal {
    pub const NULL_KEYWORD: &'static str = "NULL";

    pub fn null() -> Self {
        Self(Self::NULL_KEYWORD.to_string())
    }

    /// A single-quoted string literal with embedded quotes doubled.
    pub fn quoted(value: &str) -> Self {
        Self(format!("'{}'", value.replace('\'', "''")))
    }

    fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn is_null(&self) -> bool {
        self.0 == Self::NULL_KEYWORD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value that cannot be rendered as its declared kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} value '{value}'")]
pub struct NormalizeError {
    pub kind: FieldKind,
    pub value: String,
}

impl NormalizeError {
    fn new(kind: FieldKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// What to do with a value that fails normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidValuePolicy {
    /// Fail the whole run, naming the offending row.
    #[default]
    Abort,
    /// Drop the row, report it, and keep going.
    Skip,
    /// Render the value as `NULL` and keep the row.
    Null,
}

impl InvalidValuePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for InvalidValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvalidValuePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            "null" => Ok(Self::Null),
            other => Err(format!(
                "unknown policy '{other}' (expected abort, skip or null)"
            )),
        }
    }
}

/// Render `value` as a literal of the given kind.
///
/// `None` means the field was absent from the row. Booleans never fail and
/// never render `NULL`.
pub fn normalize(value: Option<&str>, kind: FieldKind) -> Result<Literal, NormalizeError> {
    if kind == FieldKind::Boolean {
        return Ok(boolean(value));
    }

    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(Literal::null()),
    };

    match kind {
        FieldKind::String | FieldKind::Reference => Ok(Literal::quoted(value)),
        FieldKind::Integer => integer(value),
        FieldKind::Decimal => decimal(value),
        FieldKind::Timestamp => timestamp(value),
        FieldKind::Boolean => Ok(boolean(Some(value))),
    }
}

fn boolean(value: Option<&str>) -> Literal {
    match value {
        Some(v) if v.eq_ignore_ascii_case("true") => Literal::raw("1"),
        _ => Literal::raw("0"),
    }
}

fn integer(value: &str) -> Result<Literal, NormalizeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Literal::null());
    }
    trimmed
        .parse::<i64>()
        .map(|n| Literal::raw(n.to_string()))
        .map_err(|_| NormalizeError::new(FieldKind::Integer, value))
}

fn decimal(value: &str) -> Result<Literal, NormalizeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Literal::null());
    }
    if !is_plain_decimal(trimmed) {
        return Err(NormalizeError::new(FieldKind::Decimal, value));
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Literal::raw(trimmed)),
        _ => Err(NormalizeError::new(FieldKind::Decimal, value)),
    }
}

/// Optional sign, digits, at most one point, at least one digit.
///
/// Rejects forms `f64` would otherwise accept (`inf`, `1e5`, `NaN`).
fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut seen_point = false;
    let mut seen_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

fn timestamp(value: &str) -> Result<Literal, NormalizeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Literal::null());
    }
    let parsed =
        parse_timestamp(trimmed).ok_or_else(|| NormalizeError::new(FieldKind::Timestamp, value))?;
    Ok(Literal::quoted(
        &parsed.to_rfc3339_opts(SecondsFormat::Millis, true),
    ))
}

/// Parse a calendar date or date-time. Values without an offset are UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
