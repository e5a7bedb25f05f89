use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Decimal or scientific notation with an optional sign.
///
/// Narrower than `f64::from_str`, which also accepts `inf` and `nan`.
static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?$").expect("Invalid number pattern")
});

/// A single non-null cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric value.
    Number(f64),
    /// Text value. The empty string is a value, not a null.
    Text(String),
}

impl Value {
    /// Length of a text value in characters.
    pub fn char_len(&self) -> Option<usize> {
        match self {
            Value::Text(s) => Some(s.chars().count()),
            Value::Number(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Parse a raw field as a number, if it has numeric syntax.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if NUMBER_PATTERN.is_match(trimmed) {
        trimmed.parse().ok()
    } else {
        None
    }
}

/// Data type assigned to a column once, at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every non-null value is a number (also used for all-null columns).
    #[default]
    Numeric,
    /// Textual values.
    Text,
    /// Mixed typed values; only the generic statistics apply.
    Other,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Other => write!(f, "other"),
        }
    }
}

impl ColumnKind {
    /// Kind of a column built from already-typed values.
    ///
    /// All numbers (or no values at all) is `Numeric`, all text is `Text`,
    /// anything mixed is `Other`.
    pub fn of_values<'a, I>(values: I) -> ColumnKind
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut seen_number = false;
        let mut seen_text = false;
        for value in values {
            match value {
                Value::Number(_) => seen_number = true,
                Value::Text(_) => seen_text = true,
            }
            if seen_number && seen_text {
                return ColumnKind::Other;
            }
        }
        if seen_text {
            ColumnKind::Text
        } else {
            ColumnKind::Numeric
        }
    }

    /// Kind of a column read from raw text fields (nulls already removed).
    ///
    /// Numeric if every value parses as a number, text otherwise.
    pub fn of_raw<'a, I>(raw: I) -> ColumnKind
    where
        I: IntoIterator<Item = &'a str>,
    {
        if raw.into_iter().all(|s| parse_number(s).is_some()) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }
}
