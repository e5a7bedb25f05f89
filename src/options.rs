use serde::{Deserialize, Serialize};

/// Null markers recognised by default, matching the usual CSV tooling conventions.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Candidate delimiters for detection, in preference order on ties.
pub const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

/// Field delimiter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Detect from the header line.
    #[default]
    Auto,
    /// Use the given byte.
    Fixed(u8),
}

impl Delimiter {
    /// Parse a delimiter from configuration text: `auto`, `tab`, `\t`, or a single character.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Delimiter::Auto),
            "tab" | "\\t" | "\t" => Some(Delimiter::Fixed(b'\t')),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii() => Some(Delimiter::Fixed(c as u8)),
                    _ => None,
                }
            }
        }
    }

    /// Resolve against the first line of the data.
    pub fn resolve(&self, data: &[u8]) -> u8 {
        match self {
            Delimiter::Fixed(b) => *b,
            Delimiter::Auto => detect_delimiter(data),
        }
    }
}

/// Pick the candidate delimiter occurring most often in the header line.
///
/// Falls back to comma when none occurs.
pub fn detect_delimiter(data: &[u8]) -> u8 {
    let end = data
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .unwrap_or(data.len());
    let header = &data[..end];

    let mut best = (b',', 0);
    for &candidate in CANDIDATE_DELIMITERS {
        let count = bytecount::count(header, candidate);
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

/// Options controlling how a CSV source becomes a `Dataset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Field delimiter (`auto` or a single character).
    #[serde(with = "delimiter_serde")]
    pub delimiter: Delimiter,
    /// Raw field values treated as null.
    pub null_values: Vec<String>,
    /// Keep empty fields as empty strings instead of nulls.
    pub keep_empty: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| (*s).to_string()).collect(),
            keep_empty: false,
        }
    }
}

impl ReadOptions {
    /// Returns true if the raw field is a null marker.
    pub fn is_null(&self, raw: &str) -> bool {
        if raw.is_empty() {
            return !self.keep_empty;
        }
        self.null_values.iter().any(|n| n == raw)
    }
}

mod delimiter_serde {
    use super::Delimiter;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(d: &Delimiter, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Delimiter::Auto => s.serialize_str("auto"),
            Delimiter::Fixed(b'\t') => s.serialize_str("tab"),
            Delimiter::Fixed(b) => s.serialize_str(&(*b as char).to_string()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Delimiter, D::Error> {
        let raw = String::deserialize(d)?;
        Delimiter::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid delimiter {raw:?}")))
    }
}
