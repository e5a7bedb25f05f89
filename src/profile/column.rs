//! Per-column statistics.

use foldhash::{HashSet, HashSetExt};
use serde::Serialize;

use super::stats::{mean, median_sorted, percentage, sample_std};
use crate::dataset::Column;
use crate::field_type::{ColumnKind, Value};

/// Statistics for numeric columns, over non-null values only.
///
/// `None` marks a statistic that is undefined for the column (no values, or a
/// single value for `std`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub std: Option<f64>,
}

impl NumericStats {
    /// True when the column had no values to summarise.
    pub fn is_undefined(&self) -> bool {
        self.mean.is_none()
    }
}

/// Statistics for text columns. Lengths are in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub min_length: usize,
    pub max_length: usize,
    /// Zero-length strings (distinct from nulls).
    pub empty_strings: usize,
}

/// Type-specific payload of a column profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "dtype", rename_all = "lowercase")]
pub enum ColumnStats {
    Numeric(NumericStats),
    Text(TextStats),
    Other,
}

impl ColumnStats {
    /// The column kind this payload belongs to.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnStats::Numeric(_) => ColumnKind::Numeric,
            ColumnStats::Text(_) => ColumnKind::Text,
            ColumnStats::Other => ColumnKind::Other,
        }
    }
}

/// Profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    /// Column name. Serialized as the map key by the dataset profile.
    #[serde(skip)]
    pub name: String,
    pub non_null: usize,
    pub null: usize,
    /// `null / rows * 100`, rounded to two decimals.
    pub null_percentage: f64,
    /// Distinct non-null values.
    pub unique: usize,
    #[serde(flatten)]
    pub stats: ColumnStats,
}

impl ColumnProfile {
    /// Data type of the profiled column.
    pub fn kind(&self) -> ColumnKind {
        self.stats.kind()
    }

    /// Non-null share of the rows, in percent. Zero rows yields zero.
    pub fn non_null_percentage(&self) -> f64 {
        let rows = self.non_null + self.null;
        if rows == 0 {
            0.0
        } else {
            self.non_null as f64 / rows as f64 * 100.0
        }
    }
}

/// Hashable identity of a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Null,
    Number(u64),
    Text(&'a str),
}

impl<'a> CellKey<'a> {
    pub(crate) fn of(cell: Option<&'a Value>) -> Self {
        match cell {
            None => CellKey::Null,
            // -0.0 and 0.0 are the same value
            Some(Value::Number(n)) if *n == 0.0 => CellKey::Number(0f64.to_bits()),
            Some(Value::Number(n)) => CellKey::Number(n.to_bits()),
            Some(Value::Text(s)) => CellKey::Text(s),
        }
    }
}

/// Compute the profile of one column of a dataset with `num_rows` rows.
pub fn analyze_column(column: &Column, num_rows: usize) -> ColumnProfile {
    let values: Vec<&Value> = column.cells.iter().flatten().collect();
    let non_null = values.len();
    let null = num_rows.saturating_sub(non_null);

    let mut distinct = HashSet::with_capacity(non_null);
    for value in &values {
        distinct.insert(CellKey::of(Some(*value)));
    }

    let stats = match column.kind {
        ColumnKind::Numeric => ColumnStats::Numeric(numeric_stats(&values)),
        ColumnKind::Text => ColumnStats::Text(text_stats(&values)),
        ColumnKind::Other => ColumnStats::Other,
    };

    ColumnProfile {
        name: column.name.clone(),
        non_null,
        null,
        null_percentage: percentage(null, num_rows),
        unique: distinct.len(),
        stats,
    }
}

fn numeric_stats(values: &[&Value]) -> NumericStats {
    let mut numbers: Vec<f64> = values
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        })
        .collect();

    if numbers.is_empty() {
        return NumericStats::default();
    }

    numbers.sort_by(f64::total_cmp);
    NumericStats {
        mean: mean(&numbers),
        median: median_sorted(&numbers),
        min: numbers.first().copied(),
        max: numbers.last().copied(),
        std: sample_std(&numbers),
    }
}

fn text_stats(values: &[&Value]) -> TextStats {
    let mut lengths = values.iter().filter_map(|v| v.char_len());
    let Some(first) = lengths.next() else {
        return TextStats::default();
    };

    let mut stats = TextStats {
        min_length: first,
        max_length: first,
        empty_strings: usize::from(first == 0),
    };
    for len in lengths {
        stats.min_length = stats.min_length.min(len);
        stats.max_length = stats.max_length.max(len);
        if len == 0 {
            stats.empty_strings += 1;
        }
    }
    stats
}
