//! Dataset-level profiling.

use foldhash::{HashSet, HashSetExt};
use rayon::prelude::*;
use serde::{Serialize, Serializer, ser::SerializeMap};

use super::column::{CellKey, ColumnProfile, analyze_column};
use super::score::quality_score;
use super::stats::percentage;
use crate::dataset::Dataset;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Duplicate-row statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DuplicateStats {
    /// Rows equal (in every column) to an earlier row.
    pub total: usize,
    /// `total / rows * 100`, rounded to two decimals; `0` for an empty dataset.
    pub percentage: f64,
}

/// Statistical summary of one dataset. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    /// Source identifier, normally the file name.
    pub filename: String,
    pub rows: usize,
    pub columns: usize,
    /// Estimated in-memory size of the loaded dataset.
    pub size_bytes: usize,
    pub size_mb: f64,
    pub duplicates: DuplicateStats,
    /// Column profiles in header order.
    #[serde(serialize_with = "serialize_columns")]
    pub columns_info: Vec<ColumnProfile>,
}

impl DatasetProfile {
    /// Quality score of this profile; see [`quality_score`].
    pub fn quality_score(&self) -> f64 {
        quality_score(self)
    }

    /// Mean null percentage across columns, `0` with no columns.
    pub fn avg_null_percentage(&self) -> f64 {
        if self.columns_info.is_empty() {
            return 0.0;
        }
        self.columns_info
            .iter()
            .map(|c| c.null_percentage)
            .sum::<f64>()
            / self.columns_info.len() as f64
    }

    /// Look up a column profile by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns_info.iter().find(|c| c.name == name)
    }
}

fn serialize_columns<S: Serializer>(
    columns: &[ColumnProfile],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(columns.len()))?;
    for column in columns {
        map.serialize_entry(&column.name, column)?;
    }
    map.end()
}

/// Profile a dataset loaded from `source`.
///
/// Columns are analysed in parallel; they share no state.
pub fn profile_dataset(dataset: &Dataset, source: &str) -> DatasetProfile {
    let rows = dataset.num_rows();
    let columns_info: Vec<ColumnProfile> = dataset
        .columns()
        .par_iter()
        .map(|column| analyze_column(column, rows))
        .collect();

    let total = count_duplicate_rows(dataset);
    let size_bytes = dataset.estimated_size_bytes();

    DatasetProfile {
        filename: source.to_string(),
        rows,
        columns: dataset.num_columns(),
        size_bytes,
        size_mb: size_bytes as f64 / BYTES_PER_MB,
        duplicates: DuplicateStats {
            total,
            percentage: percentage(total, rows),
        },
        columns_info,
    }
}

/// Count rows that repeat an earlier row across all columns. Nulls match nulls.
pub fn count_duplicate_rows(dataset: &Dataset) -> usize {
    if dataset.num_columns() == 0 {
        // Rows without columns are indistinguishable.
        return dataset.num_rows().saturating_sub(1);
    }

    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(dataset.num_rows());
    (0..dataset.num_rows())
        .filter(|&i| !seen.insert(dataset.row(i).map(CellKey::of).collect()))
        .count()
}
