//! Data-quality profiling.
//!
//! A [`DatasetProfile`] holds row/column counts, per-column null, distinct and
//! type-specific statistics, and the duplicate-row count. The quality score is
//! derived from a profile on demand:
//!
//! ```text
//! score = 100
//!       - 0.5 * sum(column null %)
//!       - 2.0 * duplicate row %
//! clamped to [0, 100]
//! ```

pub mod column;
pub mod dataset;
pub mod issues;
pub mod score;
pub mod stats;

pub use column::{ColumnProfile, ColumnStats, NumericStats, TextStats, analyze_column};
pub use dataset::{DatasetProfile, DuplicateStats, count_duplicate_rows, profile_dataset};
pub use issues::{Issue, IssueThresholds, find_issues};
pub use score::{Grade, quality_score};
