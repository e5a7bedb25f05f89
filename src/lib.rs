//! csv-quality: data-quality profiling for CSV datasets
//!
//! Loads CSV files into typed columnar datasets, computes per-column
//! statistics and duplicate rows, scores each dataset from 0 to 100 and
//! renders the results as a console summary, a JSON profile document and a
//! Markdown quality report.
//!
//! # Quick Start
//!
//! ```no_run
//! use csv_quality::Profiler;
//!
//! let profiler = Profiler::new();
//! let profile = profiler.profile_path("data/raw/olist_orders_dataset.csv").unwrap();
//!
//! println!("Rows: {}", profile.rows);
//! println!("Duplicates: {}", profile.duplicates.total);
//! println!("Quality score: {:.1}", profile.quality_score());
//! for column in &profile.columns_info {
//!     println!("{}: {:.1}% null", column.name, column.null_percentage);
//! }
//! ```
//!
//! # Batches
//!
//! ```no_run
//! use std::path::Path;
//! use csv_quality::{IssueThresholds, Profiler, discover_files, write_artifacts};
//!
//! let files = discover_files(Path::new("data/raw"), &[]).unwrap();
//! let mut profiler = Profiler::new();
//! profiler.jobs(4).delimiter(b',');
//!
//! // Failed datasets are collected alongside the profiles
//! let set = profiler.profile_files(&files);
//! write_artifacts(Path::new("reports"), &set, IssueThresholds::default()).unwrap();
//! ```
//!
//! # Quality Score
//!
//! `100 - 0.5 * (sum of column null percentages) - 2 * (duplicate percentage)`,
//! clamped to `[0, 100]`. Scores of 90 and above grade as good, 70 and above
//! as fair, anything lower as poor.

pub mod config;
mod dataset;
mod encoding;
mod error;
mod field_type;
mod options;
pub mod profile;
mod profiler;
pub mod report;
pub mod stage;

pub use config::Config;
pub use dataset::{Column, Dataset};
pub use error::{ProfileError, Result};
pub use field_type::{ColumnKind, Value, parse_number};
pub use options::{DEFAULT_NULL_VALUES, Delimiter, ReadOptions, detect_delimiter};
pub use profile::{
    ColumnProfile, ColumnStats, DatasetProfile, DuplicateStats, Grade, Issue, IssueThresholds,
    NumericStats, TextStats, analyze_column, find_issues, profile_dataset, quality_score,
};
pub use profiler::{DatasetFailure, ProfileSet, Profiler, discover_files};
pub use report::{
    Artifacts, JsonReporter, MarkdownReporter, Reporter, SummaryReporter, write_artifacts,
};
pub use stage::{LoadDate, LoadManifest, Stager};

// Re-export for advanced usage
pub use encoding::{EncodingInfo, decode_to_utf8, is_utf8};
