//! Profiler builder and batch profiling.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use foldhash::{HashSet, HashSetExt};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::error::{ProfileError, Result};
use crate::options::{Delimiter, ReadOptions};
use crate::profile::{DatasetProfile, profile_dataset};

/// A dataset that could not be profiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFailure {
    /// Source identifier (file name).
    pub filename: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of profiling a batch of datasets.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    /// When the batch was profiled.
    pub generated_at: DateTime<Local>,
    /// Successful profiles, in input order.
    pub profiles: Vec<DatasetProfile>,
    /// Datasets that could not be profiled, in input order.
    pub failures: Vec<DatasetFailure>,
}

impl ProfileSet {
    /// Create an empty set stamped with the current time.
    pub fn new() -> Self {
        Self {
            generated_at: Local::now(),
            profiles: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns true if no dataset was profiled successfully.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Mean quality score over the successful profiles, `0` if there are none.
    pub fn avg_quality_score(&self) -> f64 {
        if self.profiles.is_empty() {
            return 0.0;
        }
        self.profiles
            .iter()
            .map(DatasetProfile::quality_score)
            .sum::<f64>()
            / self.profiles.len() as f64
    }

    /// Profiles sorted by file name.
    pub fn sorted_by_filename(&self) -> Vec<&DatasetProfile> {
        let mut sorted: Vec<_> = self.profiles.iter().collect();
        sorted.sort_by(|a, b| a.filename.cmp(&b.filename));
        sorted
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads and profiles CSV datasets.
///
/// # Example
///
/// ```no_run
/// use csv_quality::Profiler;
///
/// let mut profiler = Profiler::new();
/// profiler.delimiter(b',').jobs(4);
///
/// let profile = profiler.profile_path("data/raw/olist_orders_dataset.csv").unwrap();
/// println!("{}: {:.1}", profile.filename, profile.quality_score());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    /// How CSV sources are read.
    options: ReadOptions,
    /// Worker threads for batch profiling; 0 or 1 profiles sequentially.
    jobs: usize,
}

impl Profiler {
    /// Create a profiler with default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profiler with the given read options.
    pub fn with_options(options: ReadOptions) -> Self {
        Self { options, jobs: 0 }
    }

    /// Force a specific delimiter (skip detection).
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.options.delimiter = Delimiter::Fixed(delimiter);
        self
    }

    /// Replace the null markers.
    pub fn null_values<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.null_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Keep empty fields as empty strings instead of nulls.
    pub fn keep_empty(&mut self, keep: bool) -> &mut Self {
        self.options.keep_empty = keep;
        self
    }

    /// Number of datasets to profile concurrently.
    pub fn jobs(&mut self, jobs: usize) -> &mut Self {
        self.jobs = jobs;
        self
    }

    /// Current read options.
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Profile a CSV file. The profile is identified by the file name.
    pub fn profile_path<P: AsRef<Path>>(&self, path: P) -> Result<DatasetProfile> {
        let path = path.as_ref();
        let dataset = Dataset::from_path(path, &self.options)?;
        Ok(profile_dataset(&dataset, &source_name(path)))
    }

    /// Profile CSV data from a reader.
    pub fn profile_reader<R: Read>(&self, reader: R, source: &str) -> Result<DatasetProfile> {
        let dataset = Dataset::from_reader(reader, &self.options)?;
        Ok(profile_dataset(&dataset, source))
    }

    /// Profile CSV data from bytes.
    pub fn profile_bytes(&self, data: &[u8], source: &str) -> Result<DatasetProfile> {
        let dataset = Dataset::from_csv_bytes(data, &self.options)?;
        Ok(profile_dataset(&dataset, source))
    }

    /// Profile every file, recording failures instead of stopping.
    pub fn profile_files(&self, paths: &[PathBuf]) -> ProfileSet {
        let outcomes = if self.jobs > 1 {
            self.profile_parallel(paths)
        } else {
            paths.iter().map(|p| self.profile_logged(p)).collect()
        };

        let mut set = ProfileSet::new();
        for outcome in outcomes {
            match outcome {
                Ok(profile) => set.profiles.push(profile),
                Err(failure) => set.failures.push(failure),
            }
        }
        set
    }

    fn profile_parallel(
        &self,
        paths: &[PathBuf],
    ) -> Vec<std::result::Result<DatasetProfile, DatasetFailure>> {
        match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
            Ok(pool) => pool.install(|| paths.par_iter().map(|p| self.profile_logged(p)).collect()),
            Err(e) => {
                warn!(error = %e, "could not start worker pool, profiling sequentially");
                paths.iter().map(|p| self.profile_logged(p)).collect()
            }
        }
    }

    fn profile_logged(&self, path: &Path) -> std::result::Result<DatasetProfile, DatasetFailure> {
        match self.profile_path(path) {
            Ok(profile) => {
                info!(
                    file = %profile.filename,
                    rows = profile.rows,
                    score = profile.quality_score(),
                    "profiled dataset"
                );
                Ok(profile)
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "could not profile dataset");
                Err(DatasetFailure {
                    filename: source_name(path),
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// File name of a path, or the whole path if it has none.
pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Resolve the dataset files to profile.
///
/// With an expected list, every listed name is joined onto `dir` whether it
/// exists or not, so missing files surface as failures. Repeated names are
/// kept once, at their first position. Otherwise every
/// `*.csv` file in `dir` is returned, sorted by name.
pub fn discover_files(dir: &Path, expected: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ProfileError::SourceNotFound(dir.to_path_buf()));
    }
    if !expected.is_empty() {
        let mut seen = HashSet::with_capacity(expected.len());
        return Ok(expected
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .map(|name| dir.join(name))
            .collect());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
