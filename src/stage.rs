//! Hive-partitioned staging of raw files and report artifacts.
//!
//! Layout: `root/prefix/<table>/year=YYYY/month=MM/day=DD/<file>`. Report
//! artifacts go under the `_reports` table. An object-storage sync of `root`
//! yields partition-prunable paths.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ProfileError, Result};
use crate::profiler::source_name;

/// Table name used for report artifacts.
pub const REPORTS_TABLE: &str = "_reports";
/// File name of the load manifest.
pub const LOAD_MANIFEST: &str = "_load_manifest.json";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Partition date of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadDate(NaiveDate);

impl LoadDate {
    /// Parse a `YYYY-MM-DD` date.
    pub fn parse(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(LoadDate)
            .map_err(|_| ProfileError::InvalidDate(s.to_string()))
    }

    /// Today's date in local time.
    pub fn today() -> Self {
        LoadDate(Local::now().date_naive())
    }

    /// Hive partition segment, `year=YYYY/month=MM/day=DD`.
    pub fn partition(&self) -> String {
        format!(
            "year={:04}/month={:02}/day={:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl fmt::Display for LoadDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Outcome of staging one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Staged,
    Failed,
}

/// Manifest entry for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagedFile {
    pub status: StageStatus,
    pub local_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staged_path: Option<PathBuf>,
    pub size_mb: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Record of a staging run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadManifest {
    pub load_date: String,
    pub load_timestamp: String,
    pub root: PathBuf,
    pub prefix: String,
    /// Entries keyed by table name.
    pub files: BTreeMap<String, StagedFile>,
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
}

impl LoadManifest {
    /// Write the manifest as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Copies files into a Hive-partitioned tree.
#[derive(Debug, Clone)]
pub struct Stager {
    root: PathBuf,
    prefix: String,
    date: LoadDate,
}

impl Stager {
    /// Create a stager writing under `root/prefix` for the given load date.
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>, date: LoadDate) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            date,
        }
    }

    /// Directory holding all tables (`root/prefix`, or `root` with an empty prefix).
    pub fn base_dir(&self) -> PathBuf {
        if self.prefix.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&self.prefix)
        }
    }

    /// Destination of `file_name` within the partition of `table`.
    pub fn staged_path(&self, table: &str, file_name: &str) -> PathBuf {
        self.base_dir()
            .join(table)
            .join(self.date.partition())
            .join(file_name)
    }

    /// Default location of the load manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.base_dir().join(LOAD_MANIFEST)
    }

    /// Stage every file under its own table (the file stem), recording failures.
    pub fn stage_files(&self, files: &[PathBuf]) -> LoadManifest {
        let mut entries = BTreeMap::new();
        for path in files {
            let table = path
                .file_stem()
                .map_or_else(|| source_name(path), |s| s.to_string_lossy().into_owned());
            entries.insert(table.clone(), self.stage_one(&table, path));
        }
        self.manifest(entries)
    }

    /// Stage report artifacts under the reports table.
    pub fn stage_artifacts(&self, artifacts: &[&Path]) -> Result<Vec<PathBuf>> {
        artifacts
            .iter()
            .map(|path| {
                let dest = self.staged_path(REPORTS_TABLE, &source_name(path));
                copy_into(path, &dest)?;
                Ok(dest)
            })
            .collect()
    }

    fn stage_one(&self, table: &str, path: &Path) -> StagedFile {
        let dest = self.staged_path(table, &source_name(path));
        let size_mb = fs::metadata(path).map_or(0.0, |m| m.len() as f64 / BYTES_PER_MB);

        match copy_into(path, &dest) {
            Ok(()) => {
                info!(from = %path.display(), to = %dest.display(), size_mb, "staged file");
                StagedFile {
                    status: StageStatus::Staged,
                    local_path: path.to_path_buf(),
                    staged_path: Some(dest),
                    size_mb,
                    error: None,
                }
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "could not stage file");
                StagedFile {
                    status: StageStatus::Failed,
                    local_path: path.to_path_buf(),
                    staged_path: None,
                    size_mb,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn manifest(&self, files: BTreeMap<String, StagedFile>) -> LoadManifest {
        let successful = files
            .values()
            .filter(|f| f.status == StageStatus::Staged)
            .count();
        LoadManifest {
            load_date: self.date.to_string(),
            load_timestamp: Local::now().to_rfc3339(),
            root: self.root.clone(),
            prefix: self.prefix.clone(),
            total_files: files.len(),
            successful,
            failed: files.len() - successful,
            files,
        }
    }
}

fn copy_into(src: &Path, dest: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(ProfileError::SourceNotFound(src.to_path_buf()));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    Ok(())
}
