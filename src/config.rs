//! Optional TOML configuration.
//!
//! ```toml
//! [input]
//! dir = "data/raw"
//! files = ["olist_orders_dataset.csv"]
//! delimiter = "auto"
//! keep_empty = false
//! jobs = 4
//!
//! [report]
//! dir = "reports"
//! null_percentage = 10.0
//! duplicate_percentage = 5.0
//!
//! [stage]
//! root = "staging"
//! prefix = "olist"
//! ```
//!
//! Every key is optional. Command-line flags override what is read here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProfileError, Result};
use crate::options::ReadOptions;
use crate::profile::IssueThresholds;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "csv-quality.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub report: ReportConfig,
    pub stage: StageConfig,
}

/// Where datasets come from and how they are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub dir: PathBuf,
    /// Expected file names. Empty means every `*.csv` in `dir`.
    pub files: Vec<String>,
    /// Datasets profiled concurrently.
    pub jobs: usize,
    #[serde(flatten)]
    pub read: ReadOptions,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/raw"),
            files: Vec::new(),
            jobs: 1,
            read: ReadOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub dir: PathBuf,
    #[serde(flatten)]
    pub thresholds: IssueThresholds,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
            thresholds: IssueThresholds::default(),
        }
    }
}

/// Destination of the staging step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub root: PathBuf,
    pub prefix: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("staging"),
            prefix: "olist".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read if present and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ProfileError::SourceNotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading configuration");
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| match e {
            ProfileError::Config(msg) => ProfileError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        if config.input.jobs == 0 {
            return Err(ProfileError::Config("input.jobs must be at least 1".into()));
        }
        Ok(config)
    }
}
