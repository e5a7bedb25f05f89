//! Rendering of profile sets.
//!
//! Computation never prints. Every output goes through a [`Reporter`], so the
//! CLI, the artifact writer and tests can each pick their own renderer.

mod format;
mod json;
mod markdown;
mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ProfileError, Result};
use crate::profile::IssueThresholds;
use crate::profiler::ProfileSet;

pub use format::{group_thousands, table_stem, table_title};
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use summary::SummaryReporter;

/// File name of the structured profile document.
pub const PROFILE_DOCUMENT: &str = "data_profile.json";
/// File name of the Markdown quality report.
pub const QUALITY_REPORT: &str = "DATA_QUALITY_REPORT.md";

/// Renders a profile set into text.
pub trait Reporter {
    /// Render the whole set.
    fn render(&self, set: &ProfileSet) -> Result<String>;
}

/// Paths of the artifacts written by [`write_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub profile_document: PathBuf,
    pub quality_report: PathBuf,
}

impl Artifacts {
    /// Both artifact paths, document first.
    pub fn paths(&self) -> [&Path; 2] {
        [&self.profile_document, &self.quality_report]
    }
}

/// Write the JSON profile document and the Markdown report into `dir`, creating it if needed.
///
/// Returns `NothingProfiled` without touching `dir` when the set holds no
/// profile, so artifacts from an earlier run survive a failed one.
pub fn write_artifacts(
    dir: &Path,
    set: &ProfileSet,
    thresholds: IssueThresholds,
) -> Result<Artifacts> {
    if set.is_empty() {
        return Err(ProfileError::NothingProfiled);
    }
    fs::create_dir_all(dir)?;

    let profile_document = dir.join(PROFILE_DOCUMENT);
    fs::write(&profile_document, JsonReporter.render(set)?)?;
    info!(path = %profile_document.display(), "wrote profile document");

    let quality_report = dir.join(QUALITY_REPORT);
    fs::write(&quality_report, MarkdownReporter::new(thresholds).render(set)?)?;
    info!(path = %quality_report.display(), "wrote quality report");

    Ok(Artifacts {
        profile_document,
        quality_report,
    })
}
