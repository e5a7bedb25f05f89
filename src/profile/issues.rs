//! Heuristic quality issues flagged in reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::dataset::DatasetProfile;

/// Thresholds above which a profile is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueThresholds {
    /// Column null percentage that counts as an issue (exclusive).
    pub null_percentage: f64,
    /// Duplicate-row percentage that counts as an issue (exclusive).
    pub duplicate_percentage: f64,
}

impl Default for IssueThresholds {
    fn default() -> Self {
        Self {
            null_percentage: 10.0,
            duplicate_percentage: 5.0,
        }
    }
}

/// A single flagged problem.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// A column with too many nulls.
    NullHeavyColumn { column: String, null_percentage: f64 },
    /// Too many duplicate rows.
    Duplicates { percentage: f64 },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::NullHeavyColumn {
                column,
                null_percentage,
            } => write!(f, "**{column}:** {null_percentage:.1}% null values"),
            Issue::Duplicates { percentage } => {
                write!(f, "**Duplicates:** {percentage:.2}% of rows")
            }
        }
    }
}

/// Collect the issues of a profile: null-heavy columns in header order, then duplicates.
pub fn find_issues(profile: &DatasetProfile, thresholds: &IssueThresholds) -> Vec<Issue> {
    let mut issues: Vec<Issue> = profile
        .columns_info
        .iter()
        .filter(|c| c.null_percentage > thresholds.null_percentage)
        .map(|c| Issue::NullHeavyColumn {
            column: c.name.clone(),
            null_percentage: c.null_percentage,
        })
        .collect();

    if profile.duplicates.percentage > thresholds.duplicate_percentage {
        issues.push(Issue::Duplicates {
            percentage: profile.duplicates.percentage,
        });
    }
    issues
}
