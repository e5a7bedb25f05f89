//! Quality score: a 0-100 heuristic penalising null density and duplicate rows.

use std::fmt;

use super::dataset::DatasetProfile;

/// Points deducted per percent of nulls in a column.
pub const NULL_PENALTY: f64 = 0.5;
/// Points deducted per percent of duplicate rows.
pub const DUPLICATE_PENALTY: f64 = 2.0;

/// Compute the quality score of a profile.
///
/// Starts from 100, deducts [`NULL_PENALTY`] per null percent of every column
/// and [`DUPLICATE_PENALTY`] per duplicate-row percent, then clamps to `[0, 100]`.
/// The result is never rounded; reporters format it to one decimal.
pub fn quality_score(profile: &DatasetProfile) -> f64 {
    let mut score = 100.0;
    for column in &profile.columns_info {
        score -= column.null_percentage * NULL_PENALTY;
    }
    score -= profile.duplicates.percentage * DUPLICATE_PENALTY;
    score.clamp(0.0, 100.0)
}

/// Coarse band of a quality score, used for console colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    /// 90 and above.
    Good,
    /// 70 up to 90.
    Fair,
    /// Below 70.
    Poor,
}

impl Grade {
    /// Band for a numeric score.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Grade::Good,
            s if s >= 70.0 => Grade::Fair,
            _ => Grade::Poor,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Good => write!(f, "good"),
            Grade::Fair => write!(f, "fair"),
            Grade::Poor => write!(f, "poor"),
        }
    }
}
