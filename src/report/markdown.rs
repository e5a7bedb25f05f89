//! Markdown data-quality report.

use std::fmt::Write as _;

use super::Reporter;
use super::format::{escape_cell, group_thousands, table_stem};
use crate::error::Result;
use crate::profile::{DatasetProfile, IssueThresholds, find_issues};
use crate::profiler::ProfileSet;

const RECOMMENDATIONS: &[(&str, &str)] = &[
    ("Data Cleaning", "Handle null values based on business logic"),
    ("Deduplication", "Investigate and remove duplicate records"),
    ("Validation", "Implement data quality tests in the warehouse models"),
    ("Monitoring", "Set up continuous quality monitoring in the pipeline"),
];

/// Document-style report with one section per dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReporter {
    thresholds: IssueThresholds,
}

impl MarkdownReporter {
    /// Create a reporter that flags issues using `thresholds`.
    pub const fn new(thresholds: IssueThresholds) -> Self {
        Self { thresholds }
    }

    fn write_dataset(&self, out: &mut String, profile: &DatasetProfile) {
        let score = profile.quality_score();

        let _ = writeln!(out, "### {}\n", table_stem(&profile.filename).to_uppercase());
        let _ = writeln!(out, "- **File:** {}", profile.filename);
        let _ = writeln!(out, "- **Quality Score:** {score:.1}/100");
        let _ = writeln!(out, "- **Rows:** {}", group_thousands(profile.rows));
        let _ = writeln!(out, "- **Columns:** {}", profile.columns);
        let _ = writeln!(out, "- **Size:** {:.2} MB", profile.size_mb);
        let _ = writeln!(
            out,
            "- **Duplicates:** {} ({:.2}%)\n",
            group_thousands(profile.duplicates.total),
            profile.duplicates.percentage
        );

        let _ = writeln!(out, "#### Column Details\n");
        let _ = writeln!(out, "| Column | Type | Non-Null % | Unique |");
        let _ = writeln!(out, "|--------|------|------------|--------|");
        for column in &profile.columns_info {
            let _ = writeln!(
                out,
                "| {} | {} | {:.1}% | {} |",
                escape_cell(&column.name),
                column.kind(),
                column.non_null_percentage(),
                group_thousands(column.unique)
            );
        }

        let _ = writeln!(out, "\n#### Quality Issues\n");
        let issues = find_issues(profile, &self.thresholds);
        if issues.is_empty() {
            let _ = writeln!(out, "- No significant quality issues detected");
        }
        for issue in issues {
            let _ = writeln!(out, "- {issue}");
        }
        let _ = writeln!(out);
    }
}

impl Reporter for MarkdownReporter {
    fn render(&self, set: &ProfileSet) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "# Data Quality Assessment Report\n");
        let _ = writeln!(out, "**Generated:** {}\n", set.generated_at.to_rfc3339());

        let _ = writeln!(out, "## Executive Summary\n");
        let _ = writeln!(
            out,
            "**Average Data Quality Score:** {:.1}/100\n",
            set.avg_quality_score()
        );
        if !set.failures.is_empty() {
            let _ = writeln!(out, "**Datasets not profiled:**\n");
            for failure in &set.failures {
                let _ = writeln!(out, "- {}: {}", failure.filename, failure.reason);
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "## Detailed Table Analysis\n");
        for profile in set.sorted_by_filename() {
            self.write_dataset(&mut out, profile);
        }

        let _ = writeln!(out, "## Recommendations\n");
        for (i, (title, text)) in RECOMMENDATIONS.iter().enumerate() {
            let _ = writeln!(out, "{}. **{title}:** {text}", i + 1);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Profiler;

    fn render(csvs: &[(&str, &str)]) -> String {
        let profiler = Profiler::new();
        let mut set = ProfileSet::new();
        for (name, data) in csvs {
            set.profiles.push(profiler.profile_bytes(data.as_bytes(), name).unwrap());
        }
        MarkdownReporter::default().render(&set).unwrap()
    }

    #[test]
    fn test_report_sections() {
        let md = render(&[(
            "olist_orders_dataset.csv",
            "order_id,status,delivered\n1,ok,\n2,ok,\n3,late,2018-01-01\n3,late,2018-01-01\n",
        )]);

        assert!(md.starts_with("# Data Quality Assessment Report\n"));
        assert!(md.contains("## Executive Summary"));
        assert!(md.contains("### OLIST_ORDERS\n"));
        assert!(md.contains("- **File:** olist_orders_dataset.csv"));
        assert!(md.contains("- **Rows:** 4"));
        assert!(md.contains("- **Duplicates:** 1 (25.00%)"));
        assert!(md.contains("| order_id | numeric | 100.0% | 3 |"));
        assert!(md.contains("| status | text | 100.0% | 2 |"));
        assert!(md.contains("| delivered | text | 50.0% | 1 |"));
        assert!(md.contains("- **delivered:** 50.0% null values"));
        assert!(md.contains("- **Duplicates:** 25.00% of rows"));
        assert!(md.contains("## Recommendations"));
    }

    #[test]
    fn test_clean_dataset_has_no_issues() {
        let md = render(&[("clean.csv", "a\n1\n2\n")]);
        assert!(md.contains("### CLEAN\n"));
        assert!(md.contains("- No significant quality issues detected"));
        assert!(md.contains("**Average Data Quality Score:** 100.0/100"));
    }

    #[test]
    fn test_sections_sorted_by_filename() {
        let md = render(&[("b.csv", "x\n1\n"), ("a.csv", "x\n1\n")]);
        let a = md.find("### A\n").unwrap();
        let b = md.find("### B\n").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_pipe_in_column_name_is_escaped() {
        let md = render(&[("t.csv", "\"a|b\",c\n1,2\n")]);
        assert!(md.contains("| a\\|b | numeric | 100.0% | 1 |"));
        assert!(md.contains("| c | numeric | 100.0% | 1 |"));
    }

    #[test]
    fn test_score_is_shown_to_one_decimal() {
        let md = render(&[("t.csv", "a,b\n1,x\n,y\n3,z\n")]);
        assert!(md.contains("- **Quality Score:** 83.3/100"));
    }

    #[test]
    fn test_zero_row_dataset_renders() {
        let md = render(&[("empty.csv", "a,b\n")]);
        assert!(md.contains("| a | numeric | 0.0% | 0 |"));
        assert!(md.contains("- **Quality Score:** 100.0/100"));
    }
}
