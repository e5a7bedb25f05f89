//! Structured profile document.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::Reporter;
use crate::error::Result;
use crate::profile::DatasetProfile;
use crate::profiler::{DatasetFailure, ProfileSet};

/// Renders `{generated_at, profiles, summary, failures}` as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

#[derive(Serialize)]
struct ProfileDocument<'a> {
    generated_at: String,
    profiles: ByFilename<'a>,
    summary: Summary,
    #[serde(skip_serializing_if = "Failures::is_empty")]
    failures: Failures<'a>,
}

#[derive(Serialize)]
struct Summary {
    total_tables: usize,
    avg_quality_score: f64,
}

/// Profiles keyed by file name, in input order.
struct ByFilename<'a>(&'a [DatasetProfile]);

impl Serialize for ByFilename<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for profile in self.0 {
            map.serialize_entry(&profile.filename, profile)?;
        }
        map.end()
    }
}

struct Failures<'a>(&'a [DatasetFailure]);

impl Failures<'_> {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Failures<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for failure in self.0 {
            map.serialize_entry(&failure.filename, &failure.reason)?;
        }
        map.end()
    }
}

impl Reporter for JsonReporter {
    fn render(&self, set: &ProfileSet) -> Result<String> {
        let document = ProfileDocument {
            generated_at: set.generated_at.to_rfc3339(),
            profiles: ByFilename(&set.profiles),
            summary: Summary {
                total_tables: set.profiles.len(),
                avg_quality_score: set.avg_quality_score(),
            },
            failures: Failures(&set.failures),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Profiler;

    #[test]
    fn test_document_shape() {
        let profiler = Profiler::new();
        let mut set = ProfileSet::new();
        set.profiles.push(
            profiler
                .profile_bytes(b"price,name\n10,a\n20,\n,c\n40,d\n", "items.csv")
                .unwrap(),
        );
        set.profiles.push(profiler.profile_bytes(b"x\n1\n1\n", "dups.csv").unwrap());

        let json = JsonReporter.render(&set).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(doc["generated_at"].is_string());
        assert_eq!(doc["summary"]["total_tables"], 2);
        assert!(doc.get("failures").is_none());

        let items = &doc["profiles"]["items.csv"];
        assert_eq!(items["rows"], 4);
        assert_eq!(items["columns"], 2);
        assert_eq!(items["duplicates"]["total"], 0);
        let price = &items["columns_info"]["price"];
        assert_eq!(price["dtype"], "numeric");
        assert_eq!(price["null"], 1);
        assert_eq!(price["null_percentage"], 25.0);
        assert_eq!(price["min"], 10.0);
        assert_eq!(price["max"], 40.0);
        let name = &items["columns_info"]["name"];
        assert_eq!(name["dtype"], "text");
        assert_eq!(name["max_length"], 1);

        let dups = &doc["profiles"]["dups.csv"];
        assert_eq!(dups["duplicates"]["percentage"], 50.0);

        // items: 100 - 2 * 25 * 0.5 = 75, dups: 100 - 50 * 2 = 0
        let avg = doc["summary"]["avg_quality_score"].as_f64().unwrap();
        assert!((avg - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_failures_are_listed() {
        let mut set = ProfileSet::new();
        set.failures.push(DatasetFailure {
            filename: "broken.csv".to_string(),
            reason: "Empty file or no header row".to_string(),
        });
        let json = JsonReporter.render(&set).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["failures"]["broken.csv"], "Empty file or no header row");
        assert_eq!(doc["summary"]["total_tables"], 0);
        assert_eq!(doc["summary"]["avg_quality_score"], 0.0);
    }

    #[test]
    fn test_undefined_stats_are_null() {
        let profiler = Profiler::new();
        let mut set = ProfileSet::new();
        set.profiles.push(profiler.profile_bytes(b"a,b\n,1\n", "t.csv").unwrap());
        let json = JsonReporter.render(&set).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        let a = &doc["profiles"]["t.csv"]["columns_info"]["a"];
        assert!(a["mean"].is_null());
        assert!(a["std"].is_null());
    }
}
