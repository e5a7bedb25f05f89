//! Integration tests for csv-quality

use csv_quality::{
    ColumnKind, ColumnStats, Dataset, Grade, IssueThresholds, JsonReporter, LoadDate,
    MarkdownReporter, ProfileError, Profiler, ReadOptions, Reporter, Stager, SummaryReporter,
    Value, discover_files, profile_dataset, write_artifacts,
};
use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn write_csv(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_one_null_in_three_rows() {
    let data = b"a,b\n1,x\n,y\n3,z\n";
    let profile = Profiler::new().profile_bytes(data, "t.csv").unwrap();

    assert_eq!(profile.rows, 3);
    assert_eq!(profile.columns, 2);
    let a = profile.column("a").unwrap();
    assert_eq!(a.null, 1);
    assert_eq!(a.non_null, 2);
    assert_eq!(a.null_percentage, 33.33);
    assert_eq!(profile.column("b").unwrap().null_percentage, 0.0);
    assert_eq!(profile.duplicates.total, 0);
    assert!((profile.quality_score() - 83.335).abs() < 1e-9);
    assert_eq!(Grade::from_score(profile.quality_score()), Grade::Fair);
}

#[test]
fn test_duplicate_rows_reduce_score() {
    let data = b"id,name\n1,a\n2,b\n1,a\n3,c\n";
    let profile = Profiler::new().profile_bytes(data, "t.csv").unwrap();

    assert_eq!(profile.rows, 4);
    assert_eq!(profile.duplicates.total, 1);
    assert_eq!(profile.duplicates.percentage, 25.0);
    assert!((profile.quality_score() - 50.0).abs() < 1e-9);
    assert_eq!(Grade::from_score(profile.quality_score()), Grade::Poor);
}

#[test]
fn test_numeric_column_stats() {
    let profile = Profiler::new()
        .profile_bytes(b"price\n10\n20\n\"\"\n40\n", "t.csv")
        .unwrap();
    let price = profile.column("price").unwrap();

    assert_eq!(price.non_null, 3);
    assert_eq!(price.null, 1);
    match &price.stats {
        ColumnStats::Numeric(stats) => {
            assert!((stats.mean.unwrap() - 23.333_333).abs() < 1e-4);
            assert_eq!(stats.median, Some(20.0));
            assert_eq!(stats.min, Some(10.0));
            assert_eq!(stats.max, Some(40.0));
            assert!(stats.std.is_some());
        }
        other => panic!("expected numeric stats, got {other:?}"),
    }
}

#[test]
fn test_text_column_stats() {
    let dataset = Dataset::from_rows(
        vec!["s"],
        vec![
            vec![Some(Value::from(""))],
            vec![Some(Value::from("ab"))],
            vec![None],
        ],
    )
    .unwrap();
    let profile = profile_dataset(&dataset, "t");
    let s = profile.column("s").unwrap();

    assert_eq!(s.kind(), ColumnKind::Text);
    assert_eq!(s.non_null, 2);
    assert_eq!(s.null, 1);
    match &s.stats {
        ColumnStats::Text(stats) => {
            assert_eq!(stats.empty_strings, 1);
            assert_eq!(stats.min_length, 0);
            assert_eq!(stats.max_length, 2);
        }
        other => panic!("expected text stats, got {other:?}"),
    }
}

#[test]
fn test_header_only_file() {
    let profile = Profiler::new().profile_bytes(b"a,b,c\n", "t.csv").unwrap();

    assert_eq!(profile.rows, 0);
    assert_eq!(profile.columns, 3);
    assert_eq!(profile.duplicates.total, 0);
    assert_eq!(profile.duplicates.percentage, 0.0);
    assert!(profile.columns_info.iter().all(|c| c.null_percentage == 0.0));
    assert_eq!(profile.quality_score(), 100.0);
}

#[test]
fn test_empty_file_error() {
    let result = Profiler::new().profile_bytes(b"", "t.csv");
    assert!(matches!(result, Err(ProfileError::EmptyData)));
}

#[test]
fn test_long_row_error() {
    let result = Profiler::new().profile_bytes(b"a,b\n1,2\n3,4,5\n", "t.csv");
    assert!(matches!(
        result,
        Err(ProfileError::RaggedRow {
            record: 2,
            expected: 2,
            found: 3
        })
    ));
}

#[test]
fn test_truncated_row_counts_as_nulls() {
    let profile = Profiler::new()
        .profile_bytes(b"a,b,c\n1,2,3\n4,5\n", "t.csv")
        .unwrap();

    assert_eq!(profile.rows, 2);
    let c = profile.column("c").unwrap();
    assert_eq!(c.null, 1);
    assert_eq!(c.null_percentage, 50.0);
    assert_eq!(profile.column("b").unwrap().null, 0);
    assert!((profile.quality_score() - 75.0).abs() < 1e-9);
}

#[test]
fn test_delimiter_detection() {
    let profiler = Profiler::new();
    for (data, delimiter) in [
        (&b"a;b;c\n1;2;3\n"[..], ';'),
        (&b"a\tb\tc\n1\t2\t3\n"[..], '\t'),
        (&b"a|b|c\n1|2|3\n"[..], '|'),
    ] {
        let profile = profiler.profile_bytes(data, "t.csv").unwrap();
        assert_eq!(profile.columns, 3, "delimiter {delimiter:?}");
    }
}

#[test]
fn test_windows_line_endings_and_bom() {
    let data = b"\xEF\xBB\xBFid,name\r\n1,a\r\n2,b\r\n";
    let profile = Profiler::new().profile_bytes(data, "t.csv").unwrap();

    assert_eq!(profile.rows, 2);
    assert!(profile.column("id").is_some());
    let name = profile.column("name").unwrap();
    assert!(matches!(name.stats, ColumnStats::Text(ref t) if t.max_length == 1));
}

#[test]
fn test_non_utf8_input_is_transcoded() {
    let data = b"city,note\nS\xe3o Paulo,caf\xe9 cr\xe8me\nBras\xedlia,d\xe9j\xe0 vu\n";
    let profile = Profiler::new().profile_bytes(data, "t.csv").unwrap();
    assert_eq!(profile.rows, 2);
    assert_eq!(profile.column("city").unwrap().kind(), ColumnKind::Text);
}

#[test]
fn test_custom_null_values() {
    let mut profiler = Profiler::new();
    profiler.null_values(["?"]);
    let profile = profiler.profile_bytes(b"a\n?\nNA\n1\n", "t.csv").unwrap();
    let a = profile.column("a").unwrap();

    // NA is no longer a null marker, so the column is text
    assert_eq!(a.null, 1);
    assert_eq!(a.kind(), ColumnKind::Text);
}

#[test]
fn test_default_null_markers() {
    let profile = Profiler::new()
        .profile_bytes(b"a\nNA\nNULL\nnan\n5\n", "t.csv")
        .unwrap();
    let a = profile.column("a").unwrap();
    assert_eq!(a.null, 3);
    assert_eq!(a.kind(), ColumnKind::Numeric);
}

#[test]
fn test_profile_from_reader() {
    let cursor = Cursor::new(b"x,y\n1,2\n".to_vec());
    let profile = Profiler::new().profile_reader(cursor, "reader.csv").unwrap();
    assert_eq!(profile.filename, "reader.csv");
    assert_eq!(profile.rows, 1);
}

#[test]
fn test_profile_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"a,b\n1,2\n3,4\n").unwrap();
    file.flush().unwrap();

    let profile = Profiler::new().profile_path(file.path()).unwrap();
    let expected = file.path().file_name().unwrap().to_string_lossy();
    assert_eq!(profile.filename, expected);
    assert_eq!(profile.rows, 2);
    assert!(profile.size_bytes > 0);
}

#[test]
fn test_missing_file_error() {
    let result = Profiler::new().profile_path("/definitely/not/here.csv");
    assert!(matches!(result, Err(ProfileError::SourceNotFound(_))));
}

#[test]
fn test_discover_files() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "b.csv", "x\n1\n");
    write_csv(dir.path(), "a.csv", "x\n1\n");
    write_csv(dir.path(), "notes.txt", "ignored");

    let files = discover_files(dir.path(), &[]).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.csv", "b.csv"]);

    let expected = discover_files(dir.path(), &["b.csv".into(), "gone.csv".into()]).unwrap();
    assert_eq!(expected, vec![dir.path().join("b.csv"), dir.path().join("gone.csv")]);

    assert!(matches!(
        discover_files(&dir.path().join("missing"), &[]),
        Err(ProfileError::SourceNotFound(_))
    ));
}

#[test]
fn test_failures_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "empty.csv", "");
    write_csv(dir.path(), "good.csv", "a,b\n1,2\n");
    write_csv(dir.path(), "ragged.csv", "a,b\n1,2,3\n");

    let expected: Vec<String> = ["good.csv", "empty.csv", "ragged.csv", "missing.csv"]
        .map(String::from)
        .to_vec();
    let files = discover_files(dir.path(), &expected).unwrap();
    let set = Profiler::new().profile_files(&files);

    assert_eq!(set.profiles.len(), 1);
    assert_eq!(set.profiles[0].filename, "good.csv");
    let failed: Vec<&str> = set.failures.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(failed, vec!["empty.csv", "ragged.csv", "missing.csv"]);
    assert_eq!(set.failures[0].reason, "Empty file or no header row");
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..8 {
        let mut csv = String::from("id,value\n");
        for row in 0..=i {
            csv.push_str(&format!("{row},{}\n", row % 3));
        }
        write_csv(dir.path(), &format!("t{i}.csv"), &csv);
    }
    let files = discover_files(dir.path(), &[]).unwrap();

    let sequential = Profiler::new().profile_files(&files);
    let mut parallel = Profiler::new();
    parallel.jobs(4);
    let parallel = parallel.profile_files(&files);

    assert_eq!(sequential.profiles, parallel.profiles);
    assert!(parallel.failures.is_empty());
}

#[test]
fn test_reporters_render_same_set() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "olist_orders_dataset.csv", "id,status\n1,ok\n2,\n2,\n");
    let files = discover_files(dir.path(), &[]).unwrap();
    let set = Profiler::new().profile_files(&files);

    let summary = SummaryReporter::new(false).render(&set).unwrap();
    assert!(summary.contains("Olist Orders"));

    let json = JsonReporter.render(&set).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["profiles"]["olist_orders_dataset.csv"]["duplicates"]["total"], 1);

    let md = MarkdownReporter::new(IssueThresholds::default())
        .render(&set)
        .unwrap();
    assert!(md.contains("### OLIST_ORDERS"));
    assert!(md.contains("- **status:** 66.7% null values"));
}

#[test]
fn test_profile_then_stage() {
    let raw = tempfile::tempdir().unwrap();
    let reports = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    write_csv(raw.path(), "olist_orders_dataset.csv", "id\n1\n2\n");
    write_csv(raw.path(), "olist_items_dataset.csv", "id,price\n1,9.5\n");

    let files = discover_files(raw.path(), &[]).unwrap();
    let set = Profiler::new().profile_files(&files);
    let artifacts = write_artifacts(reports.path(), &set, IssueThresholds::default()).unwrap();

    let stager = Stager::new(staging.path(), "olist", LoadDate::parse("2024-02-29").unwrap());
    let manifest = stager.stage_files(&files);
    let staged_reports = stager.stage_artifacts(&artifacts.paths()).unwrap();
    manifest.write(&stager.manifest_path()).unwrap();

    assert_eq!(manifest.successful, 2);
    assert_eq!(manifest.failed, 0);
    assert!(
        staging
            .path()
            .join("olist/olist_orders_dataset/year=2024/month=02/day=29/olist_orders_dataset.csv")
            .is_file()
    );
    assert_eq!(staged_reports.len(), 2);
    assert!(
        staging
            .path()
            .join("olist/_reports/year=2024/month=02/day=29/data_profile.json")
            .is_file()
    );

    let manifest_json = fs::read_to_string(staging.path().join("olist/_load_manifest.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&manifest_json).unwrap();
    assert_eq!(doc["load_date"], "2024-02-29");
    assert_eq!(doc["total_files"], 2);
    assert_eq!(doc["files"]["olist_items_dataset"]["status"], "staged");
}

#[test]
fn test_keep_empty_option() {
    let options = ReadOptions {
        keep_empty: true,
        ..ReadOptions::default()
    };
    let profile = Profiler::with_options(options)
        .profile_bytes(b"a,b\n,1\nx,2\n", "t.csv")
        .unwrap();
    let a = profile.column("a").unwrap();
    assert_eq!(a.null, 0);
    assert!(matches!(a.stats, ColumnStats::Text(ref t) if t.empty_strings == 1));
}

#[test]
fn test_failed_batch_keeps_earlier_artifacts() {
    let raw = tempfile::tempdir().unwrap();
    let reports = tempfile::tempdir().unwrap();
    write_csv(raw.path(), "good.csv", "id\n1\n2\n");

    let files = discover_files(raw.path(), &[]).unwrap();
    let set = Profiler::new().profile_files(&files);
    let artifacts = write_artifacts(reports.path(), &set, IssueThresholds::default()).unwrap();
    let report = fs::read_to_string(&artifacts.quality_report).unwrap();
    let document = fs::read_to_string(&artifacts.profile_document).unwrap();

    let missing = discover_files(raw.path(), &["missing.csv".to_string()]).unwrap();
    let failed = Profiler::new().profile_files(&missing);
    assert!(failed.is_empty());
    assert_eq!(failed.failures.len(), 1);

    let result = write_artifacts(reports.path(), &failed, IssueThresholds::default());
    assert!(matches!(result, Err(ProfileError::NothingProfiled)));
    assert_eq!(fs::read_to_string(&artifacts.quality_report).unwrap(), report);
    assert_eq!(fs::read_to_string(&artifacts.profile_document).unwrap(), document);
    assert!(report.contains("### GOOD"));
}

#[test]
fn test_repeated_expected_file_is_profiled_once() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "a.csv", "x\n1\n");

    let expected: Vec<String> = ["a.csv", "a.csv"].map(String::from).to_vec();
    let files = discover_files(dir.path(), &expected).unwrap();
    let set = Profiler::new().profile_files(&files);
    assert_eq!(set.profiles.len(), 1);

    let doc: serde_json::Value =
        serde_json::from_str(&JsonReporter.render(&set).unwrap()).unwrap();
    assert_eq!(doc["summary"]["total_tables"], 1);
    assert_eq!(doc["profiles"].as_object().unwrap().len(), 1);
}
