//! Integration tests for `stimband band-report`

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Returns the path to the test fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn stimband() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("stimband"))
}

#[test]
fn writes_per_stimulus_report() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let out = temp_dir.path().join("poss_groups.txt");

    stimband()
        .arg("band-report")
        .arg("--stats")
        .arg(fixtures_dir().join("possibility.json"))
        .arg("--min-label")
        .arg("Not possible at all")
        .arg("--max-label")
        .arg("Extremely possible")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).expect("failed to read report");
    assert!(
        text.starts_with("Stimuli, Not possible at all (1) => Extremely possible (5)\n"),
        "unexpected header: {text}"
    );

    // Ascending by mean, lowest stimuli first.
    let jumping = text.find("PoseC_Viewpoint_1_scale_jumping").unwrap();
    let waving = text.find("PoseB_Viewpoint_1_scale_waving").unwrap();
    assert!(jumping < waving, "2.00 entry must precede 4.00 entry");

    assert!(text.contains("Number of stimuli in groups:\n"));
    assert!(text.contains("1.00-2.33: 2\n"));
    assert!(text.contains("2.34-3.00: 1\n"));
    assert!(text.contains("3.67-5.00: 3\n"));
    // No stimulus fell in the third band, so its count line is absent.
    assert!(!text.contains("3.01-3.66"));
}

#[test]
fn prints_to_stdout_without_out_flag() {
    stimband()
        .arg("band-report")
        .arg("--stats")
        .arg(fixtures_dir().join("possibility.json"))
        .arg("--min-label")
        .arg("Not possible at all")
        .arg("--max-label")
        .arg("Extremely possible")
        .assert()
        .success()
        .stdout(predicate::str::contains("Number of stimuli in groups:"));
}

#[test]
fn viewpoint_average_annotates_with_scale_names() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let out = temp_dir.path().join("avg_groups.txt");

    stimband()
        .arg("band-report")
        .arg("--stats")
        .arg(fixtures_dir().join("possibility.json"))
        .arg("--min-label")
        .arg("Not possible at all")
        .arg("--max-label")
        .arg("Extremely possible")
        .arg("--viewpoint-avg")
        .arg("--scales")
        .arg(fixtures_dir().join("associations.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).expect("failed to read report");
    // Both PoseA viewpoints collapse into one annotated entry.
    assert!(text.contains("PoseA (sitting),"), "missing annotation: {text}");
    assert!(!text.contains("PoseA_Viewpoint_2"));
    assert!(text.contains("PoseE (standing),"));
}

#[test]
fn scales_flag_requires_viewpoint_avg() {
    stimband()
        .arg("band-report")
        .arg("--stats")
        .arg(fixtures_dir().join("possibility.json"))
        .arg("--min-label")
        .arg("a")
        .arg("--max-label")
        .arg("b")
        .arg("--scales")
        .arg(fixtures_dir().join("associations.json"))
        .assert()
        .failure();
}

#[test]
fn json_envelope_has_versioned_schema() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let json_path = temp_dir.path().join("report.json");

    stimband()
        .arg("band-report")
        .arg("--stats")
        .arg(fixtures_dir().join("possibility.json"))
        .arg("--min-label")
        .arg("Not possible at all")
        .arg("--max-label")
        .arg("Extremely possible")
        .arg("--json")
        .arg(&json_path)
        .assert()
        .success();

    let content = fs::read_to_string(&json_path).expect("failed to read json");
    let envelope: serde_json::Value =
        serde_json::from_str(&content).expect("output should be valid JSON");
    assert_eq!(
        envelope["schema"].as_str(),
        Some("stimband.band_report.v1"),
        "schema should be 'stimband.band_report.v1'"
    );
    assert_eq!(envelope["entries"].as_array().map(Vec::len), Some(6));
}

#[test]
fn malformed_stats_file_fails_with_context() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let bad = temp_dir.path().join("bad.json");
    fs::write(&bad, "{not json").expect("failed to write fixture");

    stimband()
        .arg("band-report")
        .arg("--stats")
        .arg(&bad)
        .arg("--min-label")
        .arg("a")
        .arg("--max-label")
        .arg("b")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse stat dictionary"));
}

#[test]
fn missing_stats_file_fails_with_path_in_error() {
    stimband()
        .arg("band-report")
        .arg("--stats")
        .arg("no_such_file.json")
        .arg("--min-label")
        .arg("a")
        .arg("--max-label")
        .arg("b")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_file.json"));
}
