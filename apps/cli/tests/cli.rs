// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const COMBINED: &str = "\
Category,Document Title,Element Thickness,Element Slope,Mark
Roofs,Block A,0.3,15,
Gutters,Block A,,,
Roofs,Block B,,15,
Doors,,,,D-01
";

#[allow(deprecated)]
fn lod_lite() -> Command {
    let mut cmd = Command::cargo_bin("lod-lite").expect("binary");
    cmd.env_remove("LOD_CATEGORY_COLUMN")
        .env_remove("LOD_JOIN_KEY")
        .env_remove("LOD_LOG_FORMAT")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn classifies_combined_export_and_prints_summary() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("export.csv");
    let output = temp.path().join("lod.csv");
    fs::write(&input, COMBINED).unwrap();

    lod_lite()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Roof"))
        .stdout(predicate::str::contains("Passthrough rows: 2"))
        .stdout(predicate::str::contains("Total rows:       4"));

    let written = fs::read_to_string(&output).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("Category,Document Title,Element Thickness,Element Slope,Mark,LOD,Missing_Properties,LOD_100,LOD_200,LOD_300,Source")
    );
    assert_eq!(lines.next(), Some("Roofs,Block A,0.3,15,,300,,0,0,1,Roof"));
    assert_eq!(
        lines.next(),
        Some("Roofs,Block B,,15,,100,Element Thickness,1,0,0,Roof")
    );
    assert_eq!(lines.next(), Some("Gutters,Block A,,,,,,,,,Gutters"));
    assert_eq!(lines.next(), Some("Doors,,,,D-01,,,,,,Doors"));
    assert_eq!(lines.next(), None);
}

#[test]
fn writes_json_summary() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("export.csv");
    let output = temp.path().join("lod.csv");
    let summary = temp.path().join("summary.json");
    fs::write(&input, COMBINED).unwrap();

    lod_lite()
        .arg(&input)
        .arg(&output)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success();

    let report: Value = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(report["mode"], "combined");
    assert_eq!(report["passthrough_rows"], 2);
    assert_eq!(report["categories"][1]["category"], "Roof");
    assert_eq!(report["categories"][1]["lod_300"], 1);
    assert_eq!(report["categories"][1]["lod_100"], 1);
}

#[test]
fn category_column_flag_overrides_env() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("export.csv");
    let output = temp.path().join("lod.csv");
    fs::write(&input, "Kind,Element Category,Element Family\nCeilings,Ceilings,Compound\n").unwrap();

    lod_lite()
        .env("LOD_CATEGORY_COLUMN", "Category")
        .arg(&input)
        .arg(&output)
        .arg("--category-column")
        .arg("Kind")
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.lines().nth(1).unwrap().ends_with(",200,\"Element Area, Element Length, Element Thickness\",0,1,0,Ceilings"));
}

#[test]
fn category_column_flag_is_normalized() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("export.csv");
    let output = temp.path().join("lod.csv");
    fs::write(&input, COMBINED).unwrap();

    lod_lite()
        .arg(&input)
        .arg(&output)
        .arg("--category-column")
        .arg("Category ")
        .arg("--join-key")
        .arg(" Document Title")
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("Roofs,Block A,0.3,15,,300,,0,0,1,Roof"));
}

#[test]
fn missing_input_exits_with_failure() {
    let temp = tempdir().unwrap();

    let assert = lod_lite()
        .arg(temp.path().join("missing"))
        .arg(temp.path().join("lod.csv"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("input not found"));

    // Reported once, not echoed again by the logger.
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert_eq!(stderr.matches("input not found").count(), 1);
}

#[test]
fn missing_category_column_exits_with_failure() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("export.csv");
    let output = temp.path().join("lod.csv");
    fs::write(&input, "Document Title\nBlock A\n").unwrap();

    lod_lite()
        .arg(&input)
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing category column \"Category\""));

    assert!(!output.exists());
}

#[test]
fn malformed_input_reports_line() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("export.csv");
    fs::write(&input, "Category,Mark\nRoofs,A,extra\n").unwrap();

    lod_lite()
        .arg(&input)
        .arg(temp.path().join("lod.csv"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn usage_error_exits_with_failure() {
    lod_lite().assert().code(1);
}
