//! Integration tests for the cptab CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = "\
CLAIM DETAIL
Office visit 99213 03/14/2024 GC
Associated Dx [E11.9]
Venipuncture 36415 03/14/2024
Associated Dx [I10], [E78.5]
";

/// Helper to create a CLI command with an isolated config directory
fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cptab"));
    cmd.env("XDG_CONFIG_HOME", home.path()).env("HOME", home.path());
    cmd
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============ PROCESS COMMAND TESTS ============

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_process_text_table() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "claim.txt", SAMPLE);

    cli(&dir)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("CPT Code"))
        .stdout(predicate::str::contains("E11.9"))
        .stdout(predicate::str::contains("I10, E78.5"));
}

#[test]
fn test_process_stdin_json() {
    let home = TempDir::new().unwrap();

    let output = cli(&home)
        .args(["process", "-", "--format", "json"])
        .write_stdin("Office visit 99213 03/14/2024 GC\nAssociated Dx [E11.9]")
        .output()
        .unwrap();

    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["Date"], "03/14/2024");
    assert_eq!(rows[0]["CPT Code"], "99213");
    assert_eq!(rows[0]["Modifiers"], "GC");
    assert_eq!(rows[0]["ICD10 Code"], "E11.9");
    assert_eq!(rows[0]["Description"], "Office visit");
}

#[test]
fn test_process_csv_header() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "claim.txt", SAMPLE);

    cli(&dir)
        .arg("process")
        .arg(&input)
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Date,CPT Code,Modifiers,ICD10 Code,Description\n",
        ))
        .stdout(predicate::str::contains(
            "03/14/2024,36415,,\"I10, E78.5\",Venipuncture",
        ));
}

#[test]
fn test_process_empty_input() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .args(["process", "-"])
        .write_stdin("   \n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please paste text first"));
}

#[test]
fn test_process_no_records() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .args(["process", "-"])
        .write_stdin("Patient notes: follow up next week")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid CPT/date rows detected"));
}

#[test]
fn test_process_missing_file() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .args(["process", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_pdf_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "claim.txt", SAMPLE);
    let output_path = dir.path().join("table.pdf");

    cli(&dir)
        .arg("process")
        .arg(&input)
        .args(["--format", "pdf", "--title", "CPT Table"])
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 records written"));

    let bytes = fs::read(&output_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_process_pdf_default_file_name() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "claim.txt", SAMPLE);

    cli(&dir)
        .current_dir(dir.path())
        .arg("process")
        .arg(&input)
        .args(["--format", "pdf"])
        .assert()
        .success();

    assert!(dir.path().join("CPT_Table_Output.pdf").exists());
}

#[test]
fn test_process_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = write_input(
        &dir,
        "config.json",
        r#"{"extraction": {"association_marker": "Linked ICD"}, "output": {"default_format": "csv"}}"#,
    );
    let input = write_input(&dir, "claim.txt", "Visit 99213 03/14/2024\nLinked ICD [R05.9]\n");

    cli(&dir)
        .arg("-c")
        .arg(&config_path)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("03/14/2024,99213,,R05.9,Visit"));
}

#[test]
fn test_process_show_stats() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "claim.txt",
        "Associated Dx [Z00.00]\nVisit 99213 03/14/2024\n",
    );

    cli(&dir)
        .arg("process")
        .arg(&input)
        .arg("--show-stats")
        .assert()
        .success()
        .stderr(predicate::str::contains("procedure lines:   1"))
        .stderr(predicate::str::contains("before any procedure line"));
}

// ============ BATCH COMMAND TESTS ============

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, "a.txt", SAMPLE);
    write_input(&dir, "b.txt", "Lipid panel 80061 1/8/2024 90\nAssociated Dx [E78.5]\n");
    write_input(&dir, "ignored.md", SAMPLE);
    let out_dir = dir.path().join("out");
    let pattern = format!("{}/*", dir.path().display());

    cli(&dir)
        .arg("batch")
        .arg(&pattern)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--format", "csv", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("3 records"));

    assert!(out_dir.join("a.csv").exists());
    assert!(out_dir.join("b.csv").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,records"));
    assert!(summary.contains("a.txt,success,2,2"));
    assert!(summary.contains("b.txt,success,1,1"));
}

#[test]
fn test_batch_stops_on_error() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, "empty.txt", "");
    let pattern = format!("{}/*.txt", dir.path().display());

    cli(&dir)
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_batch_continue_on_error() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, "empty.txt", "");
    write_input(&dir, "good.txt", SAMPLE);
    let out_dir = dir.path().join("out");
    let pattern = format!("{}/*.txt", dir.path().display());

    cli(&dir)
        .arg("batch")
        .arg(&pattern)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--continue-on-error", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("empty.txt,error"));
}

#[test]
fn test_batch_render_failure_recorded_per_file() {
    let dir = TempDir::new().unwrap();
    let config_path = write_input(
        &dir,
        "config.json",
        r#"{"extraction": {"require_records": false}}"#,
    );
    let in_dir = dir.path().join("in");
    fs::create_dir(&in_dir).unwrap();
    fs::write(in_dir.join("notes.txt"), "Patient notes: follow up next week").unwrap();
    fs::write(in_dir.join("claim.txt"), SAMPLE).unwrap();
    let out_dir = dir.path().join("out");
    let pattern = format!("{}/*.txt", in_dir.display());

    cli(&dir)
        .arg("-c")
        .arg(&config_path)
        .arg("batch")
        .arg(&pattern)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--format", "pdf", "--continue-on-error", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(out_dir.join("claim.pdf").exists());
    assert!(!out_dir.join("notes.pdf").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("notes.txt,error"));
    assert!(summary.contains("table has no rows"));
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    cli(&dir)
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

// ============ CONFIG COMMAND TESTS ============

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("cptab.json");

    cli(&dir)
        .arg("-c")
        .arg(&config_path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config_path.exists());

    cli(&dir)
        .arg("-c")
        .arg(&config_path)
        .args(["config", "set", "export.page_size", "a4"])
        .assert()
        .success();

    cli(&dir)
        .arg("-c")
        .arg(&config_path)
        .args(["config", "get", "export.page_size"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a4\""));
}

#[test]
fn test_config_set_rejects_bad_value() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("cptab.json");

    cli(&dir)
        .arg("-c")
        .arg(&config_path)
        .args(["config", "set", "export.font_size", "large"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));

    assert!(!config_path.exists());
}

#[test]
fn test_config_unknown_key() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .args(["config", "get", "extraction.missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_path() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file:"))
        .stdout(predicate::str::contains("not created"));
}
