//! Integration tests for the sheetrow command line

use std::path::Path;
use std::process::Command;
use tempfile::{TempDir, tempdir};

fn run_command(dir: &Path, args: &[&str]) -> (String, String, i32) {
    // Tests must be deterministic and not depend on a user's ~/.config/sheetrow/config.toml.
    let config = dir.join("test-config.toml");
    if !config.exists() {
        std::fs::write(&config, "").expect("Failed to write config");
    }

    let output = Command::new(env!("CARGO_BIN_EXE_sheetrow"))
        .arg("--config")
        .arg(&config)
        .arg("--workbook")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn workbook() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("People.csv"),
        "Name,Age,Weight\nAndreas,34,80\nBen,9,30\n",
    )
    .expect("Failed to write sheet");
    std::fs::write(dir.path().join("Rates.csv"), "Date,BTCUSD\n").expect("Failed to write sheet");
    dir
}

fn people(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("People.csv")).expect("Failed to read sheet")
}

#[test]
fn test_list_sheets() {
    let dir = workbook();
    let (stdout, _, code) = run_command(dir.path(), &["sheets"]);
    assert_eq!(stdout, "People\nRates\n");
    assert_eq!(code, 0);
}

#[test]
fn test_header() {
    let dir = workbook();
    let (stdout, _, code) = run_command(dir.path(), &["-s", "People", "header"]);
    assert_eq!(stdout, "A\tName\nB\tAge\nC\tWeight\n");
    assert_eq!(code, 0);
}

#[test]
fn test_fetch_markdown() {
    let dir = workbook();
    let (stdout, _, code) = run_command(dir.path(), &["-s", "People", "fetch"]);
    assert_eq!(
        stdout,
        "| Name | Age | Weight |\n|---|---|---|\n| Andreas | 34 | 80 |\n| Ben | 9 | 30 |\n"
    );
    assert_eq!(code, 0);
}

#[test]
fn test_fetch_csv_with_criteria() {
    let dir = workbook();
    let (stdout, _, code) = run_command(
        dir.path(),
        &["-s", "People", "fetch", "--format", "csv", "--where", "Name=Ben"],
    );
    assert_eq!(stdout, "Name,Age,Weight\nBen,9,30\n");
    assert_eq!(code, 0);
}

#[test]
fn test_fetch_to_file() {
    let dir = workbook();
    let out = dir.path().join("people.md");
    let out_arg = out.to_string_lossy().to_string();
    let (stdout, _, code) = run_command(dir.path(), &["-s", "People", "fetch", "-o", &out_arg]);
    assert!(stdout.starts_with("Exported 2 records to"));
    assert_eq!(code, 0);
    assert!(std::fs::read_to_string(&out).unwrap().contains("| Andreas | 34 | 80 |"));
}

#[test]
fn test_update() {
    let dir = workbook();
    let (stdout, _, code) = run_command(
        dir.path(),
        &["-s", "People", "update", "--where", "Name=Andreas", "--set", "Age=35"],
    );
    assert_eq!(stdout.trim(), "Updated 1 rows (1 cells)");
    assert_eq!(code, 0);
    assert_eq!(people(dir.path()), "Name,Age,Weight\nAndreas,35,80\nBen,9,30\n");
}

#[test]
fn test_insert() {
    let dir = workbook();
    let (stdout, _, code) = run_command(
        dir.path(),
        &["-s", "People", "insert", "--set", "Name=Cleo", "--set", "Age=7"],
    );
    assert_eq!(stdout.trim(), "Inserted 1 row");
    assert_eq!(code, 0);
    assert_eq!(
        people(dir.path()),
        "Name,Age,Weight\nAndreas,34,80\nBen,9,30\nCleo,7,\n"
    );
}

#[test]
fn test_delete() {
    let dir = workbook();
    let (stdout, _, code) = run_command(dir.path(), &["-s", "People", "delete", "--where", "Age=34"]);
    assert_eq!(stdout.trim(), "Deleted 1 rows");
    assert_eq!(code, 0);
    assert_eq!(people(dir.path()), "Name,Age,Weight\nBen,9,30\n");
}

#[test]
fn test_unknown_column_fails_without_writing() {
    let dir = workbook();
    let before = people(dir.path());
    let (_, stderr, code) = run_command(
        dir.path(),
        &["-s", "People", "update", "--where", "Name=Ben", "--set", "Height=1"],
    );
    assert!(stderr.contains("Header \"Height\" not found"));
    assert_eq!(code, 1);
    assert_eq!(people(dir.path()), before);
}

#[test]
fn test_unknown_sheet() {
    let dir = workbook();
    let (_, stderr, code) = run_command(dir.path(), &["-s", "Nope", "fetch"]);
    assert!(stderr.contains("Sheet Nope not found in People,Rates"));
    assert_eq!(code, 1);
}

#[test]
fn test_missing_sheet() {
    let dir = workbook();
    let (_, stderr, code) = run_command(dir.path(), &["fetch"]);
    assert!(stderr.contains("No sheet given"));
    assert_eq!(code, 1);
}

#[test]
fn test_usage_error() {
    let dir = workbook();
    let (_, stderr, code) = run_command(dir.path(), &["delete"]);
    assert!(stderr.contains("delete needs --where"));
    assert!(stderr.contains("Usage: sheetrow"));
    assert_eq!(code, 1);
}

#[test]
fn test_config_supplies_sheet() {
    let dir = workbook();
    std::fs::write(
        dir.path().join("test-config.toml"),
        "sheet = \"People\"\nformat = \"csv\"\n",
    )
    .unwrap();
    let (stdout, _, code) = run_command(dir.path(), &["fetch"]);
    assert_eq!(stdout, "Name,Age,Weight\nAndreas,34,80\nBen,9,30\n");
    assert_eq!(code, 0);
}
