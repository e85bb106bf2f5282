//! Integration tests for the snapshot loader.

use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use trmcheck_matrix::{MatrixLoadError, load_matrices, load_matrix_file};

fn matrices_path(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().join("matrices")).unwrap()
}

fn write_snapshot(dir: &Utf8PathBuf, file: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(file), contents).unwrap();
}

fn grid_snapshot() -> &'static str {
    r#"{
        "schema": "trmcheck.matrix.v1",
        "name": "Example Tool",
        "decision_date": "06/30/2025",
        "table": {
            "columns": ["CY2025 Q2", "CY2025 Q3"],
            "rows": [
                ["1.0", "Authorized", "Authorized (DIVEST)"],
                ["2.0", "Authorized", "Authorized"]
            ]
        }
    }"#
}

fn raw_snapshot() -> &'static str {
    r#"{
        "tool_id": "4242",
        "captured_at": "2025-07-01T12:00:00Z",
        "extra_field": true,
        "table": {
            "year_header": [{ "text": "CY2024", "colspan": 4 }, { "text": "CY2025", "colspan": 4 }],
            "quarter_header": ["Q1", "Q2", "Q3", "Q4", "Q1", "Q2", "Q3", "Q4"],
            "rows": [["8.x", "", "", "", "", "", "", "Authorized", "Authorized\n[1]"]]
        }
    }"#
}

#[test]
fn missing_dir_is_empty() {
    let temp = tempfile::tempdir().expect("tempdir");
    let loaded = load_matrices(&matrices_path(&temp)).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn loads_grid_and_raw_snapshots_sorted() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = matrices_path(&temp);
    write_snapshot(&dir, "zz-raw.json", raw_snapshot());
    write_snapshot(&dir, "1001.json", grid_snapshot());
    write_snapshot(&dir, "notes.txt", "ignored");

    let loaded = load_matrices(&dir).unwrap();
    assert_eq!(loaded.len(), 2);

    assert_eq!(loaded[0].tool_id, "1001");
    let grid = loaded[0].matrix.as_ref().unwrap();
    assert_eq!(grid.name.as_deref(), Some("Example Tool"));
    assert_eq!(grid.decision_date.as_deref(), Some("06/30/2025"));
    assert_eq!(grid.matrix.rows.len(), 2);

    assert_eq!(loaded[1].tool_id, "4242");
    let raw = loaded[1].matrix.as_ref().unwrap();
    assert_eq!(raw.matrix.columns.len(), 8);
    assert_eq!(raw.matrix.columns[6], "CY2025 Q3");
    assert_eq!(raw.matrix.rows[0].cell(7), Some("Authorized"));
}

#[test]
fn corrupted_snapshot_is_collected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = matrices_path(&temp);
    write_snapshot(&dir, "good.json", grid_snapshot());
    write_snapshot(&dir, "bad.json", "{ not json");
    write_snapshot(
        &dir,
        "empty.json",
        r#"{ "table": { "columns": [], "rows": [] } }"#,
    );

    let loaded = load_matrices(&dir).unwrap();
    assert_eq!(loaded.len(), 3);

    let by_id = |id: &str| loaded.iter().find(|m| m.tool_id == id).unwrap();
    assert!(matches!(by_id("bad").matrix, Err(MatrixLoadError::Json { .. })));
    assert!(matches!(by_id("empty").matrix, Err(MatrixLoadError::Table { .. })));
    assert!(by_id("good").matrix.is_ok());
}

#[test]
fn unreadable_file_is_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = matrices_path(&temp).join("missing.json");

    let loaded = load_matrix_file(&path);
    assert_eq!(loaded.tool_id, "missing");
    assert!(matches!(loaded.matrix, Err(MatrixLoadError::Io { .. })));
}
