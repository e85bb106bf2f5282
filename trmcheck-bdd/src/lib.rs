//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production crates.
//! The helpers below write the on-disk layout a scan expects.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use trmcheck_types::inventory::{Inventory, TrackedEntry};
use trmcheck_types::matrix::{GridTable, MatrixSnapshot, MatrixTable};

/// Splits a `|`-separated step argument into trimmed cells.
pub fn split_cells(raw: &str) -> Vec<String> {
    raw.split('|').map(|c| c.trim().to_string()).collect()
}

/// Builds a grid snapshot. Each row is `[version, decision...]`.
pub fn grid_snapshot(tool_id: &str, columns: Vec<String>, rows: Vec<Vec<String>>) -> MatrixSnapshot {
    MatrixSnapshot {
        schema: trmcheck_types::schema::TRMCHECK_MATRIX_V1.to_string(),
        tool_id: Some(tool_id.to_string()),
        name: None,
        url: None,
        decision_date: None,
        captured_at: None,
        table: MatrixTable::Grid(GridTable { columns, rows }),
    }
}

/// Writes `snapshot` to `<dir>/<tool_id>.json`.
pub fn write_snapshot(dir: &Utf8Path, tool_id: &str, snapshot: &MatrixSnapshot) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(snapshot).context("serialize snapshot")?;
    fs::write(dir.join(format!("{tool_id}.json")), json)?;
    Ok(())
}

pub fn write_inventory(path: &Utf8Path, entries: &[TrackedEntry]) -> anyhow::Result<()> {
    let inventory = Inventory {
        trm_base_url: None,
        trm_entries: entries.to_vec(),
    };
    let yaml = serde_yaml::to_string(&inventory).context("serialize inventory")?;
    fs::write(path, yaml)?;
    Ok(())
}
