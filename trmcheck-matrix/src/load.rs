use crate::header::expand_table;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use thiserror::Error;
use tracing::{debug, warn};
use trmcheck_hash::sha256_hex;
use trmcheck_types::matrix::{MatrixSnapshot, ToolMatrix};

#[derive(Debug, Clone)]
pub struct LoadedMatrix {
    pub path: Utf8PathBuf,
    /// Tool id from the snapshot, or the file stem when the snapshot has none or failed to load.
    pub tool_id: String,
    /// SHA-256 of the file contents, when the file could be read.
    pub sha256: Option<String>,
    pub matrix: Result<ToolMatrix, MatrixLoadError>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },

    #[error("unusable table: {message}")]
    Table { message: String },
}

/// Parses one snapshot document. `fallback_id` is used when the snapshot carries no tool id.
pub fn parse_snapshot(json: &str, fallback_id: &str) -> Result<ToolMatrix, MatrixLoadError> {
    let snapshot: MatrixSnapshot =
        serde_json::from_str(json).map_err(|e| MatrixLoadError::Json {
            message: e.to_string(),
        })?;
    let matrix = expand_table(&snapshot.table)?;

    let tool_id = snapshot
        .tool_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(fallback_id)
        .to_string();

    Ok(ToolMatrix {
        tool_id,
        name: snapshot.name,
        url: snapshot.url,
        decision_date: snapshot.decision_date,
        matrix,
    })
}

/// Loads a single snapshot file. Failures are captured in [`LoadedMatrix::matrix`].
pub fn load_matrix_file(path: &Utf8Path) -> LoadedMatrix {
    let stem = path.file_stem().unwrap_or("unknown").to_string();

    let (sha256, matrix) = match fs::read_to_string(path) {
        Ok(s) => (Some(sha256_hex(s.as_bytes())), parse_snapshot(&s, &stem)),
        Err(e) => (
            None,
            Err(MatrixLoadError::Io {
                message: e.to_string(),
            }),
        ),
    };

    if let Err(err) = &matrix {
        warn!(path = %path, error = %err, "failed to load decision matrix");
    }

    LoadedMatrix {
        path: path.to_path_buf(),
        tool_id: matrix
            .as_ref()
            .map(|m| m.tool_id.clone())
            .unwrap_or(stem),
        sha256,
        matrix,
    }
}

/// Loads every `*.json` snapshot directly under `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn load_matrices(dir: &Utf8Path) -> anyhow::Result<Vec<LoadedMatrix>> {
    let pattern = dir.join("*.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning for decision matrices");

    let mut out = Vec::new();
    for entry in glob(pattern_str).context("glob matrices/*.json")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();

        out.push(load_matrix_file(&Utf8PathBuf::from(path)));
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}
