use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decision matrix for one tool: version rows by quarter columns.
///
/// `columns` holds the quarter labels (e.g. `"CY2025 Q3"`). Every row's
/// `cells[0]` is the version label itself, so `cells[i + 1]` is the decision
/// for `columns[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMatrix {
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub rows: Vec<VersionRow>,
}

impl DecisionMatrix {
    pub fn new(columns: Vec<String>, rows: Vec<VersionRow>) -> Self {
        Self { columns, rows }
    }

    /// Rows that carry at least one cell. Empty rows are invisible to lookups.
    pub fn populated_rows(&self) -> impl Iterator<Item = &VersionRow> {
        self.rows.iter().filter(|r| !r.cells.is_empty())
    }
}

/// A decision matrix together with the page facts it was captured from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMatrix {
    pub tool_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<String>,

    pub matrix: DecisionMatrix,
}

impl ToolMatrix {
    pub fn new(tool_id: impl Into<String>, matrix: DecisionMatrix) -> Self {
        Self {
            tool_id: tool_id.into(),
            name: None,
            url: None,
            decision_date: None,
            matrix,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRow {
    pub version: String,

    #[serde(default)]
    pub cells: Vec<String>,
}

impl VersionRow {
    /// Builds a row from raw cells; the first cell doubles as the version label.
    pub fn from_cells(cells: Vec<String>) -> Self {
        let version = cells.first().cloned().unwrap_or_default();
        Self { version, cells }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// A matrix as captured by the page-extraction collaborator.
///
/// trmcheck reads snapshots tolerantly:
/// - Unknown fields are ignored.
/// - Only `table` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    #[serde(default = "default_snapshot_schema")]
    pub schema: String,

    /// Tool identifier on the decision page. Falls back to the file stem when absent.
    #[serde(default, alias = "tid", skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,

    pub table: MatrixTable,
}

fn default_snapshot_schema() -> String {
    crate::schema::TRMCHECK_MATRIX_V1.to_string()
}

/// Table payload of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatrixTable {
    /// Two header rows as they appear on the page: spanning years, then quarters.
    Raw(RawTable),
    /// Already expanded column labels.
    Grid(GridTable),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub year_header: Vec<HeaderCell>,
    pub quarter_header: Vec<String>,

    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub text: String,

    #[serde(default = "default_colspan")]
    pub colspan: u32,
}

fn default_colspan() -> u32 {
    1
}
