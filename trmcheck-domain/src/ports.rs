use std::collections::BTreeMap;
use trmcheck_types::matrix::ToolMatrix;

/// Read-only access to the decision matrices of a scan, keyed by tool id.
///
/// The resolver fans out over entries in parallel, so implementations must be `Sync`.
pub trait MatrixView: Send + Sync {
    fn matrix(&self, tool_id: &str) -> Option<&ToolMatrix>;
}

/// In-memory `MatrixView`. A later insert for the same tool id replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct MatrixSet {
    by_tool: BTreeMap<String, ToolMatrix>,
}

impl MatrixSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, matrix: ToolMatrix) -> Option<ToolMatrix> {
        self.by_tool.insert(matrix.tool_id.clone(), matrix)
    }

    pub fn len(&self) -> usize {
        self.by_tool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tool.is_empty()
    }

    pub fn tool_ids(&self) -> impl Iterator<Item = &str> {
        self.by_tool.keys().map(String::as_str)
    }
}

impl FromIterator<ToolMatrix> for MatrixSet {
    fn from_iter<I: IntoIterator<Item = ToolMatrix>>(iter: I) -> Self {
        let mut set = Self::new();
        for matrix in iter {
            set.insert(matrix);
        }
        set
    }
}

impl MatrixView for MatrixSet {
    fn matrix(&self, tool_id: &str) -> Option<&ToolMatrix> {
        self.by_tool.get(tool_id)
    }
}
