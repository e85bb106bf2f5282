use crate::decision::collapse_lines;
use crate::quarter::QuarterIndex;
use crate::version::{VersionToken, normalize};
use thiserror::Error;
use trmcheck_types::DECISION_NOT_FOUND;
use trmcheck_types::matrix::DecisionMatrix;

/// Why a lookup fell back to [`DECISION_NOT_FOUND`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupMiss {
    #[error("quarter column '{label}' is not in the index")]
    ColumnNotFound { label: String },

    #[error("no matrix row matches version '{version}'")]
    VersionNotFound { version: String },

    #[error("row '{row}' has {available} cells; decision cell {cell} is out of range")]
    MalformedRow {
        row: String,
        cell: usize,
        available: usize,
    },
}

/// Result of [`lookup`]. A miss always carries the not-found sentinel as its decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionLookup {
    pub matched_version: Option<String>,
    pub decision: String,
    pub miss: Option<LookupMiss>,
}

impl DecisionLookup {
    fn miss(matched_version: Option<String>, miss: LookupMiss) -> Self {
        Self {
            matched_version,
            decision: DECISION_NOT_FOUND.to_string(),
            miss: Some(miss),
        }
    }

    pub fn is_found(&self) -> bool {
        self.miss.is_none()
    }

    pub fn into_pair(self) -> (Option<String>, String) {
        (self.matched_version, self.decision)
    }
}

/// Reads the decision for `version` in the `target_label` quarter column.
///
/// Rows are scanned in matrix order and the first row whose label is numerically equal to the
/// version (as written, or with its `.x` spelling toggled) wins.
pub fn lookup(
    matrix: &DecisionMatrix,
    target_label: &str,
    index: &QuarterIndex,
    version: &str,
) -> DecisionLookup {
    let Some(offset) = index.get(target_label) else {
        return DecisionLookup::miss(
            None,
            LookupMiss::ColumnNotFound {
                label: target_label.to_string(),
            },
        );
    };
    // Cell 0 holds the version label.
    let cell = offset + 1;

    let wanted = VersionToken::parse(version);
    let wanted_alt = VersionToken::parse(&normalize(version));

    for row in matrix.populated_rows() {
        let row_token = VersionToken::parse(&row.version);
        if row_token != wanted && row_token != wanted_alt {
            continue;
        }

        return match row.cell(cell) {
            Some(text) => DecisionLookup {
                matched_version: Some(row.version.clone()),
                decision: collapse_lines(text),
                miss: None,
            },
            None => DecisionLookup::miss(
                Some(row.version.clone()),
                LookupMiss::MalformedRow {
                    row: row.version.clone(),
                    cell,
                    available: row.cells.len(),
                },
            ),
        };
    }

    DecisionLookup::miss(
        None,
        LookupMiss::VersionNotFound {
            version: version.to_string(),
        },
    )
}
