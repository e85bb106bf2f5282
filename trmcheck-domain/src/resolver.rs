use crate::classify::classify_decision;
use crate::decision::Decision;
use crate::lookup::lookup;
use crate::next_version::{NextVersion, column_pairs, find_next};
use crate::ports::MatrixView;
use crate::quarter::{Quarter, QuarterIndex};
use rayon::prelude::*;
use std::borrow::Cow;
use tracing::{debug, info, warn};
use trmcheck_types::DECISION_NOT_FOUND;
use trmcheck_types::inventory::TrackedEntry;
use trmcheck_types::matrix::ToolMatrix;
use trmcheck_types::result::{ResolutionRecord, Status};

const NOTE_NO_MATRIX: &str = "no decision matrix for tool";

/// How quarter labels are mapped to decision columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColumnStrategy {
    /// Fixed three-year window around the target year.
    #[default]
    Window,
    /// Each matrix's own header labels.
    Header,
}

/// Resolves tracked entries for one target quarter.
#[derive(Debug, Clone)]
pub struct Resolver {
    quarter: Quarter,
    label: String,
    strategy: ColumnStrategy,
    window: QuarterIndex,
}

impl Resolver {
    pub fn new(quarter: Quarter, strategy: ColumnStrategy) -> Self {
        Self {
            label: quarter.label(),
            window: QuarterIndex::build(quarter.year()),
            quarter,
            strategy,
        }
    }

    pub fn quarter(&self) -> Quarter {
        self.quarter
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn strategy(&self) -> ColumnStrategy {
        self.strategy
    }

    /// Header label found at the target's window offset when it names a different quarter.
    pub fn window_header_mismatch<'m>(&self, matrix: &'m ToolMatrix) -> Option<&'m str> {
        let offset = self.window.get(&self.label)?;
        matrix
            .matrix
            .columns
            .get(offset)
            .map(String::as_str)
            .filter(|column| *column != self.label)
    }

    fn index_for<'a>(&'a self, matrix: &ToolMatrix) -> Cow<'a, QuarterIndex> {
        match self.strategy {
            ColumnStrategy::Window => {
                if let Some(column) = self.window_header_mismatch(matrix) {
                    warn!(
                        tool_id = %matrix.tool_id,
                        quarter = %self.label,
                        header = column,
                        "matrix header does not match the quarter window"
                    );
                }
                Cow::Borrowed(&self.window)
            }
            ColumnStrategy::Header => {
                Cow::Owned(QuarterIndex::from_labels(matrix.matrix.columns.iter().cloned()))
            }
        }
    }

    /// Resolves one entry. `matrix` is `None` when no snapshot exists for the tool.
    pub fn resolve(&self, entry: &TrackedEntry, matrix: Option<&ToolMatrix>) -> ResolutionRecord {
        let Some(tool) = matrix else {
            debug!(tool_id = %entry.tool_id, "no decision matrix");
            return ResolutionRecord {
                tool_id: entry.tool_id.clone(),
                name: entry.name.clone(),
                tracked_version: entry.version.clone(),
                tracked_decision: entry.decision.clone(),
                quarter: self.label.clone(),
                matched_version: None,
                decision: DECISION_NOT_FOUND.to_string(),
                status: Status::Unapproved,
                next_approved_version: None,
                next_approved_decision: None,
                decision_date: None,
                note: Some(NOTE_NO_MATRIX.to_string()),
            };
        };

        let index = self.index_for(tool);
        let found = lookup(&tool.matrix, &self.label, &index, &entry.version);
        let note = found.miss.as_ref().map(ToString::to_string);
        let observed = Decision::new(found.decision.as_str());
        let observed_version = found.matched_version.as_deref().unwrap_or("");

        let status = classify_decision(&entry.decision, &entry.version, &observed, observed_version);

        let next = if status.needs_replacement() {
            let pairs = column_pairs(&tool.matrix, &index, &self.label);
            find_next(&entry.version, &pairs)
        } else {
            NextVersion::none()
        };

        debug!(
            tool_id = %entry.tool_id,
            version = %entry.version,
            status = %status.code(),
            next = next.version.as_deref().unwrap_or("-"),
            fallback = next.fallback,
            "resolved entry"
        );

        ResolutionRecord {
            tool_id: entry.tool_id.clone(),
            name: entry.name.clone().or_else(|| tool.name.clone()),
            tracked_version: entry.version.clone(),
            tracked_decision: entry.decision.clone(),
            quarter: self.label.clone(),
            matched_version: found.matched_version,
            decision: found.decision,
            status,
            next_approved_version: next.version,
            next_approved_decision: next.decision,
            decision_date: tool.decision_date.clone(),
            note,
        }
    }

    /// Resolves every entry in parallel. Records come back in inventory order.
    pub fn resolve_all(
        &self,
        entries: &[TrackedEntry],
        matrices: &dyn MatrixView,
    ) -> Vec<ResolutionRecord> {
        let records: Vec<ResolutionRecord> = entries
            .par_iter()
            .map(|entry| self.resolve(entry, matrices.matrix(&entry.tool_id)))
            .collect();

        let compliant = records.iter().filter(|r| r.status.is_compliant()).count();
        info!(
            quarter = %self.label,
            entries = records.len(),
            compliant,
            "resolved inventory"
        );
        records
    }
}
