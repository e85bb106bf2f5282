use crate::decision::{Decision, collapse_lines};
use crate::quarter::QuarterIndex;
use crate::version::{VersionNumber, VersionToken, normalize};
use tracing::debug;
use trmcheck_types::matrix::DecisionMatrix;

/// Replacement picked by [`find_next`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextVersion {
    pub version: Option<String>,
    pub decision: Option<String>,
    /// True when no strictly newer version qualified and an arbitrary authorized one was taken.
    pub fallback: bool,
}

impl NextVersion {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn into_pair(self) -> (Option<String>, Option<String>) {
        (self.version, self.decision)
    }
}

/// `(version label, decision)` pairs for one quarter column, in matrix order.
///
/// Empty rows and rows too short to reach the column are skipped.
pub fn column_pairs(
    matrix: &DecisionMatrix,
    index: &QuarterIndex,
    target_label: &str,
) -> Vec<(String, String)> {
    let Some(offset) = index.get(target_label) else {
        return Vec::new();
    };

    matrix
        .populated_rows()
        .filter_map(|row| match row.cell(offset + 1) {
            Some(text) => Some((row.version.clone(), collapse_lines(text))),
            None => {
                debug!(row = %row.version, cells = row.cells.len(), "skipping short matrix row");
                None
            }
        })
        .collect()
}

/// Nearest authorized version newer than `current_version`.
///
/// Only plain authorizations qualify: decisions marked divest or POA&M are skipped, as are
/// labels without a numeric version. When nothing newer qualifies, the lowest qualifying
/// version is returned instead, which may be older than the current one.
pub fn find_next(current_version: &str, pairs: &[(String, String)]) -> NextVersion {
    let original = VersionToken::parse(current_version).value();
    let alternate = VersionToken::parse(&normalize(current_version)).value();

    let qualifying: Vec<(VersionNumber, &str, &str)> = pairs
        .iter()
        .filter(|(_, decision)| Decision::new(decision.as_str()).qualifies_as_replacement())
        .filter_map(|(version, decision)| {
            let value = VersionToken::parse(version).value()?;
            Some((value, version.as_str(), decision.as_str()))
        })
        .collect();

    let newer_than = |value: &VersionNumber, bound: Option<VersionNumber>| {
        bound.is_some_and(|b| *value > b)
    };

    let mut candidates: Vec<_> = qualifying
        .iter()
        .filter(|(value, _, _)| newer_than(value, original) || newer_than(value, alternate))
        .copied()
        .collect();

    let fallback = candidates.is_empty();
    if fallback {
        candidates = qualifying;
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    match candidates.first() {
        Some((_, version, decision)) => NextVersion {
            version: Some(version.to_string()),
            decision: Some(decision.to_string()),
            fallback,
        },
        None => NextVersion::none(),
    }
}
