use crate::decision::Decision;
use crate::version::VersionToken;
use trmcheck_types::result::Status;

/// Compares a tracked baseline against the decision observed in the matrix.
pub fn classify(
    tracked_decision: &str,
    tracked_version: &str,
    observed_decision: &str,
    observed_version: &str,
) -> Status {
    classify_decision(
        tracked_decision,
        tracked_version,
        &Decision::new(observed_decision),
        observed_version,
    )
}

/// [`classify`] over an already decoded observed decision.
///
/// Rules are checked in order and the first one that applies wins:
/// unresolved or unapproved decisions, divestment, blank inputs, then version/decision equality.
pub fn classify_decision(
    tracked_decision: &str,
    tracked_version: &str,
    observed: &Decision,
    observed_version: &str,
) -> Status {
    if observed.is_blank() || observed.is_not_found() || observed.is_unapproved() {
        return Status::Unapproved;
    }
    if observed.is_divest() {
        return Status::InDivest;
    }
    if [tracked_decision, tracked_version, observed_version]
        .iter()
        .any(|s| s.is_empty())
    {
        return Status::Unapproved;
    }

    let same_version = VersionToken::parse(tracked_version) == VersionToken::parse(observed_version);
    if !same_version {
        return Status::Unapproved;
    }

    if tracked_decision == observed.text() {
        Status::InCompliance
    } else {
        Status::Mismatch {
            prior: tracked_decision.to_string(),
            current: observed.text().to_string(),
        }
    }
}
