//! Status explanations for the `trmcheck explain` command.
//!
//! Each entry covers:
//! - What the status means
//! - Which matrix decisions lead to it
//! - Remediation guidance

use trmcheck_types::result::StatusCode;

/// Information about one resolution status.
#[derive(Debug, Clone)]
pub struct StatusExplanation {
    /// Status code as written in `results.json` and `fail_on`.
    pub code: StatusCode,
    /// Short user-facing key (e.g., "in-divest").
    pub key: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Whether the default policy fails the run on this status.
    pub fails_by_default: bool,
    /// What the status means.
    pub description: &'static str,
    /// Decision texts that produce this status.
    pub triggers: &'static [&'static str],
    /// What to do about it.
    pub remediation: &'static str,
}

/// Registry of all status explanations, in `StatusCode::ALL` order.
pub static STATUS_REGISTRY: &[StatusExplanation] = &[
    StatusExplanation {
        code: StatusCode::InCompliance,
        key: "in-compliance",
        title: "In Compliance",
        fails_by_default: false,
        description: r#"The tracked version matched a row of the tool's decision matrix and the
decision for the target quarter is exactly the baseline recorded in the
inventory.

Rows match by version number rather than by label text, so a tracked "10.0"
matches a row labelled "Version 10" and "10.x" matches "10"."#,
        triggers: &["Authorized", "Authorized w/ POA&M"],
        remediation: r#"Nothing to do. No replacement version is searched for compliant entries."#,
    },
    StatusExplanation {
        code: StatusCode::InDivest,
        key: "in-divest",
        title: "In Divest",
        fails_by_default: true,
        description: r#"The tracked version is still authorized, but the matrix marks it for
divestiture in the target quarter.

Divest markers take precedence over any baseline comparison: a divest cell is
reported as in_divest even when the inventory recorded the same text."#,
        triggers: &["Authorized (DIVEST)", "Authorized w/ POA&M (DIVEST)"],
        remediation: r#"Plan a move to the version reported in `next_approved_version`.

If no replacement is reported, the matrix has no authorized version without a
divest or POA&M marker for the target quarter; check the decision page or
raise it with the tool owner."#,
    },
    StatusExplanation {
        code: StatusCode::DecisionMismatch,
        key: "decision-mismatch",
        title: "Decision Mismatch",
        fails_by_default: true,
        description: r#"The decision for the tracked version changed since the baseline was
recorded.

The matched cell is a known decision, but its text differs from the
`decision` stored for the entry in the inventory. The record carries both the
prior and current text."#,
        triggers: &["any decision that differs from the baseline"],
        remediation: r#"Review the new decision on the decision page. If it is acceptable, update
the entry's `decision` in the inventory so future scans compare against it.
Otherwise treat it like an unapproved version and move to
`next_approved_version`."#,
    },
    StatusExplanation {
        code: StatusCode::Unapproved,
        key: "unapproved",
        title: "Unapproved",
        fails_by_default: true,
        description: r#"The tracked version is not authorized for the target quarter.

This covers explicit unapproved decisions, blank cells, versions with no
matching row, a target quarter missing from the matrix header, a blank
baseline in the inventory, and tools with no decision matrix at all. When the
decision could not be read, the `note` field says why."#,
        triggers: &[
            "Unapproved",
            "(blank cell)",
            "Decision Not Found",
            "no decision matrix for tool",
        ],
        remediation: r#"Move to the version reported in `next_approved_version`, or request an
authorization for the tracked version.

When the note is "no decision matrix for tool", add a snapshot for the tool
to the matrices directory and scan again."#,
    },
];

/// Look up a status by code or key.
///
/// Matching is case-insensitive and treats `-` and `_` alike, so
/// `in_divest`, `in-divest` and `IN-DIVEST` all resolve.
pub fn lookup_status(query: &str) -> Option<&'static StatusExplanation> {
    let normalized = query.trim().to_lowercase().replace('_', "-");

    STATUS_REGISTRY.iter().find(|status| {
        status.key == normalized || status.code.as_str().replace('_', "-") == normalized
    })
}

/// List all status keys.
pub fn list_status_keys() -> Vec<&'static str> {
    STATUS_REGISTRY.iter().map(|s| s.key).collect()
}

pub fn format_policy(status: &StatusExplanation) -> &'static str {
    if status.fails_by_default {
        "fails"
    } else {
        "passes"
    }
}
