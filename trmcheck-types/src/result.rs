use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compliance status of one tracked entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Status {
    InCompliance,
    InDivest,
    /// Same version as the baseline, but its decision text changed.
    #[serde(rename = "decision_mismatch")]
    Mismatch {
        prior: String,
        current: String,
    },
    Unapproved,
}

impl Status {
    pub fn code(&self) -> StatusCode {
        match self {
            Status::InCompliance => StatusCode::InCompliance,
            Status::InDivest => StatusCode::InDivest,
            Status::Mismatch { .. } => StatusCode::DecisionMismatch,
            Status::Unapproved => StatusCode::Unapproved,
        }
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, Status::InCompliance)
    }

    /// Whether a replacement version should be searched for.
    pub fn needs_replacement(&self) -> bool {
        !self.is_compliant()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::InCompliance => f.write_str("InCompliance"),
            Status::InDivest => f.write_str("InDivest"),
            Status::Mismatch { prior, current } => {
                write!(f, "Decision Mismatch: '{prior}' -> '{current}'")
            }
            Status::Unapproved => f.write_str("Unapproved"),
        }
    }
}

/// Payload-free discriminant of [`Status`], used by policy settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    InCompliance,
    InDivest,
    DecisionMismatch,
    Unapproved,
}

impl StatusCode {
    pub const ALL: [StatusCode; 4] = [
        StatusCode::InCompliance,
        StatusCode::InDivest,
        StatusCode::DecisionMismatch,
        StatusCode::Unapproved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::InCompliance => "in_compliance",
            StatusCode::InDivest => "in_divest",
            StatusCode::DecisionMismatch => "decision_mismatch",
            StatusCode::Unapproved => "unapproved",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        StatusCode::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = StatusCode::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown status code '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Outcome of resolving one tracked entry against its decision matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRecord {
    pub tool_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub tracked_version: String,
    pub tracked_decision: String,

    /// Quarter label the decision was read from, e.g. `"CY2025 Q3"`.
    pub quarter: String,

    /// Row label that matched the tracked version, if any.
    #[serde(default)]
    pub matched_version: Option<String>,

    pub decision: String,
    pub status: Status,

    /// Only populated when `status` is not `in_compliance`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_approved_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_approved_decision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<String>,

    /// Why the decision could not be resolved, when it could not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
