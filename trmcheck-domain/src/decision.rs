use trmcheck_types::DECISION_NOT_FOUND;

const MARK_AUTHORIZED: &str = "Authorized";
const MARK_DIVEST: &str = "DIVEST";
const MARK_POAM: &str = "POA&M";
const MARK_UNAPPROVED: &str = "Unapproved";

/// Coarse reading of a decision cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    Authorized,
    /// Authorized, but being phased out.
    Divest,
    /// Authorized under a plan of action and milestones.
    Conditional,
    Unapproved,
    /// Empty, missing, or text without a recognised marker.
    Unknown,
}

/// Decision text decoded once into the facts it encodes.
///
/// Markers are matched case-sensitively, so `"Unauthorized"` is not read as authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    text: String,
    authorized: bool,
    divest: bool,
    conditional: bool,
    unapproved: bool,
    not_found: bool,
}

impl Decision {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            authorized: text.contains(MARK_AUTHORIZED),
            divest: text.contains(MARK_DIVEST),
            conditional: text.contains(MARK_POAM),
            unapproved: text.contains(MARK_UNAPPROVED),
            not_found: text.contains(DECISION_NOT_FOUND),
            text,
        }
    }

    pub fn not_found() -> Self {
        Self::new(DECISION_NOT_FOUND)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn is_divest(&self) -> bool {
        self.divest
    }

    pub fn is_conditional(&self) -> bool {
        self.conditional
    }

    pub fn is_unapproved(&self) -> bool {
        self.unapproved
    }

    pub fn is_not_found(&self) -> bool {
        self.not_found
    }

    /// Authorized without divestment or POA&M conditions.
    pub fn qualifies_as_replacement(&self) -> bool {
        self.authorized && !self.divest && !self.conditional
    }

    pub fn kind(&self) -> DecisionKind {
        if self.is_blank() || self.not_found {
            DecisionKind::Unknown
        } else if self.unapproved {
            DecisionKind::Unapproved
        } else if self.divest {
            DecisionKind::Divest
        } else if self.conditional {
            DecisionKind::Conditional
        } else if self.authorized {
            DecisionKind::Authorized
        } else {
            DecisionKind::Unknown
        }
    }
}

/// Joins a multi-line cell into one line: each line break becomes a single space.
pub fn collapse_lines(text: &str) -> String {
    text.trim().lines().map(str::trim_end).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_markers_once() {
        let d = Decision::new("Authorized w/ Constraints (DIVEST)");
        assert!(d.is_authorized());
        assert!(d.is_divest());
        assert!(!d.is_conditional());
        assert_eq!(d.kind(), DecisionKind::Divest);
        assert!(!d.qualifies_as_replacement());
    }

    #[test]
    fn kinds() {
        assert_eq!(Decision::new("Authorized").kind(), DecisionKind::Authorized);
        assert_eq!(Decision::new("Authorized [1, 2]").kind(), DecisionKind::Authorized);
        assert_eq!(
            Decision::new("Authorized w/ POA&M").kind(),
            DecisionKind::Conditional
        );
        assert_eq!(Decision::new("Unapproved").kind(), DecisionKind::Unapproved);
        assert_eq!(Decision::new("").kind(), DecisionKind::Unknown);
        assert_eq!(Decision::not_found().kind(), DecisionKind::Unknown);
        assert_eq!(Decision::new("Unauthorized").kind(), DecisionKind::Unknown);
    }

    #[test]
    fn replacement_requires_plain_authorization() {
        assert!(Decision::new("Authorized").qualifies_as_replacement());
        assert!(Decision::new("Authorized w/ Constraints [1]").qualifies_as_replacement());
        assert!(!Decision::new("Authorized w/ POA&M").qualifies_as_replacement());
        assert!(!Decision::new("DIVEST").qualifies_as_replacement());
        assert!(!Decision::new("Unapproved").qualifies_as_replacement());
    }

    #[test]
    fn collapse_lines_joins_with_single_spaces() {
        assert_eq!(collapse_lines("Authorized\n[1, 2]"), "Authorized [1, 2]");
        assert_eq!(collapse_lines("  Authorized \r\n(DIVEST)\n"), "Authorized (DIVEST)");
        assert_eq!(collapse_lines("Authorized"), "Authorized");
        assert_eq!(collapse_lines(""), "");
    }
}
