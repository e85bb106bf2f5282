//! Shared DTOs (schemas-as-code) for the trmcheck workspace.
//!
//! # Design constraints
//! - These types are read from and written to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod inventory;
pub mod matrix;
pub mod report;
pub mod result;

/// Schema identifiers.
pub mod schema {
    pub const TRMCHECK_MATRIX_V1: &str = "trmcheck.matrix.v1";
    pub const TRMCHECK_REPORT_V1: &str = "trmcheck.report.v1";
}

/// Decision text used whenever no decision cell could be resolved.
pub const DECISION_NOT_FOUND: &str = "Decision Not Found";
