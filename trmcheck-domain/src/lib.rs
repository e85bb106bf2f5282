//! Domain logic: resolve tracked tool versions against decision matrices.
//!
//! This crate owns *what* a matrix says about a version and how that compares to the recorded
//! baseline. It does not own *where* matrices or inventories come from; that's `trmcheck-core`.

mod classify;
mod decision;
mod lookup;
mod next_version;
mod ports;
mod quarter;
mod resolver;
mod version;

pub use classify::{classify, classify_decision};
pub use decision::{Decision, DecisionKind, collapse_lines};
pub use lookup::{DecisionLookup, LookupMiss, lookup};
pub use next_version::{NextVersion, column_pairs, find_next};
pub use ports::{MatrixSet, MatrixView};
pub use quarter::{Quarter, QuarterIndex, QuarterParseError};
pub use resolver::{ColumnStrategy, Resolver};
pub use version::{VersionNumber, VersionToken, normalize};
