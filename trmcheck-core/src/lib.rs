//! Embeddable core library for trmcheck.
//!
//! Provides a clap-free, I/O-abstracted scan entry point that can be linked
//! into other host processes.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`InventorySource`](ports::InventorySource) loads the tracked-tool inventory
//! - [`MatrixSource`](ports::MatrixSource) loads decision-matrix snapshots
//! - [`WritePort`](ports::WritePort) writes files and creates directories
//!
//! The [`adapters`] module provides filesystem-backed and in-memory implementations.
//!
//! # Entry points
//!
//! - [`run_scan`](pipeline::run_scan) resolves every tracked entry and builds the report
//! - [`write_scan_artifacts`](pipeline::write_scan_artifacts) writes `results.json` and `report.json`

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the domain types callers need to configure a scan.
pub use trmcheck_domain::{ColumnStrategy, Quarter, QuarterIndex, QuarterParseError, Resolver};

// Re-export snapshot loading so embedders don't need trmcheck-matrix directly.
pub use trmcheck_matrix::{LoadedMatrix, MatrixLoadError};
