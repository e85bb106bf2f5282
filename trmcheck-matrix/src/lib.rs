//! Decision-matrix snapshot ingestion.
//!
//! Snapshots are produced by the page-extraction collaborator, one JSON file per tool. Loading is
//! tolerant: unknown fields are ignored and a file that fails to load is reported alongside the
//! others instead of aborting the scan.

mod header;
mod load;

pub use header::{expand_header, expand_table};
pub use load::{LoadedMatrix, MatrixLoadError, load_matrices, load_matrix_file, parse_snapshot};
