//! Library half of the `trmcheck` binary: config file handling and status explanations.

pub mod config;
pub mod explain;
