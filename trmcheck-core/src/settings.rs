//! Clap-free settings for the scan pipeline.

use camino::Utf8PathBuf;
use trmcheck_domain::{ColumnStrategy, Quarter};
use trmcheck_types::result::StatusCode;

/// Run mode controls exit-code semantics.
///
/// In `Advisory` mode, policy blocks (exit 2) are mapped to exit 0.
/// The report verdict is the same in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Standalone,
    Advisory,
}

/// Settings for the scan pipeline.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub inventory: Utf8PathBuf,
    pub matrices_dir: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    /// Quarter to evaluate; `None` means the current quarter.
    pub quarter: Option<Quarter>,
    pub columns: ColumnStrategy,

    // Policy
    pub fail_on: Vec<StatusCode>,

    // Mode
    pub mode: RunMode,
}

impl ScanSettings {
    pub fn target_quarter(&self) -> Quarter {
        self.quarter.unwrap_or_else(Quarter::current)
    }

    pub fn fails_on(&self, code: StatusCode) -> bool {
        self.fail_on.contains(&code)
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            inventory: Utf8PathBuf::from("trm_usage.yml"),
            matrices_dir: Utf8PathBuf::from("matrices"),
            out_dir: Utf8PathBuf::from("artifacts/trmcheck"),
            quarter: None,
            columns: ColumnStrategy::default(),
            fail_on: default_fail_on(),
            mode: RunMode::default(),
        }
    }
}

/// Every status except `in_compliance`.
pub fn default_fail_on() -> Vec<StatusCode> {
    StatusCode::ALL
        .into_iter()
        .filter(|c| *c != StatusCode::InCompliance)
        .collect()
}
