//! Configuration file loading for trmcheck.
//!
//! Discovers and loads `trmcheck.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;
use trmcheck_core::settings::{RunMode, ScanSettings, default_fail_on};
use trmcheck_core::{ColumnStrategy, Quarter};
use trmcheck_types::result::StatusCode;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "trmcheck.toml";

/// Top-level configuration from trmcheck.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrmcheckConfig {
    /// Input and output locations.
    pub scan: ScanConfig,

    /// Which quarter column to evaluate.
    pub quarter: QuarterConfig,

    /// Exit-code policy.
    pub policy: PolicyConfig,
}

/// Scan section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Inventory YAML (default: `trm_usage.yml`).
    pub inventory: Option<Utf8PathBuf>,

    /// Directory of matrix snapshots (default: `matrices`).
    pub matrices_dir: Option<Utf8PathBuf>,

    /// Output directory (default: `artifacts/trmcheck`).
    pub out_dir: Option<Utf8PathBuf>,
}

/// Quarter section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuarterConfig {
    /// Quarter label such as `"CY2025 Q3"`. Unset means the current quarter.
    pub target: Option<String>,

    pub columns: Option<ColumnsConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnsConfig {
    Window,
    Header,
}

impl From<ColumnsConfig> for ColumnStrategy {
    fn from(value: ColumnsConfig) -> Self {
        match value {
            ColumnsConfig::Window => ColumnStrategy::Window,
            ColumnsConfig::Header => ColumnStrategy::Header,
        }
    }
}

/// Policy section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Statuses that fail the run. Unset means every status except `in_compliance`.
    pub fail_on: Option<Vec<StatusCode>>,

    /// Report failures without failing the run.
    pub advisory: bool,
}

/// Discover the trmcheck.toml config file.
///
/// Searches for `trmcheck.toml` in `root`.
/// Returns `None` if no config file is found.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a trmcheck.toml config file.
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<TrmcheckConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<TrmcheckConfig> {
    let config: TrmcheckConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `root`, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<TrmcheckConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(TrmcheckConfig::default()),
    }
}

/// Scan options given on the command line. `None` and empty values defer to the config file.
#[derive(Debug, Clone, Default)]
pub struct ScanOverrides {
    pub inventory: Option<Utf8PathBuf>,
    pub matrices_dir: Option<Utf8PathBuf>,
    pub out_dir: Option<Utf8PathBuf>,
    pub quarter: Option<String>,
    pub columns: Option<ColumnStrategy>,
    pub fail_on: Vec<StatusCode>,
    pub advisory: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: TrmcheckConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: TrmcheckConfig) -> Self {
        Self { config }
    }

    /// Merge with scan command CLI arguments.
    ///
    /// Scalar CLI values replace config values. CLI `fail_on` codes extend the
    /// config list, and `advisory` is on when either side sets it.
    pub fn merge_scan_args(self, cli: ScanOverrides) -> anyhow::Result<ScanSettings> {
        let defaults = ScanSettings::default();
        let TrmcheckConfig {
            scan,
            quarter: quarter_cfg,
            policy,
        } = self.config;

        let quarter = match cli.quarter.or(quarter_cfg.target) {
            Some(label) => Some(
                label
                    .parse::<Quarter>()
                    .with_context(|| format!("invalid target quarter '{}'", label))?,
            ),
            None => None,
        };

        let mut fail_on = policy.fail_on.unwrap_or_else(default_fail_on);
        for code in cli.fail_on {
            if !fail_on.contains(&code) {
                fail_on.push(code);
            }
        }

        let mode = if cli.advisory || policy.advisory {
            RunMode::Advisory
        } else {
            RunMode::Standalone
        };

        Ok(ScanSettings {
            inventory: cli
                .inventory
                .or(scan.inventory)
                .unwrap_or(defaults.inventory),
            matrices_dir: cli
                .matrices_dir
                .or(scan.matrices_dir)
                .unwrap_or(defaults.matrices_dir),
            out_dir: cli.out_dir.or(scan.out_dir).unwrap_or(defaults.out_dir),
            quarter,
            columns: cli
                .columns
                .or(quarter_cfg.columns.map(ColumnStrategy::from))
                .unwrap_or_default(),
            fail_on,
            mode,
        })
    }
}
