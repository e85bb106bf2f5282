use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use trmcheck_cli::config::{self, ConfigMerger, ScanOverrides};
use trmcheck_cli::explain;
use trmcheck_core::adapters::{FsInventorySource, FsMatrixSource, FsWritePort};
use trmcheck_core::pipeline::{ScanOutcome, ToolError, run_scan, write_scan_artifacts};
use trmcheck_core::{ColumnStrategy, Quarter, QuarterIndex, Resolver};
use trmcheck_types::inventory::TrackedEntry;
use trmcheck_types::report::ReportToolInfo;
use trmcheck_types::result::StatusCode;

#[derive(Debug, Parser)]
#[command(
    name = "trmcheck",
    version,
    about = "Checks tracked tool versions against published quarterly decision matrices."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve every inventory entry and write results.json and report.json.
    Scan(ScanArgs),
    /// Resolve a single version against one matrix snapshot and print the record.
    Lookup(LookupArgs),
    /// List the quarter labels of the three-year column window.
    Quarters(QuartersArgs),
    /// Explain what a status means and how to remediate it.
    Explain(ExplainArgs),
    /// List all statuses and whether the default policy fails on them.
    ListStatuses(ListStatusesArgs),
}

#[derive(Debug, Parser)]
struct ScanArgs {
    /// Config file (default: ./trmcheck.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Inventory YAML (default: trm_usage.yml).
    #[arg(long)]
    inventory: Option<Utf8PathBuf>,

    /// Directory of decision matrix snapshots (default: matrices).
    #[arg(long)]
    matrices_dir: Option<Utf8PathBuf>,

    /// Output directory for trmcheck artifacts (default: artifacts/trmcheck).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Target quarter, e.g. "CY2025 Q3" (default: current quarter).
    #[arg(long)]
    quarter: Option<String>,

    /// How decision columns are located in each matrix.
    #[arg(long, value_enum)]
    columns: Option<ColumnsArg>,

    /// Additional statuses that fail the run (comma separated or repeated).
    #[arg(long, value_delimiter = ',')]
    fail_on: Vec<StatusCode>,

    /// Report failing statuses without failing the run.
    #[arg(long, default_value_t = false)]
    advisory: bool,
}

#[derive(Debug, Parser)]
struct LookupArgs {
    /// Matrix snapshot JSON file.
    #[arg(long)]
    matrix: Utf8PathBuf,

    /// Tracked version to resolve.
    #[arg(long)]
    version: String,

    /// Target quarter, e.g. "CY2025 Q3" (default: current quarter).
    #[arg(long)]
    quarter: Option<Quarter>,

    #[arg(long, value_enum, default_value = "window")]
    columns: ColumnsArg,

    /// Baseline decision to compare against. Left empty, the status is always unapproved.
    #[arg(long, default_value = "")]
    baseline_decision: String,

    /// Tool id for the record (default: the snapshot's tool id).
    #[arg(long)]
    tool_id: Option<String>,
}

#[derive(Debug, Parser)]
struct QuartersArgs {
    /// Centre year of the window (default: current year).
    #[arg(long)]
    year: Option<i32>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Status code or key to explain (e.g., "in_divest", "unapproved").
    status: String,
}

#[derive(Debug, Parser)]
struct ListStatusesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ColumnsArg {
    /// Fixed window from Q1 of last year through Q4 of next year.
    Window,
    /// Column labels as published in each matrix header.
    Header,
}

impl From<ColumnsArg> for ColumnStrategy {
    fn from(value: ColumnsArg) -> Self {
        match value {
            ColumnsArg::Window => ColumnStrategy::Window,
            ColumnsArg::Header => ColumnStrategy::Header,
        }
    }
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::from(0),
        Err(ToolError::PolicyBlock) => ExitCode::from(2),
        Err(ToolError::Internal(e)) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Scan(args) => cmd_scan(args),
        Command::Lookup(args) => Ok(cmd_lookup(args)?),
        Command::Quarters(args) => Ok(cmd_quarters(args)?),
        Command::Explain(args) => Ok(cmd_explain(args)?),
        Command::ListStatuses(args) => Ok(cmd_list_statuses(args)?),
    }
}

fn cmd_scan(args: ScanArgs) -> Result<(), ToolError> {
    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(Utf8Path::new(".")).context("load trmcheck.toml config")?,
    };

    let settings = ConfigMerger::new(file_config).merge_scan_args(ScanOverrides {
        inventory: args.inventory,
        matrices_dir: args.matrices_dir,
        out_dir: args.out_dir,
        quarter: args.quarter,
        columns: args.columns.map(ColumnStrategy::from),
        fail_on: args.fail_on,
        advisory: args.advisory,
    })?;

    debug!(
        "merged config: inventory={}, matrices_dir={}, out_dir={}, fail_on={:?}, mode={:?}",
        settings.inventory, settings.matrices_dir, settings.out_dir, settings.fail_on, settings.mode
    );

    let outcome = run_scan(
        &settings,
        &FsInventorySource::new(settings.inventory.clone()),
        &FsMatrixSource::new(settings.matrices_dir.clone()),
        tool_info(),
    )?;

    write_scan_artifacts(&outcome, &settings.out_dir, &FsWritePort)?;
    print_summary(&outcome);
    info!("wrote scan artifacts to {}", settings.out_dir);

    if outcome.policy_block {
        return Err(ToolError::PolicyBlock);
    }
    Ok(())
}

fn print_summary(outcome: &ScanOutcome) {
    println!("Quarter: {}", outcome.report.run.quarter);
    println!();
    println!("  {:<12} {:<16} {:<18} NEXT", "TOOL", "VERSION", "STATUS");
    println!("  {:<12} {:<16} {:<18} ----", "----", "-------", "------");
    for record in &outcome.records {
        println!(
            "  {:<12} {:<16} {:<18} {}",
            record.tool_id,
            record.tracked_version,
            record.status.code(),
            record.next_approved_version.as_deref().unwrap_or("-")
        );
    }
    println!();

    let counts = &outcome.report.verdict.counts;
    println!(
        "{} entries: {} in_compliance, {} in_divest, {} decision_mismatch, {} unapproved",
        counts.entries,
        counts.in_compliance,
        counts.in_divest,
        counts.decision_mismatch,
        counts.unapproved
    );
}

fn cmd_lookup(args: LookupArgs) -> anyhow::Result<()> {
    let loaded = trmcheck_matrix::load_matrix_file(&args.matrix);
    let matrix = loaded
        .matrix
        .with_context(|| format!("load matrix {}", args.matrix))?;

    let tool_id = args.tool_id.unwrap_or_else(|| matrix.tool_id.clone());
    let entry = TrackedEntry::new(tool_id, args.version, args.baseline_decision);

    let quarter = args.quarter.unwrap_or_else(Quarter::current);
    let resolver = Resolver::new(quarter, args.columns.into());
    let record = resolver.resolve(&entry, Some(&matrix));

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn cmd_quarters(args: QuartersArgs) -> anyhow::Result<()> {
    let year = args.year.unwrap_or_else(|| Quarter::current().year());
    let index = QuarterIndex::build(year);

    match args.format {
        OutputFormat::Text => {
            println!("Quarter columns for {}:\n", year);
            println!("  {:<8} LABEL", "OFFSET");
            println!("  {:<8} -----", "------");
            for label in index.labels() {
                let offset = index.get(label).unwrap_or_default();
                println!("  {:<8} {}", offset, label);
            }
        }
        OutputFormat::Json => {
            let labels: Vec<_> = index
                .labels()
                .map(|label| {
                    serde_json::json!({
                        "label": label,
                        "offset": index.get(label),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&labels)?);
        }
    }
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{format_policy, list_status_keys, lookup_status};

    let Some(status) = lookup_status(&args.status) else {
        let available = list_status_keys().join(", ");
        anyhow::bail!(
            "Unknown status: '{}'\n\nAvailable statuses: {}",
            args.status,
            available
        );
    };

    println!("================================================================================");
    println!("STATUS: {}", status.title);
    println!("================================================================================");
    println!();
    println!("Key:             {}", status.key);
    println!("Code:            {}", status.code);
    println!("Default policy:  {}", format_policy(status));
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", status.description);
    println!();

    println!("TRIGGERING DECISIONS");
    println!("--------------------------------------------------------------------------------");
    for trigger in status.triggers {
        println!("  - {}", trigger);
    }
    println!();

    println!("REMEDIATION GUIDANCE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", status.remediation);
    println!();

    Ok(())
}

fn cmd_list_statuses(args: ListStatusesArgs) -> anyhow::Result<()> {
    use explain::{STATUS_REGISTRY, format_policy};

    match args.format {
        OutputFormat::Text => {
            println!("Statuses:\n");
            println!("  {:<20} {:<8} TITLE", "CODE", "POLICY");
            println!("  {:<20} {:<8} -----", "----", "------");
            for status in STATUS_REGISTRY {
                println!(
                    "  {:<20} {:<8} {}",
                    status.code.as_str(),
                    format_policy(status),
                    status.title
                );
            }
            println!();
            println!("Use 'trmcheck explain <code>' for details.");
        }
        OutputFormat::Json => {
            let statuses: Vec<_> = STATUS_REGISTRY
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "code": s.code,
                        "key": s.key,
                        "title": s.title,
                        "fails_by_default": s.fails_by_default,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        }
    }
    Ok(())
}

fn tool_info() -> ReportToolInfo {
    ReportToolInfo {
        name: "trmcheck".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
