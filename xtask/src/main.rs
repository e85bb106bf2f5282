use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by trmcheck.
    PrintSchemas,
    /// Create a starter layout: trm_usage.yml, matrices/ with one snapshot, and trmcheck.toml.
    InitLayout {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Run the cucumber acceptance suite.
    Acceptance,
}

const SAMPLE_INVENTORY: &str = r#"trm_base_url: https://trm.example.invalid/ToolPage.aspx
trm_entries:
  - tid: 1234
    name: Example Tool
    version: "10.x"
    decision: Authorized
"#;

const SAMPLE_CONFIG: &str = r#"[scan]
inventory = "trm_usage.yml"
matrices_dir = "matrices"
out_dir = "artifacts/trmcheck"

[quarter]
# target = "CY2025 Q3"
columns = "header"

[policy]
fail_on = ["unapproved", "in_divest", "decision_mismatch"]
advisory = false
"#;

fn sample_snapshot() -> serde_json::Value {
    serde_json::json!({
        "schema": trmcheck_types::schema::TRMCHECK_MATRIX_V1,
        "tool_id": "1234",
        "name": "Example Tool",
        "decision_date": "06/30/2025",
        "table": {
            "year_header": [{ "text": "CY2025", "colspan": 4 }],
            "quarter_header": ["Q1", "Q2", "Q3", "Q4"],
            "rows": [
                ["10.x", "Authorized", "Authorized", "Authorized (DIVEST)", "Authorized (DIVEST)"],
                ["11.x", "Authorized", "Authorized", "Authorized", "Authorized"]
            ]
        }
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", trmcheck_types::schema::TRMCHECK_MATRIX_V1);
            println!("{}", trmcheck_types::schema::TRMCHECK_REPORT_V1);
        }
        Command::InitLayout { dir } => {
            for path in init_layout(&dir)? {
                println!("created {}", path.display());
            }
        }
        Command::Acceptance => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "trmcheck-bdd", "--test", "cucumber"])
                .status()
                .context("run cucumber suite")?;
            if !status.success() {
                anyhow::bail!("acceptance suite failed");
            }
        }
    }
    Ok(())
}

/// Writes the starter files under `dir`. Existing files are left untouched.
fn init_layout(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let matrices = dir.join("matrices");
    fs::create_dir_all(&matrices).with_context(|| format!("create {}", matrices.display()))?;

    let snapshot =
        serde_json::to_string_pretty(&sample_snapshot()).context("serialize sample snapshot")?;
    let files = [
        (dir.join("trm_usage.yml"), SAMPLE_INVENTORY.to_string()),
        (dir.join("trmcheck.toml"), SAMPLE_CONFIG.to_string()),
        (matrices.join("1234.json"), snapshot),
    ];

    let mut created = Vec::new();
    for (path, contents) in files {
        if path.exists() {
            eprintln!("skipping existing {}", path.display());
            continue;
        }
        fs::write(&path, contents)?;
        created.push(path);
    }
    Ok(created)
}
