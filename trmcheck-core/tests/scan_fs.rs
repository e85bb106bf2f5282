//! End-to-end scan over on-disk fixtures.

use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use trmcheck_core::adapters::{FsInventorySource, FsMatrixSource, FsWritePort};
use trmcheck_core::pipeline::{REPORT_FILE, RESULTS_FILE, run_scan, write_scan_artifacts};
use trmcheck_core::settings::ScanSettings;
use trmcheck_core::{ColumnStrategy, Quarter};
use trmcheck_types::report::{ReportStatus, ReportToolInfo};
use trmcheck_types::result::{ResolutionRecord, Status};

const INVENTORY: &str = r#"
trm_base_url: https://trm.example.invalid/ToolPage.aspx
trm_entries:
  - tid: 100
    version: "1.0"
    decision: "Authorized"
  - tid: 200
    version: "Win 10.x"
    decision: "Authorized"
  - tid: 300
    version: "4.2"
    decision: "Authorized"
"#;

const MATRIX_100: &str = r#"{
    "tool_id": "100",
    "name": "Alpha",
    "decision_date": "06/30/2025",
    "table": {
        "year_header": [{ "text": "CY2025", "colspan": 2 }],
        "quarter_header": ["Q2", "Q3"],
        "rows": [
            ["1.0", "Authorized", "Authorized"],
            ["2.0", "Authorized", "Authorized"]
        ]
    }
}"#;

const MATRIX_200: &str = r#"{
    "table": {
        "columns": ["CY2025 Q2", "CY2025 Q3"],
        "rows": [
            ["Win 10", "Authorized", "Authorized (DIVEST)"],
            ["Win 11", "Authorized", "Authorized"]
        ]
    }
}"#;

struct Fixture {
    _temp: TempDir,
    root: Utf8PathBuf,
}

fn fixture() -> Fixture {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
    fs::write(root.join("trm_usage.yml"), INVENTORY).unwrap();
    fs::create_dir_all(root.join("matrices")).unwrap();
    fs::write(root.join("matrices/100.json"), MATRIX_100).unwrap();
    fs::write(root.join("matrices/200.json"), MATRIX_200).unwrap();
    fs::write(root.join("matrices/broken.json"), "[").unwrap();
    Fixture { _temp: temp, root }
}

#[test]
fn scan_resolves_and_writes_artifacts() {
    let fx = fixture();
    let settings = ScanSettings {
        inventory: fx.root.join("trm_usage.yml"),
        matrices_dir: fx.root.join("matrices"),
        out_dir: fx.root.join("out"),
        quarter: Some(Quarter::new(2025, 3).unwrap()),
        columns: ColumnStrategy::Header,
        ..ScanSettings::default()
    };

    let outcome = run_scan(
        &settings,
        &FsInventorySource::new(settings.inventory.clone()),
        &FsMatrixSource::new(settings.matrices_dir.clone()),
        ReportToolInfo {
            name: "trmcheck".to_string(),
            version: "test".to_string(),
        },
    )
    .expect("scan");

    let statuses: Vec<&Status> = outcome.records.iter().map(|r| &r.status).collect();
    assert_eq!(
        statuses,
        vec![&Status::InCompliance, &Status::InDivest, &Status::Unapproved]
    );

    let alpha = &outcome.records[0];
    assert_eq!(alpha.name.as_deref(), Some("Alpha"));
    assert_eq!(alpha.decision_date.as_deref(), Some("06/30/2025"));
    assert_eq!(alpha.next_approved_version, None);

    let win = &outcome.records[1];
    assert_eq!(win.matched_version.as_deref(), Some("Win 10"));
    assert_eq!(win.next_approved_version.as_deref(), Some("Win 11"));

    assert!(outcome.policy_block);
    assert_eq!(outcome.report.verdict.status, ReportStatus::Fail);
    let caps = outcome.report.capabilities.as_ref().unwrap();
    assert!(caps.partial);
    assert_eq!(caps.inputs_failed.len(), 1);
    assert!(caps.inputs_available.iter().all(|i| i.sha256.is_some()));

    write_scan_artifacts(&outcome, &settings.out_dir, &FsWritePort).expect("write");
    let results: Vec<ResolutionRecord> =
        serde_json::from_str(&fs::read_to_string(settings.out_dir.join(RESULTS_FILE)).unwrap())
            .unwrap();
    assert_eq!(results.len(), 3);
    assert!(settings.out_dir.join(REPORT_FILE).exists());
}

#[test]
fn missing_inventory_is_tool_error() {
    let fx = fixture();
    let err = run_scan(
        &ScanSettings::default(),
        &FsInventorySource::new(fx.root.join("absent.yml")),
        &FsMatrixSource::new(fx.root.join("matrices")),
        ReportToolInfo {
            name: "trmcheck".to_string(),
            version: "test".to_string(),
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("read inventory"));
}
