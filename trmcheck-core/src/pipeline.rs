//! Core scan pipeline, extracted from the CLI.
//!
//! The entry points are I/O-agnostic: inventories, snapshots and artifact
//! writes all go through the port traits.

use crate::ports::{InventorySource, LoadedInventory, MatrixSource, WritePort};
use crate::settings::{RunMode, ScanSettings};
use anyhow::Context;
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use trmcheck_domain::{MatrixSet, Resolver};
use trmcheck_matrix::LoadedMatrix;
use trmcheck_types::report::{
    InputFailure, InputRef, ReportArtifacts, ReportCapabilities, ReportCounts, ReportFinding,
    ReportRunInfo, ReportSeverity, ReportStatus, ReportToolInfo, ReportVerdict, TrmcheckReport,
};
use trmcheck_types::result::{ResolutionRecord, StatusCode};

pub const RESULTS_FILE: &str = "results.json";
pub const REPORT_FILE: &str = "report.json";

/// Error type for pipeline results.  Exit code 2 = policy block, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("policy block")]
    PolicyBlock,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of `run_scan`.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub records: Vec<ResolutionRecord>,
    pub report: TrmcheckReport,
    /// True when some entry's status is in `fail_on` and the run is not advisory.
    pub policy_block: bool,
}

/// Run the scan pipeline: load inputs, resolve every tracked entry, build the report.
///
/// The caller is responsible for writing artifacts to disk (via `WritePort`)
/// or the convenience `write_scan_artifacts` helper.
pub fn run_scan(
    settings: &ScanSettings,
    inventory_port: &dyn InventorySource,
    matrix_port: &dyn MatrixSource,
    tool: ReportToolInfo,
) -> Result<ScanOutcome, ToolError> {
    let started_at = Utc::now();

    let inventory = inventory_port.load_inventory()?;
    let matrices = matrix_port.load_matrices()?;
    let set = matrix_set(&matrices);

    let quarter = settings.target_quarter();
    let resolver = Resolver::new(quarter, settings.columns);
    info!(
        quarter = %resolver.label(),
        entries = inventory.inventory.trm_entries.len(),
        matrices = set.len(),
        "starting scan"
    );

    let records = resolver.resolve_all(&inventory.inventory.trm_entries, &set);

    let failing = records
        .iter()
        .any(|r| settings.fails_on(r.status.code()));
    let policy_block = failing && settings.mode == RunMode::Standalone;

    let run = run_info(started_at, Utc::now(), resolver.label());
    let report = report_from_records(settings, &records, &inventory, &matrices, tool, run);

    Ok(ScanOutcome {
        records,
        report,
        policy_block,
    })
}

/// Write `results.json` and `report.json` to the output directory.
pub fn write_scan_artifacts(
    outcome: &ScanOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let results_json =
        serde_json::to_string_pretty(&outcome.records).context("serialize results")?;
    writer.write_file(&out_dir.join(RESULTS_FILE), results_json.as_bytes())?;

    let report_json = serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join(REPORT_FILE), report_json.as_bytes())?;

    debug!(out_dir = %out_dir, "wrote scan artifacts");
    Ok(())
}

fn matrix_set(matrices: &[LoadedMatrix]) -> MatrixSet {
    let mut set = MatrixSet::new();
    for loaded in matrices {
        let Ok(matrix) = &loaded.matrix else {
            continue;
        };
        if set.insert(matrix.clone()).is_some() {
            warn!(
                path = %loaded.path,
                tool_id = %matrix.tool_id,
                "duplicate snapshot for tool; keeping the later file"
            );
        }
    }
    set
}

fn run_info(started_at: DateTime<Utc>, ended_at: DateTime<Utc>, quarter: &str) -> ReportRunInfo {
    let duration_ms = (ended_at - started_at).num_milliseconds().max(0) as u64;
    ReportRunInfo {
        started_at: started_at.to_rfc3339(),
        ended_at: Some(ended_at.to_rfc3339()),
        duration_ms: Some(duration_ms),
        quarter: quarter.to_string(),
    }
}

pub(crate) fn report_from_records(
    settings: &ScanSettings,
    records: &[ResolutionRecord],
    inventory: &LoadedInventory,
    matrices: &[LoadedMatrix],
    tool: ReportToolInfo,
    run: ReportRunInfo,
) -> TrmcheckReport {
    let capabilities = build_capabilities(inventory, matrices);
    let has_failed_inputs = !capabilities.inputs_failed.is_empty();

    let mut counts = ReportCounts::default();
    for record in records {
        counts.record(record.status.code());
    }

    let failing: Vec<StatusCode> = StatusCode::ALL
        .into_iter()
        .filter(|code| settings.fails_on(*code) && count_of(&counts, *code) > 0)
        .collect();
    let non_compliant = counts.entries > counts.in_compliance;

    let status = if records.is_empty() {
        ReportStatus::Skip
    } else if !failing.is_empty() {
        ReportStatus::Fail
    } else if non_compliant || has_failed_inputs {
        ReportStatus::Warn
    } else {
        ReportStatus::Pass
    };

    let mut reasons = Vec::new();
    if records.is_empty() {
        reasons.push("no_entries".to_string());
    }
    reasons.extend(failing.iter().map(|code| code.as_str().to_string()));
    if has_failed_inputs {
        reasons.push("partial_inputs".to_string());
    }

    let mut findings: Vec<ReportFinding> = Vec::new();
    for failure in &capabilities.inputs_failed {
        findings.push(ReportFinding {
            severity: ReportSeverity::Warn,
            code: "matrix_load_failed".to_string(),
            message: format!(
                "Decision matrix failed to load: {} ({})",
                failure.path, failure.reason
            ),
            tool_id: None,
            next_approved_version: None,
            fingerprint: Some(format!("inputs/matrix_load_failed/{}", failure.path)),
        });
    }
    findings.extend(
        records
            .iter()
            .filter(|r| !r.status.is_compliant())
            .map(|r| finding_for(settings, r)),
    );

    TrmcheckReport {
        schema: trmcheck_types::schema::TRMCHECK_REPORT_V1.to_string(),
        tool,
        run,
        verdict: ReportVerdict {
            status,
            counts,
            reasons,
        },
        findings,
        capabilities: Some(capabilities),
        artifacts: Some(ReportArtifacts {
            results: Some(RESULTS_FILE.to_string()),
        }),
    }
}

fn count_of(counts: &ReportCounts, code: StatusCode) -> u64 {
    match code {
        StatusCode::InCompliance => counts.in_compliance,
        StatusCode::InDivest => counts.in_divest,
        StatusCode::DecisionMismatch => counts.decision_mismatch,
        StatusCode::Unapproved => counts.unapproved,
    }
}

fn finding_for(settings: &ScanSettings, record: &ResolutionRecord) -> ReportFinding {
    let code = record.status.code();
    let severity = if settings.fails_on(code) {
        ReportSeverity::Error
    } else {
        ReportSeverity::Warn
    };

    let mut message = format!(
        "{} {}: {} in {} (decision: {})",
        record.tool_id, record.tracked_version, record.status, record.quarter, record.decision
    );
    if let Some(next) = &record.next_approved_version {
        message.push_str(&format!("; next approved version: {next}"));
    }

    ReportFinding {
        severity,
        code: code.as_str().to_string(),
        message,
        tool_id: Some(record.tool_id.clone()),
        next_approved_version: record.next_approved_version.clone(),
        fingerprint: Some(format!(
            "{}/{}/{}",
            code.as_str(),
            record.tool_id,
            record.tracked_version
        )),
    }
}

fn build_capabilities(inventory: &LoadedInventory, matrices: &[LoadedMatrix]) -> ReportCapabilities {
    let mut inputs_available = vec![InputRef {
        path: inventory.path.to_string(),
        sha256: inventory.sha256.clone(),
    }];
    let mut inputs_failed = Vec::new();

    for m in matrices {
        match &m.matrix {
            Ok(_) => inputs_available.push(InputRef {
                path: m.path.to_string(),
                sha256: m.sha256.clone(),
            }),
            Err(e) => inputs_failed.push(InputFailure {
                path: m.path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    ReportCapabilities {
        partial: !inputs_failed.is_empty(),
        inputs_available,
        inputs_failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryInventorySource, InMemoryMatrixSource};
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;
    use trmcheck_domain::Quarter;
    use trmcheck_matrix::MatrixLoadError;
    use trmcheck_types::inventory::{Inventory, TrackedEntry};
    use trmcheck_types::matrix::{DecisionMatrix, ToolMatrix, VersionRow};
    use trmcheck_types::result::Status;

    fn tool() -> ReportToolInfo {
        ReportToolInfo {
            name: "trmcheck".to_string(),
            version: "0.0.0".to_string(),
        }
    }

    fn settings() -> ScanSettings {
        ScanSettings {
            quarter: Some(Quarter::new(2025, 3).unwrap()),
            ..ScanSettings::default()
        }
    }

    fn loaded(tool_id: &str, rows: &[(&str, &str)]) -> LoadedMatrix {
        let rows = rows
            .iter()
            .map(|(v, d)| VersionRow::from_cells(vec![v.to_string(), d.to_string()]))
            .collect();
        let matrix = ToolMatrix::new(
            tool_id,
            DecisionMatrix::new(vec!["CY2025 Q3".to_string()], rows),
        );
        LoadedMatrix {
            path: Utf8PathBuf::from(format!("matrices/{tool_id}.json")),
            tool_id: tool_id.to_string(),
            sha256: Some("00".repeat(32)),
            matrix: Ok(matrix),
        }
    }

    fn inventory(entries: Vec<TrackedEntry>) -> InMemoryInventorySource {
        InMemoryInventorySource::new(Inventory {
            trm_base_url: None,
            trm_entries: entries,
        })
    }

    fn header_settings() -> ScanSettings {
        ScanSettings {
            columns: trmcheck_domain::ColumnStrategy::Header,
            ..settings()
        }
    }

    #[test]
    fn all_compliant_passes() {
        let outcome = run_scan(
            &header_settings(),
            &inventory(vec![TrackedEntry::new("1", "1.0", "Authorized")]),
            &InMemoryMatrixSource::new(vec![loaded("1", &[("1.0", "Authorized")])]),
            tool(),
        )
        .unwrap();

        assert!(!outcome.policy_block);
        assert_eq!(outcome.records[0].status, Status::InCompliance);
        assert_eq!(outcome.report.verdict.status, ReportStatus::Pass);
        assert_eq!(outcome.report.verdict.counts.in_compliance, 1);
        assert!(outcome.report.findings.is_empty());
        assert_eq!(outcome.report.run.quarter, "CY2025 Q3");
        assert!(outcome.report.run.ended_at.is_some());
    }

    #[test]
    fn divest_blocks_in_standalone_mode() {
        let matrices = InMemoryMatrixSource::new(vec![loaded(
            "1",
            &[("1.0", "DIVEST"), ("2.0", "Authorized")],
        )]);
        let inv = inventory(vec![TrackedEntry::new("1", "1.0", "Authorized")]);

        let outcome = run_scan(&header_settings(), &inv, &matrices, tool()).unwrap();
        assert!(outcome.policy_block);
        assert_eq!(outcome.report.verdict.status, ReportStatus::Fail);
        assert_eq!(outcome.report.verdict.reasons, vec!["in_divest".to_string()]);

        let finding = &outcome.report.findings[0];
        assert_eq!(finding.severity, ReportSeverity::Error);
        assert_eq!(finding.code, "in_divest");
        assert_eq!(finding.next_approved_version.as_deref(), Some("2.0"));
        assert_eq!(finding.fingerprint.as_deref(), Some("in_divest/1/1.0"));

        let advisory = ScanSettings {
            mode: RunMode::Advisory,
            ..header_settings()
        };
        let outcome = run_scan(&advisory, &inv, &matrices, tool()).unwrap();
        assert!(!outcome.policy_block);
        assert_eq!(outcome.report.verdict.status, ReportStatus::Fail);
    }

    #[test]
    fn statuses_outside_fail_on_only_warn() {
        let settings = ScanSettings {
            fail_on: vec![StatusCode::Unapproved],
            ..header_settings()
        };
        let outcome = run_scan(
            &settings,
            &inventory(vec![TrackedEntry::new("1", "1.0", "Authorized")]),
            &InMemoryMatrixSource::new(vec![loaded("1", &[("1.0", "Authorized [1]")])]),
            tool(),
        )
        .unwrap();

        assert!(!outcome.policy_block);
        assert!(matches!(outcome.records[0].status, Status::Mismatch { .. }));
        assert_eq!(outcome.report.verdict.status, ReportStatus::Warn);
        assert_eq!(outcome.report.findings[0].severity, ReportSeverity::Warn);
    }

    #[test]
    fn failed_matrices_are_reported_as_partial() {
        let bad = LoadedMatrix {
            path: Utf8PathBuf::from("matrices/bad.json"),
            tool_id: "bad".to_string(),
            sha256: None,
            matrix: Err(MatrixLoadError::Json {
                message: "eof".to_string(),
            }),
        };
        let outcome = run_scan(
            &header_settings(),
            &inventory(vec![TrackedEntry::new("1", "1.0", "Authorized")]),
            &InMemoryMatrixSource::new(vec![loaded("1", &[("1.0", "Authorized")]), bad]),
            tool(),
        )
        .unwrap();

        let caps = outcome.report.capabilities.as_ref().unwrap();
        assert!(caps.partial);
        assert_eq!(caps.inputs_failed.len(), 1);
        assert_eq!(caps.inputs_available.len(), 2);
        assert_eq!(outcome.report.verdict.status, ReportStatus::Warn);
        assert_eq!(outcome.report.verdict.reasons, vec!["partial_inputs".to_string()]);
        assert_eq!(outcome.report.findings[0].code, "matrix_load_failed");
    }

    #[test]
    fn empty_inventory_is_skip() {
        let outcome = run_scan(
            &settings(),
            &inventory(vec![]),
            &InMemoryMatrixSource::new(vec![]),
            tool(),
        )
        .unwrap();
        assert_eq!(outcome.report.verdict.status, ReportStatus::Skip);
        assert!(!outcome.policy_block);
    }

    #[test]
    fn write_artifacts_round_trip() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out_dir = Utf8PathBuf::from_path_buf(temp.path().join("out")).expect("utf8");
        let outcome = run_scan(
            &settings(),
            &inventory(vec![TrackedEntry::new("9", "1.0", "Authorized")]),
            &InMemoryMatrixSource::new(vec![]),
            tool(),
        )
        .unwrap();

        write_scan_artifacts(&outcome, &out_dir, &crate::adapters::FsWritePort).unwrap();

        let results: Vec<ResolutionRecord> =
            serde_json::from_str(&std::fs::read_to_string(out_dir.join(RESULTS_FILE)).unwrap())
                .unwrap();
        assert_eq!(results, outcome.records);
        assert_eq!(results[0].note.as_deref(), Some("no decision matrix for tool"));

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out_dir.join(REPORT_FILE)).unwrap())
                .unwrap();
        assert_eq!(report["schema"], "trmcheck.report.v1");
        assert_eq!(report["verdict"]["status"], "fail");
        assert_eq!(report["artifacts"]["results"], "results.json");
    }
}
