//! Reconciliation reports.

use crate::requirements::platform::Platform;
use crate::requirements::status::{ActionOutcome, FinalStatus, ProbeResult};
use serde::Serialize;

/// What happened to one requirement during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_probe: Option<ProbeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_probe: Option<ProbeResult>,
    pub status: FinalStatus,
    /// One-line explanation: the latest probe detail, or why it was skipped.
    pub detail: String,
}

impl RequirementRecord {
    /// A record for a requirement that was never probed.
    pub fn skipped(id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initial_probe: None,
            action: None,
            final_probe: None,
            status: FinalStatus::Skipped,
            detail: detail.into(),
        }
    }
}

/// Per-status counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub satisfied: usize,
    pub remediated: usize,
    pub failed_soft: usize,
    pub failed_hard: usize,
    pub skipped: usize,
}

/// The accumulated result of one reconciliation run.
///
/// Built by the engine and immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    platform: Platform,
    dry_run: bool,
    cancelled: bool,
    records: Vec<RequirementRecord>,
}

impl ReconciliationReport {
    pub(crate) fn new(platform: Platform, dry_run: bool) -> Self {
        Self {
            platform,
            dry_run,
            cancelled: false,
            records: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, record: RequirementRecord) {
        self.records.push(record);
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// The platform the run was evaluated for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Whether remediation was disabled.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether the run was cancelled before every requirement was evaluated.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Records in evaluation order.
    pub fn records(&self) -> &[RequirementRecord] {
        &self.records
    }

    /// Look up the record for a requirement.
    pub fn get(&self, id: &str) -> Option<&RequirementRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Final status of a requirement, if it appears in the report.
    pub fn status_of(&self, id: &str) -> Option<FinalStatus> {
        self.get(id).map(|r| r.status)
    }

    /// Position of a requirement in the report.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Count records by status.
    pub fn summary(&self) -> ReportSummary {
        self.records
            .iter()
            .fold(ReportSummary::default(), |mut acc, r| {
                match r.status {
                    FinalStatus::Satisfied => acc.satisfied += 1,
                    FinalStatus::Remediated => acc.remediated += 1,
                    FinalStatus::FailedSoft => acc.failed_soft += 1,
                    FinalStatus::FailedHard => acc.failed_hard += 1,
                    FinalStatus::Skipped => acc.skipped += 1,
                }
                acc
            })
    }

    /// Whether any record ended failed-hard.
    pub fn has_hard_failure(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.status == FinalStatus::FailedHard)
    }

    /// Process exit code for this report: 1 on any hard failure, else 0.
    pub fn exit_code(&self) -> i32 {
        if self.has_hard_failure() {
            1
        } else {
            0
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
