//! Requirement status types.
//!
//! A probe produces a [`ProbeResult`], an install attempt produces an
//! [`ActionOutcome`], and the engine settles each requirement on a
//! [`FinalStatus`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of checking one requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Whether the requirement is currently met.
    pub satisfied: bool,
    /// Version string, measured value, or failure reason.
    pub detail: String,
    /// Measured quantity for threshold requirements (bytes, major version).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measured_value: Option<f64>,
}

impl ProbeResult {
    /// A satisfied probe.
    pub fn satisfied(detail: impl Into<String>) -> Self {
        Self {
            satisfied: true,
            detail: detail.into(),
            measured_value: None,
        }
    }

    /// An unsatisfied probe.
    pub fn unsatisfied(detail: impl Into<String>) -> Self {
        Self {
            satisfied: false,
            detail: detail.into(),
            measured_value: None,
        }
    }

    /// Attach a measured value.
    pub fn with_measured(mut self, value: f64) -> Self {
        self.measured_value = Some(value);
        self
    }
}

/// The outcome of attempting remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Whether anything was actually run.
    pub attempted: bool,
    /// The installer's own view of success. Never authoritative.
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ActionOutcome {
    /// The installer ran and reported success.
    pub fn succeeded() -> Self {
        Self {
            attempted: true,
            succeeded: true,
            error_detail: None,
        }
    }

    /// The installer ran and reported failure.
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            attempted: true,
            succeeded: false,
            error_detail: Some(detail.into()),
        }
    }

    /// There was no remediation to run for this platform.
    pub fn not_attempted(reason: impl Into<String>) -> Self {
        Self {
            attempted: false,
            succeeded: false,
            error_detail: Some(reason.into()),
        }
    }
}

/// Where a requirement ended up after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalStatus {
    /// Already met; nothing was installed.
    Satisfied,
    /// Unmet at first, met after installing.
    Remediated,
    /// Unmet; the run continues.
    FailedSoft,
    /// Unmet on a hard-fail requirement.
    FailedHard,
    /// Not evaluated (wrong platform, aborted, cancelled, or blocked).
    Skipped,
}

impl FinalStatus {
    /// Whether the requirement was evaluated and left unmet.
    pub fn is_failure(&self) -> bool {
        matches!(self, FinalStatus::FailedSoft | FinalStatus::FailedHard)
    }

    /// Stable name, as used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalStatus::Satisfied => "satisfied",
            FinalStatus::Remediated => "remediated",
            FinalStatus::FailedSoft => "failed-soft",
            FinalStatus::FailedHard => "failed-hard",
            FinalStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
