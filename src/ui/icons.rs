//! Status vocabulary for requirement output.
//!
//! `StatusKind` maps final statuses onto one set of icons and colors so
//! live progress and the final summary agree.

use super::theme::RigupTheme;
use crate::requirements::status::FinalStatus;

/// Canonical status kinds used across rigup output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Already met.
    Success,
    /// Met after installing.
    Fixed,
    /// Unmet, run continued.
    Warning,
    /// Unmet on a hard-fail requirement.
    Failed,
    /// Not evaluated.
    Skipped,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Fixed => "↻",
            Self::Warning => "⚠",
            Self::Failed => "✗",
            Self::Skipped => "○",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Fixed => "[fixed]",
            Self::Warning => "[warn]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &RigupTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success | Self::Fixed => theme.success.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped => theme.dim.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &RigupTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }
}

impl From<FinalStatus> for StatusKind {
    fn from(status: FinalStatus) -> Self {
        match status {
            FinalStatus::Satisfied => Self::Success,
            FinalStatus::Remediated => Self::Fixed,
            FinalStatus::FailedSoft => Self::Warning,
            FinalStatus::FailedHard => Self::Failed,
            FinalStatus::Skipped => Self::Skipped,
        }
    }
}
