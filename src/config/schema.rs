//! Configuration schema definitions for rigup.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format.

use crate::requirements::platform::{Platform, PlatformTarget};
use crate::runner::options::RunOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure for `.rigup/config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RigupConfig {
    /// Application name (for display purposes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Engine settings
    pub settings: Settings,

    /// Requirement definitions, in declaration order
    pub requirements: Vec<RequirementConfig>,
}

/// Engine settings. Unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    /// Abort remaining requirements after a hard failure (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_on_hard_fail: Option<bool>,

    /// Keep going after a soft failure (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_on_soft_fail: Option<bool>,

    /// Skip requirements whose dependencies are unmet (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_blocked_dependents: Option<bool>,

    /// Time limit for each probe command in seconds (default: 60)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_timeout_secs: Option<u64>,

    /// Time limit for each install command in seconds (default: 1800)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_timeout_secs: Option<u64>,
}

impl Settings {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn overlay(&self, other: &Settings) -> Settings {
        Settings {
            stop_on_hard_fail: other.stop_on_hard_fail.or(self.stop_on_hard_fail),
            continue_on_soft_fail: other.continue_on_soft_fail.or(self.continue_on_soft_fail),
            skip_blocked_dependents: other
                .skip_blocked_dependents
                .or(self.skip_blocked_dependents),
            probe_timeout_secs: other.probe_timeout_secs.or(self.probe_timeout_secs),
            install_timeout_secs: other.install_timeout_secs.or(self.install_timeout_secs),
        }
    }

    /// Engine options described by these settings.
    pub fn run_options(&self) -> RunOptions {
        let defaults = RunOptions::default();
        RunOptions {
            dry_run: false,
            stop_on_hard_fail: self.stop_on_hard_fail.unwrap_or(defaults.stop_on_hard_fail),
            continue_on_soft_fail: self
                .continue_on_soft_fail
                .unwrap_or(defaults.continue_on_soft_fail),
            skip_blocked_dependents: self
                .skip_blocked_dependents
                .unwrap_or(defaults.skip_blocked_dependents),
        }
    }

    /// Time limit for probe commands.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.unwrap_or(60))
    }

    /// Time limit for install commands.
    pub fn install_timeout(&self) -> Duration {
        Duration::from_secs(self.install_timeout_secs.unwrap_or(1800))
    }
}

/// A requirement definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RequirementConfig {
    /// Stable requirement id
    pub id: String,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Platforms this requirement applies to (default: [any])
    #[serde(default = "default_applies_to")]
    pub applies_to: Vec<PlatformTarget>,

    /// Requirements evaluated before this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Abort the run when this stays unmet
    #[serde(default, skip_serializing_if = "is_false")]
    pub hard_fail: bool,

    /// How to check the requirement
    pub check: CheckConfig,

    /// How to install the requirement
    #[serde(default)]
    pub install: InstallConfig,
}

fn default_applies_to() -> Vec<PlatformTarget> {
    vec![PlatformTarget::Any]
}

fn is_false(v: &bool) -> bool {
    !v
}

/// Check type for a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckConfig {
    /// The command exits with code 0
    CommandSucceeds {
        /// Command to run
        command: String,
    },

    /// The command prints a version at least `minimum`
    VersionAtLeast {
        /// Command whose output contains the version
        command: String,
        /// Minimum version, e.g. "18" or "1.2.1"
        minimum: String,
        /// Regex with one capture group for the version
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },

    /// The command's stdout contains `needle`
    OutputContains {
        /// Command to run
        command: String,
        /// Text that must appear in stdout
        needle: String,
    },

    /// A file or directory exists; `${VAR}` is expanded from the environment
    FileExists {
        /// Path to check
        path: String,
    },

    /// Total physical memory is at least `gib` GiB
    MemoryAtLeast {
        /// Minimum memory in GiB
        gib: f64,
    },

    /// Free disk space is at least `gib` GiB
    DiskSpaceAtLeast {
        /// Minimum free space in GiB
        gib: f64,
        /// Path on the volume to measure (default: current directory)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
}

/// Install commands per platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InstallConfig {
    /// Command to run on Windows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<String>,

    /// Command to run on macOS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macos: Option<String>,

    /// Command to run when no platform-specific command is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any: Option<String>,
}

impl InstallConfig {
    /// The command to run on `platform`, preferring the platform-specific one.
    pub fn command_for(&self, platform: Platform) -> Option<&str> {
        let specific = match platform {
            Platform::Windows => self.windows.as_deref(),
            Platform::MacOS => self.macos.as_deref(),
            Platform::Unsupported => None,
        };
        specific.or(self.any.as_deref())
    }
}
