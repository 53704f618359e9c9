//! Platform tags for requirement resolution.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The platform a run is evaluated for.
///
/// Supplied by the caller so the engine can be exercised without the real
/// operating system. [`Platform::detect`] is the CLI's source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    #[serde(rename = "macos")]
    MacOS,
    Unsupported,
}

impl Platform {
    /// Detect the current platform.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else {
            Platform::Unsupported
        }
    }

    /// Stable lowercase name, as used in config and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(Platform::Windows),
            "macos" | "mac" | "darwin" => Ok(Platform::MacOS),
            "unsupported" => Ok(Platform::Unsupported),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

/// A platform a requirement can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTarget {
    Windows,
    #[serde(rename = "macos")]
    MacOS,
    Any,
}

impl PlatformTarget {
    /// Whether this target covers the given platform.
    ///
    /// `Any` covers every platform, including `Unsupported`.
    pub fn covers(&self, platform: Platform) -> bool {
        match self {
            PlatformTarget::Any => true,
            PlatformTarget::Windows => platform == Platform::Windows,
            PlatformTarget::MacOS => platform == Platform::MacOS,
        }
    }
}
