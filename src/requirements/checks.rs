//! Declarative checks evaluated against the real machine.
//!
//! Each [`CheckConfig`] is turned into a [`ProbeResult`]. Checks only read
//! state: they run version commands, look at files, and measure memory and
//! disk space.

use crate::config::schema::CheckConfig;
use crate::error::{Result, RigupError};
use crate::requirements::status::ProbeResult;
use crate::shell::{execute, CommandOptions, CommandResult};
use crate::sys;
use regex::Regex;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)*)").expect("version regex is valid"));

static ENV_VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex is valid"));

/// A dotted numeric version, compared component by component.
///
/// Missing trailing components count as zero, so `18` equals `18.0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(Vec<u64>);

impl Version {
    /// Parse the first dotted number found in `text`.
    pub fn parse(text: &str) -> Option<Self> {
        let found = VERSION_REGEX.find(text)?;
        Self::from_dotted(found.as_str())
    }

    /// Parse using a pattern whose first capture group holds the version.
    pub fn parse_with(pattern: &Regex, text: &str) -> Option<Self> {
        let captured = pattern.captures(text)?.get(1)?;
        Self::parse(captured.as_str())
    }

    /// Components are all digits here; one too large for `u64` saturates.
    fn from_dotted(text: &str) -> Option<Self> {
        let parts: Vec<u64> = text
            .split('.')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<u64>().unwrap_or(u64::MAX))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(Self(parts))
        }
    }

    /// The leading component.
    pub fn major(&self) -> u64 {
        self.0.first().copied().unwrap_or(0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| {
                let a = self.0.get(i).copied().unwrap_or(0);
                let b = other.0.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// Expand `${VAR}` references from the process environment.
///
/// Fails naming the first variable that is not set.
pub fn expand_env(text: &str) -> std::result::Result<String, String> {
    expand_env_with(text, |name| std::env::var(name).ok())
}

fn expand_env_with<F>(text: &str, lookup: F) -> std::result::Result<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = None;
    let expanded = ENV_VAR_REGEX.replace_all(text, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        lookup(name).unwrap_or_else(|| {
            missing.get_or_insert_with(|| name.to_string());
            String::new()
        })
    });

    match missing {
        Some(name) => Err(name),
        None => Ok(expanded.into_owned()),
    }
}

/// Evaluates checks with a fixed command time limit.
#[derive(Debug, Clone)]
pub struct CheckRunner {
    options: CommandOptions,
}

impl CheckRunner {
    /// Create a runner whose commands are killed after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            options: CommandOptions::with_timeout(timeout),
        }
    }

    /// Evaluate one check.
    ///
    /// Returns `Err` only when the state could not be determined at all
    /// (command could not start, timed out, measurement failed).
    pub fn evaluate(&self, check: &CheckConfig) -> Result<ProbeResult> {
        match check {
            CheckConfig::CommandSucceeds { command } => {
                let result = execute(command, &self.options)?;
                if result.success {
                    Ok(ProbeResult::satisfied(
                        result.first_line().unwrap_or("ok").to_string(),
                    ))
                } else {
                    Ok(ProbeResult::unsatisfied(exit_detail(command, &result)))
                }
            }
            CheckConfig::VersionAtLeast {
                command,
                minimum,
                pattern,
            } => self.version_at_least(command, minimum, pattern.as_deref()),
            CheckConfig::OutputContains { command, needle } => {
                let result = execute(command, &self.options)?;
                if !result.success {
                    return Ok(ProbeResult::unsatisfied(exit_detail(command, &result)));
                }
                let summary = result.stdout.split_whitespace().collect::<Vec<_>>().join(" ");
                if result.stdout.contains(needle.as_str()) {
                    Ok(ProbeResult::satisfied(summary))
                } else {
                    Ok(ProbeResult::unsatisfied(format!(
                        "'{}' not found in output: {}",
                        needle, summary
                    )))
                }
            }
            CheckConfig::FileExists { path } => Ok(file_exists(path)),
            CheckConfig::MemoryAtLeast { gib } => {
                let total = sys::total_memory_bytes()?;
                Ok(threshold("total memory", total, *gib))
            }
            CheckConfig::DiskSpaceAtLeast { gib, path } => {
                let target = match path {
                    Some(p) => PathBuf::from(expand_env(p).map_err(|name| {
                        RigupError::Other(anyhow::anyhow!("environment variable {} is not set", name))
                    })?),
                    None => std::env::current_dir()?,
                };
                let free = sys::free_disk_bytes(&target)?;
                Ok(threshold("free disk space", free, *gib))
            }
        }
    }

    fn version_at_least(
        &self,
        command: &str,
        minimum: &str,
        pattern: Option<&str>,
    ) -> Result<ProbeResult> {
        let minimum = Version::parse(minimum).ok_or_else(|| {
            RigupError::ConfigValidationError {
                message: format!("unparseable minimum version '{}'", minimum),
            }
        })?;

        let result = execute(command, &self.options)?;
        if !result.success {
            return Ok(ProbeResult::unsatisfied(exit_detail(command, &result)));
        }

        let output = format!("{}\n{}", result.stdout, result.stderr);
        let found = match pattern {
            Some(p) => {
                let re = Regex::new(p).map_err(|e| RigupError::ConfigValidationError {
                    message: format!("invalid version pattern '{}': {}", p, e),
                })?;
                Version::parse_with(&re, &output)
            }
            None => Version::parse(&output),
        };

        let Some(found) = found else {
            return Ok(ProbeResult::unsatisfied(format!(
                "no version found in output of '{}'",
                command
            )));
        };

        let measured = found.major() as f64;
        if found >= minimum {
            Ok(ProbeResult::satisfied(format!("{} (>= {})", found, minimum)).with_measured(measured))
        } else {
            Ok(ProbeResult::unsatisfied(format!(
                "{} is older than required {}",
                found, minimum
            ))
            .with_measured(measured))
        }
    }
}

fn exit_detail(command: &str, result: &CommandResult) -> String {
    let code = result
        .exit_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    match result.first_line() {
        Some(line) => format!("'{}' exited with {}: {}", command, code, line),
        None => format!("'{}' exited with {}", command, code),
    }
}

fn file_exists(path: &str) -> ProbeResult {
    match expand_env(path) {
        Ok(expanded) => {
            if Path::new(&expanded).exists() {
                ProbeResult::satisfied(format!("found {}", expanded))
            } else {
                ProbeResult::unsatisfied(format!("{} not found", expanded))
            }
        }
        Err(name) => ProbeResult::unsatisfied(format!("environment variable {} is not set", name)),
    }
}

fn threshold(what: &str, bytes: u64, gib: f64) -> ProbeResult {
    let needed = gib * sys::GIB;
    let detail = format!("{} {} (need {} GiB)", what, sys::format_gib(bytes), gib);
    let result = if bytes as f64 >= needed {
        ProbeResult::satisfied(detail)
    } else {
        ProbeResult::unsatisfied(detail)
    };
    result.with_measured(bytes as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn runner() -> CheckRunner {
        CheckRunner::new(Duration::from_secs(30))
    }

    #[test]
    fn version_parses_first_dotted_number() {
        assert_eq!(Version::parse("v20.11.1").unwrap().to_string(), "20.11.1");
        assert_eq!(
            Version::parse("git version 2.39.2 (Apple Git-143)")
                .unwrap()
                .to_string(),
            "2.39.2"
        );
        assert!(Version::parse("not installed").is_none());
    }

    #[test]
    fn version_comparison_pads_with_zeros() {
        let v = |s| Version::parse(s).unwrap();
        assert!(v("18") <= v("18.0.0"));
        assert!(v("18.0.0") <= v("18"));
        assert!(v("1.2.1") > v("1.2"));
        assert!(v("1.10") > v("1.9"));
        assert!(v("16.20.2") < v("18"));
        assert_eq!(v("20.1").major(), 20);
    }

    #[test]
    fn oversized_component_still_compares() {
        let stamped = Version::parse("tool 2.4.20240101123456789012").unwrap();
        assert_eq!(stamped.major(), 2);
        assert!(stamped >= Version::parse("2.4.1").unwrap());
        assert!(stamped < Version::parse("3").unwrap());
    }

    #[test]
    fn version_parse_with_pattern_uses_group() {
        let re = Regex::new(r"FileVersion: (\S+)").unwrap();
        let found = Version::parse_with(&re, "Build 7\nFileVersion: 1.2.1\n").unwrap();
        assert_eq!(found.to_string(), "1.2.1");
    }

    #[test]
    fn expand_env_replaces_and_reports_missing() {
        let lookup = |name: &str| match name {
            "ProgramFiles(x86)" => Some("C:/Program Files (x86)".to_string()),
            _ => None,
        };
        assert_eq!(
            expand_env_with("${ProgramFiles(x86)}/WinAppDriver.exe", lookup).unwrap(),
            "C:/Program Files (x86)/WinAppDriver.exe"
        );
        assert_eq!(
            expand_env_with("${NOPE}/x", lookup).unwrap_err(),
            "NOPE".to_string()
        );
        assert_eq!(expand_env_with("plain/path", lookup).unwrap(), "plain/path");
    }

    #[test]
    fn command_succeeds_reports_first_line() {
        let probe = runner()
            .evaluate(&CheckConfig::CommandSucceeds {
                command: "echo tool 1.0".to_string(),
            })
            .unwrap();
        assert!(probe.satisfied);
        assert_eq!(probe.detail, "tool 1.0");
    }

    #[test]
    fn command_failure_is_unsatisfied_not_error() {
        let probe = runner()
            .evaluate(&CheckConfig::CommandSucceeds {
                command: "exit 2".to_string(),
            })
            .unwrap();
        assert!(!probe.satisfied);
        assert!(probe.detail.contains("exited with 2"));
    }

    #[test]
    fn version_at_least_compares_output() {
        let new_enough = runner()
            .evaluate(&CheckConfig::VersionAtLeast {
                command: "echo v20.11.0".to_string(),
                minimum: "18".to_string(),
                pattern: None,
            })
            .unwrap();
        assert!(new_enough.satisfied);
        assert_eq!(new_enough.measured_value, Some(20.0));

        let too_old = runner()
            .evaluate(&CheckConfig::VersionAtLeast {
                command: "echo v16.20.2".to_string(),
                minimum: "18".to_string(),
                pattern: None,
            })
            .unwrap();
        assert!(!too_old.satisfied);
        assert!(too_old.detail.contains("older than required 18"));
    }

    #[test]
    fn version_missing_from_output_is_unsatisfied() {
        let probe = runner()
            .evaluate(&CheckConfig::VersionAtLeast {
                command: "echo unknown".to_string(),
                minimum: "1".to_string(),
                pattern: None,
            })
            .unwrap();
        assert!(!probe.satisfied);
    }

    #[test]
    fn output_contains_matches_needle() {
        let check = |needle: &str| {
            runner()
                .evaluate(&CheckConfig::OutputContains {
                    command: "echo 6.0.419 && echo 8.0.100".to_string(),
                    needle: needle.to_string(),
                })
                .unwrap()
        };
        assert!(check("6.0").satisfied);
        assert!(!check("7.0").satisfied);
    }

    #[test]
    fn file_exists_checks_path() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("WinAppDriver.exe");
        std::fs::write(&present, b"").unwrap();

        let found = file_exists(&present.to_string_lossy());
        assert!(found.satisfied);

        let missing = file_exists(&temp.path().join("nope.exe").to_string_lossy());
        assert!(!missing.satisfied);
    }

    #[test]
    fn threshold_reports_measured_bytes() {
        let gib = 1024u64 * 1024 * 1024;
        let low = threshold("total memory", 8 * gib, 16.0);
        assert!(!low.satisfied);
        assert_eq!(low.measured_value, Some((8 * gib) as f64));
        assert!(low.detail.contains("8.00 GiB"));

        assert!(threshold("total memory", 16 * gib, 16.0).satisfied);
    }

    #[test]
    fn memory_check_measures_host() {
        let probe = runner()
            .evaluate(&CheckConfig::MemoryAtLeast { gib: 0.001 })
            .unwrap();
        assert!(probe.satisfied);
        assert!(probe.measured_value.unwrap() > 0.0);
    }

    #[test]
    fn disk_check_on_missing_path_is_error() {
        let result = runner().evaluate(&CheckConfig::DiskSpaceAtLeast {
            gib: 1.0,
            path: Some("/rigup/does/not/exist".to_string()),
        });
        assert!(result.is_err());
    }
}
