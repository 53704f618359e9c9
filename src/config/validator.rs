//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Requirement ids must be non-empty and free of whitespace
//! - Every requirement must target at least one platform
//! - Thresholds must be positive numbers
//! - Version minimums must parse and custom patterns must compile
//!
//! Duplicate ids and dependency problems are left to the registry, which
//! reports them as registry faults.

use crate::config::schema::{CheckConfig, RequirementConfig, RigupConfig};
use crate::error::{Result, RigupError};
use crate::requirements::checks::Version;
use regex::Regex;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Requirement id if error is requirement-specific
    pub requirement: Option<String>,
}

impl ValidationError {
    fn for_requirement(rule: &str, req: &RequirementConfig, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            requirement: Some(req.id.clone()),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &RigupConfig) -> Vec<ValidationError> {
    config
        .requirements
        .iter()
        .flat_map(validate_requirement)
        .collect()
}

/// Validate a configuration, failing with the first error.
pub fn validate(config: &RigupConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(RigupError::ConfigValidationError { message })
}

fn validate_requirement(req: &RequirementConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if req.id.trim().is_empty() || req.id.chars().any(char::is_whitespace) {
        errors.push(ValidationError::for_requirement(
            "invalid-id",
            req,
            format!("Requirement id '{}' must be non-empty without spaces", req.id),
        ));
    }

    if req.applies_to.is_empty() {
        errors.push(ValidationError::for_requirement(
            "no-platforms",
            req,
            format!("Requirement '{}' has an empty applies_to list", req.id),
        ));
    }

    let command = match &req.check {
        CheckConfig::CommandSucceeds { command }
        | CheckConfig::OutputContains { command, .. }
        | CheckConfig::VersionAtLeast { command, .. } => Some(command),
        _ => None,
    };
    if command.is_some_and(|c| c.trim().is_empty()) {
        errors.push(ValidationError::for_requirement(
            "empty-command",
            req,
            format!("Requirement '{}' has an empty check command", req.id),
        ));
    }

    match &req.check {
        CheckConfig::VersionAtLeast {
            minimum, pattern, ..
        } => {
            if Version::parse(minimum).is_none() {
                errors.push(ValidationError::for_requirement(
                    "invalid-version",
                    req,
                    format!(
                        "Requirement '{}' has unparseable minimum version '{}'",
                        req.id, minimum
                    ),
                ));
            }
            if let Some(pattern) = pattern {
                match Regex::new(pattern) {
                    Ok(re) if re.captures_len() < 2 => {
                        errors.push(ValidationError::for_requirement(
                            "invalid-pattern",
                            req,
                            format!(
                                "Requirement '{}' pattern needs a capture group for the version",
                                req.id
                            ),
                        ));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        errors.push(ValidationError::for_requirement(
                            "invalid-pattern",
                            req,
                            format!("Requirement '{}' pattern does not compile: {}", req.id, e),
                        ));
                    }
                }
            }
        }
        CheckConfig::MemoryAtLeast { gib } | CheckConfig::DiskSpaceAtLeast { gib, .. }
            if !gib.is_finite() || *gib <= 0.0 =>
        {
            errors.push(ValidationError::for_requirement(
                "invalid-threshold",
                req,
                format!("Requirement '{}' threshold must be positive GiB", req.id),
            ));
        }
        _ => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::InstallConfig;
    use crate::requirements::platform::PlatformTarget;

    fn requirement(id: &str, check: CheckConfig) -> RequirementConfig {
        RequirementConfig {
            id: id.to_string(),
            description: None,
            applies_to: vec![PlatformTarget::Any],
            depends_on: vec![],
            hard_fail: false,
            check,
            install: InstallConfig::default(),
        }
    }

    fn config(requirements: Vec<RequirementConfig>) -> RigupConfig {
        RigupConfig {
            requirements,
            ..Default::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        let cfg = config(vec![requirement(
            "node",
            CheckConfig::VersionAtLeast {
                command: "node --version".to_string(),
                minimum: "18".to_string(),
                pattern: None,
            },
        )]);
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn blank_id_is_rejected() {
        let cfg = config(vec![requirement(
            " ",
            CheckConfig::CommandSucceeds {
                command: "true".to_string(),
            },
        )]);
        let errors = validate_config(&cfg);
        assert_eq!(errors[0].rule, "invalid-id");
    }

    #[test]
    fn empty_platforms_rejected() {
        let mut req = requirement(
            "git",
            CheckConfig::CommandSucceeds {
                command: "git --version".to_string(),
            },
        );
        req.applies_to.clear();
        let errors = validate_config(&config(vec![req]));
        assert!(errors.iter().any(|e| e.rule == "no-platforms"));
    }

    #[test]
    fn non_positive_threshold_rejected() {
        let cfg = config(vec![requirement(
            "disk",
            CheckConfig::DiskSpaceAtLeast {
                gib: 0.0,
                path: None,
            },
        )]);
        let errors = validate_config(&cfg);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "invalid-threshold");
        assert_eq!(errors[0].requirement.as_deref(), Some("disk"));
    }

    #[test]
    fn pattern_without_group_rejected() {
        let cfg = config(vec![requirement(
            "wad",
            CheckConfig::VersionAtLeast {
                command: "wad".to_string(),
                minimum: "1.2.1".to_string(),
                pattern: Some(r"\d+\.\d+".to_string()),
            },
        )]);
        assert!(validate_config(&cfg)
            .iter()
            .any(|e| e.rule == "invalid-pattern"));
    }

    #[test]
    fn blank_version_command_rejected() {
        let cfg = config(vec![requirement(
            "node",
            CheckConfig::VersionAtLeast {
                command: "  ".to_string(),
                minimum: "18".to_string(),
                pattern: None,
            },
        )]);
        let errors = validate_config(&cfg);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "empty-command");
    }

    #[test]
    fn bad_minimum_rejected_and_reported_together() {
        let cfg = config(vec![
            requirement(
                "node",
                CheckConfig::VersionAtLeast {
                    command: "node --version".to_string(),
                    minimum: "latest".to_string(),
                    pattern: Some("(".to_string()),
                },
            ),
            requirement(
                "mem",
                CheckConfig::MemoryAtLeast { gib: f64::NAN },
            ),
        ]);
        let errors = validate_config(&cfg);
        assert_eq!(errors.len(), 3);

        let err = validate(&cfg).unwrap_err();
        assert!(matches!(err, RigupError::ConfigValidationError { .. }));
    }
}
