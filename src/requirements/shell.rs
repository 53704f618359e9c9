//! Shell-backed capability built from configuration.
//!
//! Probes evaluate the requirement's declarative check; installs run the
//! platform's install command. Nothing about specific tools is compiled in:
//! every command comes from the config file.

use crate::config::schema::{CheckConfig, InstallConfig, RigupConfig};
use crate::error::{Result, RigupError};
use crate::requirements::capability::Capability;
use crate::requirements::checks::CheckRunner;
use crate::requirements::platform::Platform;
use crate::requirements::registry::{Requirement, RequirementRegistry};
use crate::requirements::status::{ActionOutcome, ProbeResult};
use crate::shell::{execute, CommandOptions};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Check and install definitions for one requirement.
#[derive(Debug, Clone)]
struct Recipe {
    check: CheckConfig,
    install: InstallConfig,
}

/// Runs configured checks and install commands through the system shell.
#[derive(Debug)]
pub struct ShellCapability {
    platform: Platform,
    recipes: HashMap<String, Recipe>,
    checks: CheckRunner,
    install_options: CommandOptions,
}

impl ShellCapability {
    /// Create an empty capability for `platform`.
    pub fn new(platform: Platform, probe_timeout: Duration, install_timeout: Duration) -> Self {
        Self {
            platform,
            recipes: HashMap::new(),
            checks: CheckRunner::new(probe_timeout),
            install_options: CommandOptions::with_timeout(install_timeout),
        }
    }

    /// Add the check and install recipe for a requirement.
    pub fn add(&mut self, id: impl Into<String>, check: CheckConfig, install: InstallConfig) {
        self.recipes.insert(id.into(), Recipe { check, install });
    }

    fn recipe(&self, requirement: &str) -> Result<&Recipe> {
        self.recipes
            .get(requirement)
            .ok_or_else(|| RigupError::ProbeFailed {
                requirement: requirement.to_string(),
                message: "no recipe configured".to_string(),
            })
    }
}

impl Capability for ShellCapability {
    fn probe(&self, requirement: &str) -> Result<ProbeResult> {
        let recipe = self.recipe(requirement)?;
        self.checks
            .evaluate(&recipe.check)
            .map_err(|e| RigupError::ProbeFailed {
                requirement: requirement.to_string(),
                message: e.to_string(),
            })
    }

    fn install(&self, requirement: &str) -> Result<ActionOutcome> {
        let recipe = self.recipe(requirement)?;
        let Some(command) = recipe.install.command_for(self.platform) else {
            return Ok(ActionOutcome::not_attempted(format!(
                "no install command for {}",
                self.platform
            )));
        };

        tracing::info!("Installing '{}': {}", requirement, command);
        let result = execute(command, &self.install_options).map_err(|e| {
            RigupError::InstallFailed {
                requirement: requirement.to_string(),
                message: e.to_string(),
            }
        })?;

        if result.success {
            Ok(ActionOutcome::succeeded())
        } else {
            let code = result
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            let stderr = result.stderr.trim();
            let detail = if stderr.is_empty() {
                format!("exit code {}", code)
            } else {
                format!("exit code {}: {}", code, stderr)
            };
            Ok(ActionOutcome::failed(detail))
        }
    }
}

/// Build a registry whose entries are served by one [`ShellCapability`].
///
/// Fails with `DuplicateId` when an id is declared twice. Dependency
/// problems surface later from [`RequirementRegistry::resolve_order`].
pub fn registry_from_config(config: &RigupConfig, platform: Platform) -> Result<RequirementRegistry> {
    let mut capability = ShellCapability::new(
        platform,
        config.settings.probe_timeout(),
        config.settings.install_timeout(),
    );
    let mut requirements = Vec::with_capacity(config.requirements.len());

    for req in &config.requirements {
        if capability.recipes.contains_key(&req.id) {
            return Err(RigupError::DuplicateId { id: req.id.clone() });
        }
        capability.add(req.id.clone(), req.check.clone(), req.install.clone());
        requirements.push(Requirement {
            id: req.id.clone(),
            applies_to: req.applies_to.clone(),
            depends_on: req.depends_on.clone(),
            hard_fail: req.hard_fail,
            description: req.description.clone(),
        });
    }

    let capability: Rc<dyn Capability> = Rc::new(capability);
    let mut registry = RequirementRegistry::new();
    for requirement in requirements {
        registry.register_capability(requirement, Rc::clone(&capability))?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::path::Path;

    fn capability() -> ShellCapability {
        ShellCapability::new(
            Platform::MacOS,
            Duration::from_secs(30),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn probe_unknown_requirement_errors() {
        let err = capability().probe("ghost").unwrap_err();
        assert!(matches!(err, RigupError::ProbeFailed { .. }));
    }

    #[test]
    fn install_without_command_is_not_attempted() {
        let mut cap = capability();
        cap.add(
            "developer-mode",
            CheckConfig::CommandSucceeds {
                command: "exit 1".to_string(),
            },
            InstallConfig {
                windows: Some("powershell -Command Set-ItemProperty".to_string()),
                ..Default::default()
            },
        );

        let outcome = cap.install("developer-mode").unwrap();
        assert!(!outcome.attempted);
        assert!(outcome.error_detail.unwrap().contains("macos"));
    }

    #[cfg(unix)]
    #[test]
    fn install_failure_carries_exit_code() {
        let mut cap = capability();
        cap.add(
            "git",
            CheckConfig::CommandSucceeds {
                command: "exit 1".to_string(),
            },
            InstallConfig {
                any: Some("echo no package manager >&2; exit 127".to_string()),
                ..Default::default()
            },
        );

        let outcome = cap.install("git").unwrap();
        assert!(outcome.attempted);
        assert!(!outcome.succeeded);
        let detail = outcome.error_detail.unwrap();
        assert!(detail.contains("127"));
        assert!(detail.contains("no package manager"));
    }

    #[test]
    fn install_success_reports_succeeded() {
        let mut cap = capability();
        cap.add(
            "marker",
            CheckConfig::CommandSucceeds {
                command: "exit 1".to_string(),
            },
            InstallConfig {
                macos: Some("exit 0".to_string()),
                any: Some("exit 1".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(cap.install("marker").unwrap(), ActionOutcome::succeeded());
    }

    #[test]
    fn registry_from_config_keeps_declaration_order() {
        let config = parse_config(
            r#"
requirements:
  - id: yarn
    depends_on: [node]
    check: { type: command_succeeds, command: "yarn --version" }
  - id: node
    hard_fail: true
    check: { type: version_at_least, command: "node --version", minimum: "18" }
"#,
            Path::new("inline.yml"),
        )
        .unwrap();

        let registry = registry_from_config(&config, Platform::Windows).unwrap();
        assert_eq!(registry.ids(), vec!["yarn", "node"]);
        assert!(registry.get("node").unwrap().requirement().hard_fail);

        let order: Vec<_> = registry
            .resolve_order()
            .unwrap()
            .iter()
            .map(|e| e.requirement().id.clone())
            .collect();
        assert_eq!(order, vec!["node", "yarn"]);
    }

    #[test]
    fn registry_from_config_rejects_duplicates() {
        let config = parse_config(
            r#"
requirements:
  - id: git
    check: { type: command_succeeds, command: "git --version" }
  - id: git
    check: { type: command_succeeds, command: "git --version" }
"#,
            Path::new("inline.yml"),
        )
        .unwrap();

        let err = registry_from_config(&config, Platform::MacOS).unwrap_err();
        assert!(matches!(err, RigupError::DuplicateId { id } if id == "git"));
    }
}
