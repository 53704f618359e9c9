//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files and
//! layering the local override file on top of the project config.

use crate::config::schema::RigupConfig;
use crate::error::{Result, RigupError};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".rigup";

/// Paths to configuration files in merge order (later overrides earlier).
///
/// 1. Project config (`.rigup/config.yml`, or an explicit `--config` path)
/// 2. Local overrides (`.rigup/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config
    pub project: PathBuf,

    /// Local overrides, if present
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    ///
    /// An explicit path replaces the project config; local overrides are
    /// still picked up from the project root.
    pub fn discover(project_root: &Path, explicit: Option<&Path>) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        let project = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.join("config.yml"));
        let local = dir.join("config.local.yml");

        Self {
            project,
            project_local: local.exists().then_some(local),
        }
    }
}

/// Find the project root by walking up from `start`.
///
/// Looks for a `.rigup` directory first and a `.git` directory as fallback.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Parse a YAML string into a config.
pub fn parse_config(content: &str, path: &Path) -> Result<RigupConfig> {
    serde_yaml::from_str(content).map_err(|e| RigupError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<RigupConfig> {
    if !path.exists() {
        return Err(RigupError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    tracing::debug!("Loaded config from {}", path.display());
    parse_config(&content, path)
}

/// Layer `overlay` on top of `base`.
///
/// Settings set in the overlay win; requirements are appended in order.
/// A requirement id present in both surfaces later as a duplicate when the
/// registry is built.
pub fn merge_configs(base: RigupConfig, overlay: RigupConfig) -> RigupConfig {
    let settings = base.settings.overlay(&overlay.settings);
    let mut requirements = base.requirements;
    requirements.extend(overlay.requirements);

    RigupConfig {
        app_name: overlay.app_name.or(base.app_name),
        settings,
        requirements,
    }
}

/// Load the project config and any local overrides.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<RigupConfig> {
    let paths = ConfigPaths::discover(project_root, explicit);
    let mut config = load_config_file(&paths.project)?;

    if let Some(local) = &paths.project_local {
        let overlay = load_config_file(local)?;
        config = merge_configs(config, overlay);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(root: &Path, name: &str, content: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    const BASE: &str = r#"
app_name: Mobile
settings:
  probe_timeout_secs: 5
requirements:
  - id: git
    check:
      type: command_succeeds
      command: git --version
"#;

    #[test]
    fn missing_config_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_config(temp.path(), None).unwrap_err();
        assert!(matches!(err, RigupError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "requirements: [ {");
        let err = load_config(temp.path(), None).unwrap_err();
        assert!(matches!(err, RigupError::ConfigParseError { .. }));
    }

    #[test]
    fn loads_project_config() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", BASE);

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.app_name.as_deref(), Some("Mobile"));
        assert_eq!(config.requirements.len(), 1);
        assert_eq!(config.settings.probe_timeout_secs, Some(5));
    }

    #[test]
    fn local_overrides_are_layered() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", BASE);
        write_config(
            temp.path(),
            "config.local.yml",
            r#"
settings:
  stop_on_hard_fail: false
requirements:
  - id: yarn
    check:
      type: command_succeeds
      command: yarn --version
"#,
        );

        let config = load_config(temp.path(), None).unwrap();
        let ids: Vec<_> = config.requirements.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["git", "yarn"]);
        assert_eq!(config.settings.stop_on_hard_fail, Some(false));
        assert_eq!(config.settings.probe_timeout_secs, Some(5));
        assert_eq!(config.app_name.as_deref(), Some("Mobile"));
    }

    #[test]
    fn explicit_path_replaces_project_config() {
        let temp = TempDir::new().unwrap();
        let other = temp.path().join("custom.yml");
        fs::write(&other, "app_name: Custom\n").unwrap();

        let config = load_config(temp.path(), Some(&other)).unwrap();
        assert_eq!(config.app_name.as_deref(), Some("Custom"));
    }

    #[test]
    fn find_project_root_walks_up() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", BASE);
        let nested = temp.path().join("android").join("app");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).unwrap(), temp.path());
    }
}
