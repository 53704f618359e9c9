//! Configuration loading, parsing, and validation for rigup.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading, and overlay merging in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use rigup::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".rigup");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(
//!     dir.join("config.yml"),
//!     "app_name: demo\nrequirements:\n  - id: git\n    check: { type: command_succeeds, command: git --version }\n",
//! )
//! .unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.app_name.as_deref(), Some("demo"));
//! assert_eq!(config.requirements[0].id, "git");
//! ```
//!
//! # Configuration File Locations
//!
//! 1. Project config (`.rigup/config.yml`), or the file given by `--config`
//! 2. Local overrides (`.rigup/config.local.yml`)

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_root, load_config, load_config_file, merge_configs, parse_config, ConfigPaths,
    CONFIG_DIR,
};
pub use schema::{CheckConfig, InstallConfig, RequirementConfig, RigupConfig, Settings};
pub use validator::{validate, validate_config, ValidationError};
