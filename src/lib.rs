//! rigup - Reconcile a development machine against declared requirements.
//!
//! rigup reads a list of requirements (tools, versions, features, disk and
//! memory thresholds) from `.rigup/config.yml`, probes each one, installs
//! what is missing, and probes again to confirm the fix.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Requirement definitions, checks, and the registry
//! - [`runner`] - Dependency ordering and the reconciliation engine
//! - [`shell`] - Shell command execution
//! - [`sys`] - Memory and disk measurements
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use rigup::requirements::{ActionOutcome, Platform, ProbeResult, Requirement, RequirementRegistry};
//! use rigup::runner::{Reconciler, RunOptions};
//! use rigup::FinalStatus;
//!
//! let mut registry = RequirementRegistry::new();
//! registry
//!     .register(
//!         Requirement::new("git"),
//!         |_| Ok(ProbeResult::satisfied("git version 2.44.0")),
//!         |_| Ok(ActionOutcome::succeeded()),
//!     )
//!     .unwrap();
//!
//! let report = Reconciler::new(&registry)
//!     .run(Platform::MacOS, RunOptions::default())
//!     .unwrap();
//! assert_eq!(report.status_of("git"), Some(FinalStatus::Satisfied));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod sys;
pub mod ui;

pub use error::{Result, RigupError};
pub use requirements::FinalStatus;
pub use runner::{ReconciliationReport, Reconciler, RunOptions};
