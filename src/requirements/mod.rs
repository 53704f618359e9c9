//! Requirement definitions, probing, and remediation.
//!
//! # Modules
//!
//! - [`registry`] - Requirement definitions and the ordered registry
//! - [`capability`] - Probe and install seam
//! - [`checks`] - Declarative checks (versions, files, thresholds)
//! - [`shell`] - Capability backed by configured shell commands
//! - [`platform`] - Host platform detection and targeting
//! - [`status`] - Probe results, install outcomes, final statuses

pub mod capability;
pub mod checks;
pub mod platform;
pub mod registry;
pub mod shell;
pub mod status;

pub use capability::{Capability, InstallFn, ProbeFn};
pub use checks::{CheckRunner, Version};
pub use platform::{Platform, PlatformTarget};
pub use registry::{RegistryEntry, Requirement, RequirementRegistry};
pub use shell::{registry_from_config, ShellCapability};
pub use status::{ActionOutcome, FinalStatus, ProbeResult};
