//! Error types for rigup operations.
//!
//! This module defines [`RigupError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Registry faults (`DuplicateId`, `CyclicDependency`, `UnknownDependency`)
//!   are the only errors the reconciliation engine returns to its caller
//! - Probe and install errors are folded into report data by the engine
//! - Use `anyhow::Error` (via `RigupError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for rigup operations.
#[derive(Debug, Error)]
pub enum RigupError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A requirement id was registered twice.
    #[error("Duplicate requirement id: {id}")]
    DuplicateId { id: String },

    /// Requirement dependency cycle detected.
    #[error("Circular dependency detected: {cycle}")]
    CyclicDependency { cycle: String },

    /// A requirement depends on an id that was never registered.
    #[error("Requirement '{requirement}' depends on unknown requirement '{dependency}'")]
    UnknownDependency {
        requirement: String,
        dependency: String,
    },

    /// A probe could not determine the state of a requirement.
    #[error("Probe failed for '{requirement}': {message}")]
    ProbeFailed {
        requirement: String,
        message: String,
    },

    /// A remediation attempt errored.
    #[error("Install failed for '{requirement}': {message}")]
    InstallFailed {
        requirement: String,
        message: String,
    },

    /// A hard-fail requirement is still unmet after remediation.
    #[error("Hard requirement '{requirement}' is not satisfied")]
    HardRequirementUnmet { requirement: String },

    /// Shell command could not be started.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Shell command exceeded its time budget and was killed.
    #[error("Command timed out after {}s: {command}", timeout.as_secs())]
    CommandTimedOut { command: String, timeout: Duration },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RigupError {
    /// Whether this error means the requirement registry itself is malformed.
    pub fn is_malformed_registry(&self) -> bool {
        matches!(
            self,
            RigupError::DuplicateId { .. }
                | RigupError::CyclicDependency { .. }
                | RigupError::UnknownDependency { .. }
        )
    }
}

/// Result type alias for rigup operations.
pub type Result<T> = std::result::Result<T, RigupError>;
