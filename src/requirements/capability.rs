//! The capability interface between the engine and the machine.
//!
//! The engine never touches the system directly. It asks a [`Capability`]
//! to probe a requirement or to install it, and treats whatever comes back
//! as data.

use crate::error::Result;
use crate::requirements::status::{ActionOutcome, ProbeResult};

/// Probe and install operations for requirements, keyed by id.
pub trait Capability {
    /// Report whether a requirement is currently met.
    ///
    /// Must not mutate machine state and must finish in bounded time.
    fn probe(&self, requirement: &str) -> Result<ProbeResult>;

    /// Attempt to bring a requirement into a satisfied state.
    ///
    /// Must tolerate being called when the requirement is already met.
    fn install(&self, requirement: &str) -> Result<ActionOutcome>;
}

/// A probe function stored in the registry.
pub type ProbeFn = Box<dyn Fn(&str) -> Result<ProbeResult>>;

/// An install function stored in the registry.
pub type InstallFn = Box<dyn Fn(&str) -> Result<ActionOutcome>>;
