//! Requirement registry and definitions.
//!
//! Defines which requirements exist, how to check them and how to install
//! them. Entries keep their declaration order, which breaks ties when the
//! registry is resolved into evaluation order.

use crate::error::{Result, RigupError};
use crate::requirements::capability::{Capability, InstallFn, ProbeFn};
use crate::requirements::platform::{Platform, PlatformTarget};
use crate::requirements::status::{ActionOutcome, ProbeResult};
use crate::runner::dependency::DependencyGraph;
use std::collections::HashMap;
use std::rc::Rc;

/// A named unit of environment state to reconcile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Stable key (e.g., "node", "git", "developer-mode")
    pub id: String,
    /// Platforms this requirement is evaluated on
    pub applies_to: Vec<PlatformTarget>,
    /// Requirements that must be evaluated before this one
    pub depends_on: Vec<String>,
    /// Abort the run when this stays unmet after remediation
    pub hard_fail: bool,
    /// Human-readable label for output
    pub description: Option<String>,
}

impl Requirement {
    /// A soft requirement that applies everywhere and has no dependencies.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            applies_to: vec![PlatformTarget::Any],
            depends_on: Vec::new(),
            hard_fail: false,
            description: None,
        }
    }

    /// Restrict the requirement to the given platforms.
    pub fn applies_to(mut self, targets: impl IntoIterator<Item = PlatformTarget>) -> Self {
        self.applies_to = targets.into_iter().collect();
        self
    }

    /// Add a dependency.
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    /// Mark the requirement as hard-fail.
    pub fn hard(mut self) -> Self {
        self.hard_fail = true;
        self
    }

    /// Set the display description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this requirement is evaluated on the given platform.
    pub fn applies_on(&self, platform: Platform) -> bool {
        self.applies_to.iter().any(|t| t.covers(platform))
    }

    /// The description, falling back to the id.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.id)
    }
}

/// A requirement together with its probe and install functions.
pub struct RegistryEntry {
    requirement: Requirement,
    probe: ProbeFn,
    install: InstallFn,
}

impl RegistryEntry {
    /// The requirement definition.
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// Run the probe for this requirement.
    pub fn probe(&self) -> Result<ProbeResult> {
        (self.probe)(&self.requirement.id)
    }

    /// Run the install action for this requirement.
    pub fn install(&self) -> Result<ActionOutcome> {
        (self.install)(&self.requirement.id)
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("requirement", &self.requirement)
            .finish_non_exhaustive()
    }
}

/// Ordered table of requirements and how to check and fix them.
#[derive(Debug, Default)]
pub struct RequirementRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl RequirementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a requirement with its probe and install functions.
    ///
    /// Fails with `DuplicateId` if the id is already registered.
    pub fn register<P, I>(&mut self, requirement: Requirement, probe: P, install: I) -> Result<()>
    where
        P: Fn(&str) -> Result<ProbeResult> + 'static,
        I: Fn(&str) -> Result<ActionOutcome> + 'static,
    {
        if self.index.contains_key(&requirement.id) {
            return Err(RigupError::DuplicateId {
                id: requirement.id.clone(),
            });
        }

        tracing::debug!("Registered requirement '{}'", requirement.id);
        self.index
            .insert(requirement.id.clone(), self.entries.len());
        self.entries.push(RegistryEntry {
            requirement,
            probe: Box::new(probe),
            install: Box::new(install),
        });
        Ok(())
    }

    /// Add a requirement whose probe and install are served by a shared capability.
    pub fn register_capability(
        &mut self,
        requirement: Requirement,
        capability: Rc<dyn Capability>,
    ) -> Result<()> {
        let installer = Rc::clone(&capability);
        self.register(
            requirement,
            move |id| capability.probe(id),
            move |id| installer.install(id),
        )
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Requirement ids in declaration order.
    pub fn ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.requirement.id.as_str())
            .collect()
    }

    /// Number of registered requirements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no requirements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sort entries so that every requirement follows its dependencies.
    ///
    /// Ties between independent requirements keep declaration order.
    /// Fails with `CyclicDependency` or `UnknownDependency` on a malformed
    /// registry.
    pub fn resolve_order(&self) -> Result<Vec<&RegistryEntry>> {
        let graph = self
            .entries
            .iter()
            .fold(DependencyGraph::builder(), |builder, entry| {
                builder.add_node(
                    entry.requirement.id.clone(),
                    entry.requirement.depends_on.clone(),
                )
            })
            .build()?;

        let order = graph.topological_order()?;
        Ok(order
            .iter()
            .map(|id| &self.entries[self.index[id]])
            .collect())
    }

    /// Entries that apply to `platform`, in resolved order.
    ///
    /// Each call resolves afresh, so the returned sequence can be restarted
    /// by calling again.
    pub fn for_platform(
        &self,
        platform: Platform,
    ) -> Result<impl Iterator<Item = &RegistryEntry> + '_> {
        let order = self.resolve_order()?;
        Ok(order
            .into_iter()
            .filter(move |entry| entry.requirement.applies_on(platform)))
    }
}
