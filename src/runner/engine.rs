//! The reconciliation engine.
//!
//! Walks the registry in resolved order and applies check, remediate,
//! re-check to each requirement:
//!
//! 1. Requirements that do not apply to the platform are skipped unprobed.
//! 2. A satisfied probe is final; install is never called for it.
//! 3. In a dry run an unsatisfied probe is final.
//! 4. Otherwise install, then probe again. Only the second probe decides
//!    between remediated and failed; the installer's own verdict is recorded
//!    but never trusted.
//!
//! Probe and install errors are folded into the report. The only errors
//! [`Reconciler::run`] returns are registry faults, raised before anything
//! is probed.

use std::collections::HashSet;

use crate::error::Result;
use crate::requirements::platform::Platform;
use crate::requirements::registry::{RegistryEntry, Requirement, RequirementRegistry};
use crate::requirements::status::{ActionOutcome, FinalStatus, ProbeResult};
use crate::runner::cancel::CancellationToken;
use crate::runner::options::RunOptions;
use crate::runner::report::{ReconciliationReport, RequirementRecord};

/// Receives progress notifications during a run.
///
/// Observers see what happens but cannot influence it.
pub trait RunObserver {
    /// A requirement is about to be probed.
    fn requirement_started(&mut self, _requirement: &Requirement) {}

    /// An unsatisfied requirement is about to be installed.
    fn requirement_installing(&mut self, _requirement: &Requirement) {}

    /// A requirement's record was added to the report.
    fn requirement_finished(&mut self, _record: &RequirementRecord) {}
}

/// Runs reconciliation over a registry.
pub struct Reconciler<'a> {
    registry: &'a RequirementRegistry,
    cancel: CancellationToken,
    observer: Option<&'a mut dyn RunObserver>,
}

impl<'a> Reconciler<'a> {
    /// Create an engine over `registry`.
    pub fn new(registry: &'a RequirementRegistry) -> Self {
        Self {
            registry,
            cancel: CancellationToken::new(),
            observer: None,
        }
    }

    /// Check `token` before each requirement.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Report progress to `observer`.
    pub fn with_observer(mut self, observer: &'a mut dyn RunObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Reconcile every requirement for `platform`.
    ///
    /// # Errors
    ///
    /// `CyclicDependency` or `UnknownDependency` if the registry is
    /// malformed. Nothing is probed in that case.
    pub fn run(&mut self, platform: Platform, options: RunOptions) -> Result<ReconciliationReport> {
        let registry = self.registry;
        let order = registry.resolve_order()?;

        tracing::info!(
            "Reconciling {} requirement(s) for {}{}",
            order.len(),
            platform,
            if options.dry_run { " (dry run)" } else { "" }
        );

        let mut report = ReconciliationReport::new(platform, options.dry_run);
        let mut blocked: HashSet<String> = HashSet::new();

        for (pos, entry) in order.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::warn!("Run cancelled before '{}'", entry.requirement().id);
                report.mark_cancelled();
                self.skip_remaining(&mut report, &order[pos..], "cancelled before evaluation");
                break;
            }

            let (record, is_blocked) = self.evaluate(entry, platform, options, &blocked);
            let status = record.status;
            let id = record.id.clone();

            if status.is_failure() || is_blocked {
                blocked.insert(id.clone());
            }

            self.finish(&mut report, record);

            let abort = match status {
                FinalStatus::FailedHard if options.stop_on_hard_fail => {
                    Some(format!("aborted: prior hard failure on `{}`", id))
                }
                FinalStatus::FailedSoft if !options.continue_on_soft_fail => {
                    Some(format!("aborted: prior failure on `{}`", id))
                }
                _ => None,
            };

            if let Some(detail) = abort {
                tracing::warn!("Stopping run after '{}' ({})", id, status);
                self.skip_remaining(&mut report, &order[pos + 1..], &detail);
                break;
            }
        }

        Ok(report)
    }

    fn evaluate(
        &mut self,
        entry: &RegistryEntry,
        platform: Platform,
        options: RunOptions,
        blocked: &HashSet<String>,
    ) -> (RequirementRecord, bool) {
        let req = entry.requirement();

        if !req.applies_on(platform) {
            tracing::debug!("Skipping '{}': not applicable on {}", req.id, platform);
            let record =
                RequirementRecord::skipped(&req.id, format!("not applicable on {}", platform));
            return (record, false);
        }

        if options.skip_blocked_dependents {
            if let Some(dep) = req.depends_on.iter().find(|d| blocked.contains(*d)) {
                tracing::debug!("Skipping '{}': dependency '{}' unmet", req.id, dep);
                let record = RequirementRecord::skipped(
                    &req.id,
                    format!("blocked: dependency `{}` is not satisfied", dep),
                );
                return (record, true);
            }
        }

        self.notify(|o| o.requirement_started(req));
        (self.reconcile(entry, options), false)
    }

    /// Probe, and when unsatisfied install and probe again.
    fn reconcile(&mut self, entry: &RegistryEntry, options: RunOptions) -> RequirementRecord {
        let req = entry.requirement();

        let initial = probe(entry);
        if initial.satisfied {
            return RequirementRecord {
                id: req.id.clone(),
                detail: initial.detail.clone(),
                initial_probe: Some(initial),
                action: None,
                final_probe: None,
                status: FinalStatus::Satisfied,
            };
        }

        if options.dry_run {
            return RequirementRecord {
                id: req.id.clone(),
                detail: initial.detail.clone(),
                initial_probe: Some(initial),
                action: None,
                final_probe: None,
                status: failure_status(req),
            };
        }

        self.notify(|o| o.requirement_installing(req));
        let action = install(entry);
        let final_probe = probe(entry);

        let (status, detail) = if final_probe.satisfied {
            (FinalStatus::Remediated, final_probe.detail.clone())
        } else {
            let detail = match &action.error_detail {
                Some(err) => format!("{} (install: {})", final_probe.detail, err),
                None => final_probe.detail.clone(),
            };
            (failure_status(req), detail)
        };

        RequirementRecord {
            id: req.id.clone(),
            initial_probe: Some(initial),
            action: Some(action),
            final_probe: Some(final_probe),
            status,
            detail,
        }
    }

    fn skip_remaining(
        &mut self,
        report: &mut ReconciliationReport,
        remaining: &[&RegistryEntry],
        detail: &str,
    ) {
        for entry in remaining {
            self.finish(
                report,
                RequirementRecord::skipped(&entry.requirement().id, detail),
            );
        }
    }

    fn finish(&mut self, report: &mut ReconciliationReport, record: RequirementRecord) {
        tracing::info!("{}: {} ({})", record.id, record.status, record.detail);
        self.notify(|o| o.requirement_finished(&record));
        report.push(record);
    }

    fn notify(&mut self, f: impl FnOnce(&mut dyn RunObserver)) {
        if let Some(observer) = self.observer.as_deref_mut() {
            f(observer);
        }
    }
}

fn failure_status(req: &Requirement) -> FinalStatus {
    if req.hard_fail {
        FinalStatus::FailedHard
    } else {
        FinalStatus::FailedSoft
    }
}

fn probe(entry: &RegistryEntry) -> ProbeResult {
    let id = &entry.requirement().id;
    match entry.probe() {
        Ok(result) => {
            tracing::debug!("Probe '{}': satisfied={} {}", id, result.satisfied, result.detail);
            result
        }
        Err(e) => {
            tracing::warn!("Probe for '{}' failed: {}", id, e);
            ProbeResult::unsatisfied(e.to_string())
        }
    }
}

fn install(entry: &RegistryEntry) -> ActionOutcome {
    let id = &entry.requirement().id;
    match entry.install() {
        Ok(outcome) => {
            tracing::debug!(
                "Install '{}': attempted={} succeeded={}",
                id,
                outcome.attempted,
                outcome.succeeded
            );
            outcome
        }
        Err(e) => {
            tracing::warn!("Install for '{}' failed: {}", id, e);
            ActionOutcome::failed(e.to_string())
        }
    }
}
