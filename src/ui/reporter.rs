//! Rendering reconciliation runs for humans.

use crate::error::RigupError;
use crate::requirements::platform::Platform;
use crate::requirements::registry::{RegistryEntry, Requirement};
use crate::requirements::status::FinalStatus;
use crate::runner::engine::RunObserver;
use crate::runner::report::{ReconciliationReport, RequirementRecord};

use super::{SpinnerHandle, StatusKind, UserInterface};

/// Shows each requirement as it is checked, installed, and settled.
pub struct ProgressObserver<'a> {
    ui: &'a mut dyn UserInterface,
    spinner: Option<Box<dyn SpinnerHandle>>,
    label: Option<String>,
}

impl<'a> ProgressObserver<'a> {
    /// Create an observer writing to `ui`.
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self {
            ui,
            spinner: None,
            label: None,
        }
    }
}

impl RunObserver for ProgressObserver<'_> {
    fn requirement_started(&mut self, requirement: &Requirement) {
        let label = requirement.label().to_string();
        self.spinner = Some(self.ui.start_spinner(&format!("Checking {}", label)));
        self.label = Some(label);
    }

    fn requirement_installing(&mut self, requirement: &Requirement) {
        if let Some(spinner) = self.spinner.as_mut() {
            spinner.set_message(&format!("Installing {}", requirement.label()));
        }
    }

    fn requirement_finished(&mut self, record: &RequirementRecord) {
        let label = self.label.take().unwrap_or_else(|| record.id.clone());
        let line = format!("{} ({})", label, record.detail);

        match self.spinner.take() {
            Some(mut spinner) => match record.status {
                FinalStatus::Satisfied | FinalStatus::Remediated => spinner.finish_success(&line),
                FinalStatus::FailedSoft => spinner.finish_warning(&line),
                FinalStatus::FailedHard => spinner.finish_error(&line),
                FinalStatus::Skipped => spinner.finish_skipped(&line),
            },
            None => self.ui.status(StatusKind::from(record.status), &line),
        }

        if self.ui.output_mode().shows_details() {
            if let Some(action) = &record.action {
                if let Some(err) = &action.error_detail {
                    self.ui.message(&format!("    install: {}", err));
                }
            }
        }
    }
}

/// Print the closing summary for a run.
pub fn render_summary(ui: &mut dyn UserInterface, report: &ReconciliationReport) {
    let summary = report.summary();
    let counts = format!(
        "{} satisfied, {} remediated, {} failed, {} skipped",
        summary.satisfied,
        summary.remediated,
        summary.failed_soft + summary.failed_hard,
        summary.skipped
    );

    if report.was_cancelled() {
        ui.warning(&format!("Run cancelled: {}", counts));
    }

    if report.has_hard_failure() {
        let failed: Vec<&str> = report
            .records()
            .iter()
            .filter(|r| r.status == FinalStatus::FailedHard)
            .map(|r| r.id.as_str())
            .collect();
        ui.error(&format!(
            "Environment not ready: {} ({})",
            failed.join(", "),
            counts
        ));
        if ui.output_mode().shows_details() {
            for id in failed {
                let err = RigupError::HardRequirementUnmet {
                    requirement: id.to_string(),
                };
                ui.message(&format!("    {}", err));
            }
        }
    } else if summary.failed_soft > 0 {
        ui.warning(&format!("Environment partially ready ({})", counts));
    } else if report.is_dry_run() {
        ui.success(&format!("Dry run complete ({})", counts));
    } else {
        ui.success(&format!("Environment ready ({})", counts));
    }
}

/// Print the evaluation order and which requirements apply on `platform`.
pub fn render_plan(ui: &mut dyn UserInterface, order: &[&RegistryEntry], platform: Platform) {
    for (i, entry) in order.iter().enumerate() {
        let req = entry.requirement();
        let mut line = format!("{:>2}. {}", i + 1, req.id);
        if req.hard_fail {
            line.push_str(" [hard]");
        }
        if !req.depends_on.is_empty() {
            line.push_str(&format!(" (after {})", req.depends_on.join(", ")));
        }
        if let Some(description) = &req.description {
            line.push_str(&format!(" - {}", description));
        }

        if req.applies_on(platform) {
            ui.message(&line);
        } else {
            ui.status(
                StatusKind::Skipped,
                &format!("{} (not applicable on {})", line, platform),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::platform::PlatformTarget;
    use crate::requirements::registry::RequirementRegistry;
    use crate::requirements::status::{ActionOutcome, ProbeResult};
    use crate::runner::{Reconciler, RunOptions};
    use crate::ui::{MockUI, OutputMode, SpinnerStatus};

    fn registry() -> RequirementRegistry {
        let mut registry = RequirementRegistry::new();
        registry
            .register(
                Requirement::new("git").describe("Git"),
                |_| Ok(ProbeResult::satisfied("git version 2.44.0")),
                |_| Ok(ActionOutcome::succeeded()),
            )
            .unwrap();
        registry
            .register(
                Requirement::new("disk").hard(),
                |_| Ok(ProbeResult::unsatisfied("9.50 GiB free")),
                |_| Ok(ActionOutcome::not_attempted("nothing to install")),
            )
            .unwrap();
        registry
            .register(
                Requirement::new("xcode").applies_to([PlatformTarget::MacOS]),
                |_| Ok(ProbeResult::satisfied("ok")),
                |_| Ok(ActionOutcome::succeeded()),
            )
            .unwrap();
        registry
    }

    #[test]
    fn observer_finishes_spinners_by_status() {
        let registry = registry();
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        let report = {
            let mut observer = ProgressObserver::new(&mut ui);
            Reconciler::new(&registry)
                .with_observer(&mut observer)
                .run(Platform::Windows, RunOptions::default())
                .unwrap()
        };

        assert_eq!(ui.spinners(), ["Checking Git", "Checking disk"]);
        let finished = ui.finished_spinners();
        assert_eq!(finished[0].0, SpinnerStatus::Success);
        assert_eq!(finished[1].0, SpinnerStatus::Error);
        assert!(finished[1].1.contains("9.50 GiB free"));
        assert!(ui.has_message("install: nothing to install"));

        // xcode never starts a spinner; it is reported as a status line.
        assert_eq!(ui.statuses()[0].0, StatusKind::Skipped);
        assert!(ui.statuses()[0].1.starts_with("xcode"));

        render_summary(&mut ui, &report);
        assert!(ui.has_error("Environment not ready: disk"));
        assert!(ui.has_message("Hard requirement 'disk' is not satisfied"));
    }

    #[test]
    fn summary_reports_success() {
        let mut registry = RequirementRegistry::new();
        registry
            .register(
                Requirement::new("node"),
                |_| Ok(ProbeResult::satisfied("v20.11.0")),
                |_| Ok(ActionOutcome::succeeded()),
            )
            .unwrap();
        let report = Reconciler::new(&registry)
            .run(Platform::MacOS, RunOptions::default())
            .unwrap();

        let mut ui = MockUI::new();
        render_summary(&mut ui, &report);
        assert!(ui.has_success("Environment ready (1 satisfied, 0 remediated"));
    }

    #[test]
    fn plan_marks_inapplicable_requirements() {
        let registry = registry();
        let order = registry.resolve_order().unwrap();
        let mut ui = MockUI::new();

        render_plan(&mut ui, &order, Platform::Windows);

        assert_eq!(ui.messages()[0], " 1. git - Git");
        assert_eq!(ui.messages()[1], " 2. disk [hard]");
        assert!(ui.statuses()[0].1.contains("not applicable on windows"));
    }
}
