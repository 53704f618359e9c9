//! Run command implementation.
//!
//! The `rigup run` command reconciles the machine against the configured
//! requirements.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::RunArgs;
use crate::config::{load_config, validate, RigupConfig};
use crate::error::Result;
use crate::requirements::platform::Platform;
use crate::requirements::shell::registry_from_config;
use crate::runner::{CancellationToken, Reconciler};
use crate::ui::{render_summary, ProgressObserver, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Load and validate the project configuration.
pub(crate) fn load_validated_config(
    project_root: &Path,
    config_path: Option<&Path>,
) -> Result<RigupConfig> {
    let config = load_config(project_root, config_path)?;
    validate(&config)?;
    Ok(config)
}

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    fn cancellation(&self) -> CancellationToken {
        match self.args.timeout {
            Some(secs) => CancellationToken::with_deadline(Duration::from_secs(secs)),
            None => CancellationToken::new(),
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_validated_config(&self.project_root, self.config_path.as_deref())?;
        let platform = self.args.platform.unwrap_or_else(Platform::detect);
        let registry = registry_from_config(&config, platform)?;
        let options = self.args.apply(config.settings.run_options());

        tracing::debug!("Run options: {:?}", options);

        let report = if self.args.json {
            Reconciler::new(&registry)
                .with_cancellation(self.cancellation())
                .run(platform, options)?
        } else {
            let app_name = config.app_name.as_deref().unwrap_or("project");
            ui.show_header(&format!("Checking {} on {}", app_name, platform));
            if options.dry_run {
                ui.message("Dry run: nothing will be installed");
            }

            let report = {
                let mut observer = ProgressObserver::new(ui);
                Reconciler::new(&registry)
                    .with_cancellation(self.cancellation())
                    .with_observer(&mut observer)
                    .run(platform, options)?
            };
            render_summary(ui, &report);
            report
        };

        if self.args.json {
            let json = report
                .to_json()
                .map_err(|e| crate::error::RigupError::Other(e.into()))?;
            println!("{}", json);
        }

        Ok(CommandResult::from_exit_code(report.exit_code()))
    }
}
