//! The `rigup plan` command.
//!
//! Shows the order requirements would be evaluated in without probing or
//! installing anything.

use std::path::{Path, PathBuf};

use crate::cli::args::PlanArgs;
use crate::error::Result;
use crate::requirements::platform::Platform;
use crate::requirements::shell::registry_from_config;
use crate::ui::{render_plan, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::run::load_validated_config;

/// The plan command implementation.
pub struct PlanCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: PlanArgs,
}

impl PlanCommand {
    /// Create a new plan command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: PlanArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for PlanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_validated_config(&self.project_root, self.config_path.as_deref())?;
        let platform = self.args.platform.unwrap_or_else(Platform::detect);
        let registry = registry_from_config(&config, platform)?;
        let order = registry.resolve_order()?;

        let app_name = config.app_name.as_deref().unwrap_or("project");
        ui.show_header(&format!("Plan for {} on {}", app_name, platform));
        render_plan(ui, &order, platform);

        Ok(CommandResult::success())
    }
}
