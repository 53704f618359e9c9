//! The `rigup schema` command.

use crate::config::RigupConfig;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Prints the JSON schema of `.rigup/config.yml`.
pub struct SchemaCommand;

/// Render the config schema as pretty JSON.
pub fn config_schema() -> Result<String> {
    let schema = schemars::schema_for!(RigupConfig);
    serde_json::to_string_pretty(&schema).map_err(|e| anyhow::Error::from(e).into())
}

impl Command for SchemaCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        println!("{}", config_schema()?);
        Ok(CommandResult::success())
    }
}
