//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::error::{Result, RigupError};
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// Configuration and registry problems are returned as errors; the
    /// dispatcher's caller maps them to an exit code with [`error_exit_code`].
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Result carrying a specific exit code.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Self::success()
        } else {
            Self::failure(exit_code)
        }
    }
}

/// Exit code for an error that aborted a command.
///
/// Configuration and registry faults exit with 2; anything else with 1.
pub fn error_exit_code(err: &RigupError) -> i32 {
    match err {
        RigupError::ConfigNotFound { .. }
        | RigupError::ConfigParseError { .. }
        | RigupError::ConfigValidationError { .. } => 2,
        e if e.is_malformed_registry() => 2,
        _ => 1,
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            project_root,
            config_path,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.config_path.as_deref();
        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(&self.project_root, config, args.clone()).execute(ui)
            }
            Some(Commands::Plan(args)) => {
                super::plan::PlanCommand::new(&self.project_root, config, args.clone()).execute(ui)
            }
            Some(Commands::Schema) => super::schema::SchemaCommand.execute(ui),
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => {
                // Default to run command with default args
                super::run::RunCommand::new(&self.project_root, config, RunArgs::default())
                    .execute(ui)
            }
        }
    }
}
