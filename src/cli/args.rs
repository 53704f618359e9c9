//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::requirements::platform::Platform;
use crate::runner::options::RunOptions;

/// rigup - Check and repair a development machine against declared requirements.
#[derive(Debug, Parser)]
#[command(name = "rigup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .rigup/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show probe and install details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check and remediate requirements (default if no command specified)
    Run(RunArgs),

    /// Show the evaluation order without probing anything
    Plan(PlanArgs),

    /// Print the JSON schema of the config file
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Probe only; never install anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Keep going after a hard-fail requirement fails
    #[arg(long)]
    pub no_stop_on_hard_fail: bool,

    /// Stop after the first soft failure
    #[arg(long)]
    pub stop_on_soft_fail: bool,

    /// Skip requirements whose dependencies are unmet
    #[arg(long)]
    pub skip_blocked_dependents: bool,

    /// Evaluate as if running on this platform (windows, macos)
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<Platform>,

    /// Stop starting new requirements after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl RunArgs {
    /// Apply command-line overrides on top of configured options.
    pub fn apply(&self, mut options: RunOptions) -> RunOptions {
        options.dry_run = self.dry_run;
        if self.no_stop_on_hard_fail {
            options.stop_on_hard_fail = false;
        }
        if self.stop_on_soft_fail {
            options.continue_on_soft_fail = false;
        }
        if self.skip_blocked_dependents {
            options.skip_blocked_dependents = true;
        }
        options
    }
}

/// Arguments for the `plan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PlanArgs {
    /// Evaluate as if running on this platform (windows, macos)
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<Platform>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["rigup"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "rigup",
            "run",
            "--dry-run",
            "--json",
            "--platform",
            "macos",
            "--timeout",
            "30",
        ])
        .unwrap();

        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert!(args.dry_run);
        assert!(args.json);
        assert_eq!(args.platform, Some(Platform::MacOS));
        assert_eq!(args.timeout, Some(30));
    }

    #[test]
    fn rejects_unknown_platform() {
        assert!(Cli::try_parse_from(["rigup", "run", "--platform", "beos"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rigup", "plan", "--config", "ci.yml", "--quiet"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ci.yml")));
        assert!(cli.quiet);
    }

    #[test]
    fn run_args_override_options() {
        let args = RunArgs {
            dry_run: true,
            no_stop_on_hard_fail: true,
            stop_on_soft_fail: true,
            skip_blocked_dependents: true,
            ..Default::default()
        };
        let options = args.apply(RunOptions::default());
        assert!(options.dry_run);
        assert!(!options.stop_on_hard_fail);
        assert!(!options.continue_on_soft_fail);
        assert!(options.skip_blocked_dependents);
    }

    #[test]
    fn run_args_keep_configured_options() {
        let configured = RunOptions {
            stop_on_hard_fail: false,
            skip_blocked_dependents: true,
            ..RunOptions::default()
        };
        assert_eq!(RunArgs::default().apply(configured), configured);
    }
}
