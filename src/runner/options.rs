//! Options controlling a reconciliation run.

/// How the engine reacts to unmet requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Probe only; never remediate.
    pub dry_run: bool,

    /// Abort remaining requirements once a hard-fail requirement ends
    /// failed-hard.
    pub stop_on_hard_fail: bool,

    /// Keep processing after a non-hard requirement fails.
    pub continue_on_soft_fail: bool,

    /// Skip requirements whose dependencies ended unmet instead of probing them.
    pub skip_blocked_dependents: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            stop_on_hard_fail: true,
            continue_on_soft_fail: true,
            skip_blocked_dependents: false,
        }
    }
}

impl RunOptions {
    /// Default options with dry run enabled.
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let options = RunOptions::default();
        assert!(!options.dry_run);
        assert!(options.stop_on_hard_fail);
        assert!(options.continue_on_soft_fail);
        assert!(!options.skip_blocked_dependents);
    }

    #[test]
    fn dry_run_keeps_other_defaults() {
        let options = RunOptions::dry_run();
        assert!(options.dry_run);
        assert!(options.stop_on_hard_fail);
    }
}
