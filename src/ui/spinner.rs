//! Progress spinners.

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::icons::StatusKind;
use super::theme::RigupTheme;
use super::SpinnerHandle;

/// A progress spinner for a requirement being probed or installed.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: RigupTheme,
    indent: usize,
    /// Where to print the final line when the bar itself is not drawn
    plain: Option<Term>,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str, theme: RigupTheme) -> Self {
        Self::with_indent(message, theme, 0)
    }

    /// Create a new spinner with indentation.
    pub fn with_indent(message: &str, theme: RigupTheme, indent: usize) -> Self {
        let bar = ProgressBar::new_spinner();
        let prefix = " ".repeat(indent);
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template(&format!("{}{{spinner:.magenta}} {{msg}}", prefix))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            theme,
            indent,
            plain: None,
        }
    }

    /// Create a spinner that doesn't show (for quiet mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: RigupTheme::plain(),
            indent: 0,
            plain: None,
        }
    }

    /// Create a spinner for non-terminal output: nothing animates, and the
    /// final line is printed to stdout with a bracketed status.
    pub fn plain(indent: usize) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: RigupTheme::plain(),
            indent,
            plain: Some(Term::stdout()),
        }
    }

    fn finish_with(&mut self, kind: StatusKind, msg: &str) {
        let prefix = " ".repeat(self.indent);
        if let Some(term) = &self.plain {
            term.write_line(&format!("{}{} {}", prefix, kind.bracketed(), msg))
                .ok();
            self.bar.finish();
            return;
        }
        let line = match kind {
            StatusKind::Success | StatusKind::Fixed => self.theme.format_success(msg),
            StatusKind::Warning => self.theme.format_warning(msg),
            StatusKind::Failed => self.theme.format_error(msg),
            StatusKind::Skipped => self.theme.format_skipped(msg),
        };
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(format!("{}{}", prefix, line));
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish_with(StatusKind::Success, msg);
    }

    fn finish_warning(&mut self, msg: &str) {
        self.finish_with(StatusKind::Warning, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish_with(StatusKind::Failed, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish_with(StatusKind::Skipped, msg);
    }
}
