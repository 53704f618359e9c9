//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{
    should_use_colors, OutputMode, ProgressSpinner, RigupTheme, SpinnerHandle, StatusKind,
    UserInterface,
};

/// Terminal UI implementation.
///
/// Writes status lines to stdout. Spinners animate on stderr when it is a
/// terminal; otherwise only their final line is printed.
pub struct TerminalUI {
    term: Term,
    theme: RigupTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            RigupTheme::new()
        } else {
            RigupTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn status(&mut self, kind: StatusKind, msg: &str) {
        if !self.mode.shows_status() {
            return;
        }
        let line = if self.term.is_term() {
            kind.format(&self.theme, msg)
        } else {
            format!("{} {}", kind.bracketed(), msg)
        };
        writeln!(self.term, "{}", line).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if !self.mode.shows_spinners() {
            Box::new(ProgressSpinner::hidden())
        } else if Term::stderr().is_term() {
            Box::new(ProgressSpinner::with_indent(message, self.theme.clone(), 2))
        } else {
            Box::new(ProgressSpinner::plain(2))
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the UI for the given output mode.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_ui_keeps_mode() {
        let ui = create_ui(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn quiet_ui_writes_without_panic() {
        let mut ui = TerminalUI::new(OutputMode::Quiet);
        ui.message("hidden");
        ui.status(StatusKind::Success, "hidden");
        let mut spinner = ui.start_spinner("hidden");
        spinner.finish_success("hidden");
    }
}
