//! Operator-facing error reports.
//!
//! A report is a headline, a few notes saying which input was at fault, and
//! hints for fixing it. Rendering is plain text with optional ANSI color.

use std::fmt::{self, Write as _};

/// Fixed hint texts shared by several error sites.
pub mod suggestions {
    pub const TARGET_NOT_FOUND: &str = "help: Run `wharf targets` to see available targets";

    pub const TOOL_NOT_FOUND: &str =
        "help: Install the tool or set its path under [tools] in .wharf/config.toml";

    pub const MISSING_SOURCE: &str =
        "help: Check the `source` pattern, it is resolved against the project root";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rendered-on-demand error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    headline: String,
    notes: Vec<String>,
    hints: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, headline: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            headline: headline.into(),
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn error(headline: impl Into<String>) -> Self {
        Self::new(Severity::Error, headline)
    }

    pub fn warning(headline: impl Into<String>) -> Self {
        Self::new(Severity::Warning, headline)
    }

    /// Add a note about the input that caused the problem.
    pub fn with_context(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a hint. A leading `help: ` is dropped so shared hint texts can be
    /// passed as they are.
    pub fn with_suggestion(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        let hint = match hint.strip_prefix("help: ") {
            Some(rest) => rest.to_string(),
            None => hint,
        };
        self.hints.push(hint);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Render for a terminal.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{}: {}",
            paint(self.severity.ansi(), self.severity.label()),
            self.headline
        );
        for note in &self.notes {
            let _ = writeln!(out, "  = {}", note);
        }
        for hint in &self.hints {
            let _ = writeln!(out, "{}: {}", paint("1;32", "help"), hint);
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let diag = Diagnostic::error("no file matches `src/main/coffee/*`")
            .with_context("required by target `math`")
            .with_suggestion(suggestions::MISSING_SOURCE)
            .with_suggestion("Set `source-check = \"deferred\"`");

        assert_eq!(
            diag.to_string(),
            "error: no file matches `src/main/coffee/*`\n\
             \x20 = required by target `math`\n\
             help: Check the `source` pattern, it is resolved against the project root\n\
             help: Set `source-check = \"deferred\"`\n"
        );
    }

    #[test]
    fn test_hint_prefix_stripped_once() {
        let diag = Diagnostic::warning("x").with_suggestion("help: help: twice");
        assert_eq!(diag.hints(), ["help: twice"]);
        assert_eq!(diag.severity(), Severity::Warning);
    }

    #[test]
    fn test_color_only_when_asked() {
        let diag = Diagnostic::warning("ignored config");
        assert_eq!(diag.format(false), "warning: ignored config\n");
        assert!(diag.format(true).starts_with("\x1b[1;33mwarning\x1b[0m: "));
    }
}
