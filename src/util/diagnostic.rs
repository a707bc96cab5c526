//! User-friendly diagnostic messages.
//!
//! Every fatal configuration error must name its root cause (which
//! variable, pairing, or dependency) and, where possible, a suggested fix.
//! Resolution has no degraded mode, so diagnostics only ever carry error
//! severity.

use std::fmt;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a settings key is not recognized.
    pub const UNKNOWN_VARIABLE: &str =
        "help: Run `slipway --help` to see the recognized variables";

    /// Suggestion when auto-detection finds no match.
    pub const AUTO_DETECT_FAILED: &str =
        "help: Pass `platform=<name>` or `toolchain=<name>` explicitly";

    /// Suggestion when a dependency is missing.
    pub const MISSING_DEPENDENCY: &str =
        "help: Install the development package for the library and re-run";
}

/// An error diagnostic with optional context and suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let severity_str = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };

        let mut output = format!("{}: {}\n", severity_str, self.message);

        for line in &self.context {
            output.push_str(&format!("  {}\n", line));
        }

        for suggestion in &self.suggestions {
            if suggestion.starts_with("help:") {
                output.push_str(&format!("{}\n", suggestion));
            } else {
                output.push_str(&format!("help: {}\n", suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_format_plain() {
        let diag = Diagnostic::error("unknown platform `mips-linux`")
            .with_context("known platforms: linux-x86, linux-x86_64")
            .with_suggestion("Pick one of the known platform names");

        let text = diag.format(false);
        assert!(text.starts_with("error: unknown platform"));
        assert!(text.contains("known platforms"));
        assert!(text.contains("help: Pick one"));
    }

    #[test]
    fn test_diagnostic_preserves_help_prefix() {
        let diag = Diagnostic::error("boom").with_suggestion(suggestions::UNKNOWN_VARIABLE);
        let text = diag.format(false);
        // No doubled "help: help:" when the canned suggestion already carries it.
        assert!(!text.contains("help: help:"));
    }
}
