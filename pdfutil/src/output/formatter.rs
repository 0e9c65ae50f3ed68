//! Terminal messages for the shell: levelled lines and per-file status rows.
//!
//! ```
//! use pdfutil::output::OutputFormatter;
//! use std::path::Path;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Encrypting 2 file(s)...");
//! formatter.status_row(Path::new("a.pdf"), "Encrypted", true);
//! formatter.status_row(Path::new("b.pdf"), "File not found", false);
//! ```

use std::io::{self, IsTerminal};
use std::path::Path;

use crate::config::Config;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "\x1b[32m", // Green
            Self::Warning => "\x1b[33m", // Yellow
            Self::Error => "\x1b[31m",   // Red
            Self::Debug => "\x1b[36m",   // Cyan
        }
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress non-error output
    /// * `verbose` - Show verbose output
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Disable colors regardless of the terminal.
    pub fn plain(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Returns true if stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Whether non-error output is suppressed.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Whether verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether regular output should be printed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.format_message(MessageLevel::Info, message));
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.format_message(MessageLevel::Success, message));
        }
    }

    /// Print a warning message to stderr, even in quiet mode.
    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.format_message(MessageLevel::Warning, message));
    }

    /// Print an error message to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.format_message(MessageLevel::Error, message));
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            println!("{}", self.format_message(MessageLevel::Debug, message));
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled detail line. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print one row of a per-file status table.
    ///
    /// Failed rows are printed even in quiet mode.
    pub fn status_row(&self, path: &Path, status: &str, ok: bool) {
        let level = if ok {
            MessageLevel::Success
        } else {
            MessageLevel::Error
        };
        let line = self.format_message(level, &format!("{}  {status}", path.display()));
        if !ok {
            eprintln!("{line}");
        } else if !self.quiet {
            println!("{line}");
        }
    }

    /// Print a blank line. Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Render a message with level prefix and, if enabled, color.
    pub fn format_message(&self, level: MessageLevel, message: &str) -> String {
        let prefix = level.prefix();
        let color = level.color();
        if self.colored && !color.is_empty() {
            format!("{color}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_plain() {
        let formatter = OutputFormatter::new(false, false).plain();
        assert_eq!(
            formatter.format_message(MessageLevel::Success, "done"),
            "✓ done"
        );
        assert_eq!(formatter.format_message(MessageLevel::Info, "note"), "note");
        assert_eq!(
            formatter.format_message(MessageLevel::Error, "failed"),
            "✗ failed"
        );
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            quiet: true,
            ..Config::default()
        };
        let formatter = OutputFormatter::from_config(&config);
        assert!(formatter.is_quiet());
        assert!(!formatter.is_verbose());
        assert!(!formatter.should_print());
    }
}
