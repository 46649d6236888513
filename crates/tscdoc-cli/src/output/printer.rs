//! Output printer honouring `--quiet` and `--color`.

use std::fmt;
use std::path::Path;

use super::Banner;

/// Diagnostic severity, as shown in `path:line: (SEVERITY) message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("ERROR"),
            Self::Warning => f.write_str("WARNING"),
        }
    }
}

/// `path:line: (SEVERITY) message`, the format editors jump to.
pub fn diagnostic(severity: Severity, path: &Path, line: usize, message: &str) -> String {
    format!("{}:{line}: ({severity}) {message}", path.display())
}

/// Output configuration
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
    quiet: bool,
}

impl Printer {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    /// Print a report line (suppressed by `--quiet`).
    pub fn line(&self, text: impl fmt::Display) {
        if !self.quiet {
            println!("{text}");
        }
    }

    /// Title with a dashed underline.
    pub fn heading(&self, title: &str) {
        self.line(title);
        self.line("-".repeat(title.chars().count()));
    }

    /// Title, one item per line, blank line.
    pub fn list<I, T>(&self, title: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        self.line(title);
        for item in items {
            self.line(item);
        }
        self.line("");
    }

    pub fn error(&self, path: &Path, line: usize, message: &str) {
        eprintln!("{}", diagnostic(Severity::Error, path, line, message));
    }

    pub fn warning(&self, path: &Path, line: usize, message: &str) {
        eprintln!("{}", diagnostic(Severity::Warning, path, line, message));
    }

    /// Error without a file location.
    pub fn error_message(&self, message: &str) {
        eprintln!("tscdoc: ({}) {message}", Severity::Error);
    }

    /// Always printed, even with `--quiet`.
    pub fn banner(&self, banner: Banner) {
        println!("{}", banner.render(self.color));
    }
}
