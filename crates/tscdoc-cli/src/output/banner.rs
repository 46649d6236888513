//! Boxed status banner printed at the end of every run.

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Final run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Success,
    Warnings,
    Failed,
    Skipped,
}

impl Banner {
    /// `Warnings` when anything was reported, `Success` otherwise.
    pub fn for_warnings(count: usize) -> Self {
        if count == 0 {
            Self::Success
        } else {
            Self::Warnings
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Success => "OAW TO RST WAS SUCCESSFUL",
            Self::Warnings => "OAW TO RST FINISHED WITH WARNINGS",
            Self::Failed => "OAW TO RST FAILED",
            Self::Skipped => "OAW TO RST SKIPPED",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Success => GREEN,
            Self::Warnings | Self::Skipped => YELLOW,
            Self::Failed => RED,
        }
    }

    /// Three-line box around the status text.
    pub fn render(self, color: bool) -> String {
        let rule = "-".repeat(self.text().len() + 2);
        let boxed = format!("/{rule}\\\n| {} |\n\\{rule}/", self.text());
        if color {
            format!("{}{boxed}{RESET}", self.color())
        } else {
            boxed
        }
    }
}
