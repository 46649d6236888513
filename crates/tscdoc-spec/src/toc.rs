//! Table-of-contents maintenance.
//!
//! The component TOC is a hand-written reStructuredText file with a
//! `.. toctree::` directive. Generated documents are listed in it; every
//! line starting with `<Component>_oAW_` belongs to the generator and is
//! rewritten on each run, everything else is left alone.

use tracing::debug;

const TOCTREE_DIRECTIVE: &str = ".. toctree::";
const DEFAULT_ENTRY_INDENT: &str = "   ";

/// A TOC file as editable lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocDocument {
    lines: Vec<String>,
}

impl TocDocument {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Lines joined with `\n`, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replace every generated entry of `component` with `entries`.
    ///
    /// Idempotent: a second call with the same arguments is a no-op.
    pub fn synchronize(&mut self, component: &str, entries: &[String]) {
        let generated = format!("{component}_oAW_");
        let before = self.lines.len();
        self.lines
            .retain(|line| !line.trim_start().starts_with(&generated));
        debug!(
            removed = before - self.lines.len(),
            "dropped generated toc lines"
        );

        if entries.is_empty() {
            return;
        }

        let Some(directive) = self
            .lines
            .iter()
            .position(|line| line.trim().starts_with(TOCTREE_DIRECTIVE))
        else {
            debug!("no toctree directive; appending entries");
            self.lines
                .extend(entries.iter().map(|e| format!("{DEFAULT_ENTRY_INDENT}{e}")));
            return;
        };

        let block = TocBlock::scan(&self.lines, directive);
        let indent = match block.last_entry {
            Some(i) => leading_whitespace(&self.lines[i]).to_string(),
            None => format!(
                "{}{DEFAULT_ENTRY_INDENT}",
                leading_whitespace(&self.lines[directive])
            ),
        };

        let mut at = block.last_nonblank + 1;
        let mut inserted: Vec<String> = entries.iter().map(|e| format!("{indent}{e}")).collect();

        // Options only: entries go after the blank line that ends them.
        if block.last_entry.is_none() {
            match self.lines.get(at) {
                Some(line) if is_blank(line) => at += 1,
                _ => inserted.insert(0, String::new()),
            }
        }
        if self.lines.get(at).is_some_and(|line| !is_blank(line)) {
            inserted.push(String::new());
        }

        self.lines.splice(at..at, inserted);
    }
}

/// Extent of the first toctree directive's body.
struct TocBlock {
    last_nonblank: usize,
    /// Last body line that is not an option (`:maxdepth:` and friends).
    last_entry: Option<usize>,
}

impl TocBlock {
    fn scan(lines: &[String], directive: usize) -> Self {
        let depth = indent_width(&lines[directive]);
        let mut block = Self {
            last_nonblank: directive,
            last_entry: None,
        };

        for (i, line) in lines.iter().enumerate().skip(directive + 1) {
            if is_blank(line) {
                continue;
            }
            if indent_width(line) <= depth {
                break;
            }
            block.last_nonblank = i;
            if !line.trim_start().starts_with(':') {
                block.last_entry = Some(i);
            }
        }
        block
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn indent_width(line: &str) -> usize {
    leading_whitespace(line).chars().count()
}
