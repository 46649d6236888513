//! Rendering of one group into a reStructuredText specification document.
//!
//! Layout lives in two handlebars templates (`group_header.rst.hbs` and
//! `test_step.rst.hbs`), compiled in and optionally overridden from a
//! template directory. Everything that depends on content length (tag
//! wrapping, field continuation lines, step ids) is computed here and handed
//! to the templates as plain strings.

use std::fmt;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use textwrap::{Options, WordSeparator, WordSplitter, WrapAlgorithm};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::grouping::{Group, TestRecord};
use crate::header::{RecordBody, Section, SectionLines};

/// Maximum width of a wrapped `:tests:` line.
pub const LINE_WIDTH: usize = 120;

/// Template names, also the file stems of overrides (`<name>.hbs`).
pub const GROUP_HEADER_TEMPLATE: &str = "group_header.rst";
pub const TEST_STEP_TEMPLATE: &str = "test_step.rst";

const GROUP_HEADER_SOURCE: &str = include_str!("../templates/group_header.rst.hbs");
const TEST_STEP_SOURCE: &str = include_str!("../templates/test_step.rst.hbs");

const GROUP_TESTS_PREFIX: &str = "   :tests: ";
const STEP_TESTS_PREFIX: &str = "      :tests: ";
const FIELD_INDENT: usize = 6;

/// Four-digit step identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StepId(u32);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Step id counter for one document. Starts at `0001`, never skips.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn take(&mut self) -> StepId {
        let id = StepId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-fatal finding tied to a source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub path: PathBuf,
    pub line: usize,
    pub message: String,
}

/// Output of rendering one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub group_key: String,
    pub display_name: String,
    /// `<Component>_oAW_<Display>_Tests.rst`
    pub file_name: String,
    pub contents: String,
    pub warnings: Vec<Warning>,
}

impl RenderedDocument {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.contents.lines()
    }
}

#[derive(Serialize)]
struct GroupHeaderContext<'a> {
    title: &'a str,
    title_underline: String,
    section: &'a str,
    section_underline: String,
    group_key: &'a str,
    component: &'a str,
    tests: String,
}

#[derive(Serialize)]
struct TestStepContext<'a> {
    base_name: &'a str,
    section: &'a str,
    step_id: String,
    detail_id: String,
    tests: String,
    fields: String,
}

/// Renders groups of one component.
pub struct DocumentRenderer {
    handlebars: Handlebars<'static>,
    component: String,
}

impl DocumentRenderer {
    /// Renderer using the built-in templates.
    pub fn new(component: impl Into<String>) -> Result<Self> {
        Self::with_template_dir(component, None)
    }

    /// Renderer whose templates may be overridden by `<name>.hbs` files in
    /// `template_dir`.
    pub fn with_template_dir(
        component: impl Into<String>,
        template_dir: Option<&Path>,
    ) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, builtin) in [
            (GROUP_HEADER_TEMPLATE, GROUP_HEADER_SOURCE),
            (TEST_STEP_TEMPLATE, TEST_STEP_SOURCE),
        ] {
            let override_path = template_dir
                .map(|dir| dir.join(format!("{name}.hbs")))
                .filter(|p| p.is_file());

            match override_path {
                Some(path) => {
                    debug!(template = name, path = %path.display(), "using template override");
                    let source = tscdoc_common_fs::read_to_string(
                        &path,
                        tscdoc_common_fs::MAX_TEXT_FILE_SIZE,
                    )?;
                    register(&mut handlebars, name, &source)?;
                }
                None => register(&mut handlebars, name, builtin)?,
            }
        }

        Ok(Self {
            handlebars,
            component: component.into(),
        })
    }

    /// Render `group` into its document.
    pub fn render(&self, group: &Group) -> Result<RenderedDocument> {
        let section = group.section_name(&self.component);
        let title = format!("{} Test Specification - oAW tests", group.display_name);

        let mut contents = self.render_template(
            GROUP_HEADER_TEMPLATE,
            &GroupHeaderContext {
                title: &title,
                title_underline: "=".repeat(title.chars().count().max(LINE_WIDTH)),
                section: &section,
                section_underline: "-".repeat(section.chars().count()),
                group_key: &group.key,
                component: &self.component,
                tests: wrap_tags(&group.tags, GROUP_TESTS_PREFIX),
            },
        )?;

        let mut ids = IdSequence::new();
        let mut warnings = Vec::new();
        for record in &group.records {
            let step_id = ids.take();
            let detail_id = ids.take();
            let (tests, fields) = step_body(record, &mut warnings);

            contents.push_str(&self.render_template(
                TEST_STEP_TEMPLATE,
                &TestStepContext {
                    base_name: record.source.base_name(),
                    section: &section,
                    step_id: step_id.to_string(),
                    detail_id: detail_id.to_string(),
                    tests,
                    fields: fields.join("\n"),
                },
            )?);
        }

        Ok(RenderedDocument {
            group_key: group.key.clone(),
            display_name: group.display_name.clone(),
            file_name: group.file_name(&self.component),
            contents,
            warnings,
        })
    }

    fn render_template<T: Serialize>(&self, name: &str, ctx: &T) -> Result<String> {
        self.handlebars
            .render(name, ctx)
            .map_err(|e| EngineError::Render {
                name: name.to_string(),
                source: Box::new(e),
            })
    }
}

fn register(hb: &mut Handlebars<'static>, name: &str, source: &str) -> Result<()> {
    hb.register_template_string(name, source)
        .map_err(|e| EngineError::Template {
            name: name.to_string(),
            source: Box::new(e),
        })
}

/// `:tests:` value and field lines for one record.
fn step_body(record: &TestRecord, warnings: &mut Vec<Warning>) -> (String, Vec<String>) {
    const FIELDS: [Section; 3] = [Section::Description, Section::Input, Section::Output];

    match &record.body {
        RecordBody::Parsed(header) => {
            let fields = FIELDS
                .into_iter()
                .flat_map(|s| format_field(s.label(), header.text(s).unwrap_or_default()))
                .collect();
            (wrap_tags(&header.tags, STEP_TESTS_PREFIX), fields)
        }
        RecordBody::Placeholder(lines) => {
            let file_name = record.source.file_name();
            let tests = placeholder(record, lines, Section::Requirements, &file_name, warnings);
            let fields = FIELDS
                .into_iter()
                .flat_map(|s| {
                    let text = placeholder(record, lines, s, &file_name, warnings);
                    format_field(s.label(), &text)
                })
                .collect();
            (tests, fields)
        }
    }
}

fn placeholder(
    record: &TestRecord,
    lines: &SectionLines,
    section: Section,
    file_name: &str,
    warnings: &mut Vec<Warning>,
) -> String {
    let message =
        format!("Missing {section} content; emitting TODO in test specification rst file");
    warn!(path = %record.source.path().display(), line = lines.get(section), "{message}");
    warnings.push(Warning {
        path: record.source.path().to_path_buf(),
        line: lines.get(section),
        message,
    });
    format!("TODO:Update the {section} field in the header of {file_name}")
}

/// Wrap `A, B, C` after `prefix` to [`LINE_WIDTH`] columns.
///
/// Continuation lines are indented by `prefix.len()` spaces; tags are never
/// split. The returned text excludes `prefix` itself.
pub fn wrap_tags(tags: &[String], prefix: &str) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let text = tags.join(", ");
    let indent = " ".repeat(prefix.len());
    let options = Options::new(LINE_WIDTH)
        .initial_indent(prefix)
        .subsequent_indent(&indent)
        .break_words(false)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .wrap_algorithm(WrapAlgorithm::FirstFit);

    let wrapped = textwrap::wrap(&text, &options).join("\n");
    match wrapped.strip_prefix(prefix) {
        Some(rest) => rest.to_string(),
        None => wrapped,
    }
}

/// `      Label: first line` followed by continuation lines aligned under the
/// value. Empty continuation lines stay empty.
pub fn format_field(label: &str, text: &str) -> Vec<String> {
    let indent = " ".repeat(FIELD_INDENT);
    let continuation = " ".repeat(FIELD_INDENT + label.len() + 2);

    let mut parts = text.lines();
    let first = parts.next().unwrap_or_default();
    let mut lines = vec![format!("{indent}{label}: {first}").trim_end().to_string()];
    lines.extend(parts.map(|line| {
        if line.trim().is_empty() {
            String::new()
        } else {
            format!("{continuation}{line}")
        }
    }));
    lines
}
