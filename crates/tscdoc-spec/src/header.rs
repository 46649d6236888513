//! Test header parsing.
//!
//! A `.tsc` file starts with a block of `//` comments holding four labelled
//! sections in fixed order:
//!
//! ```text
//! // Description
//! // Generates keys.
//! // Input
//! // A key spec.
//! // Output
//! // The key.
//! // Requirements
//! // REQ_1, REQ_2
//! ```
//!
//! The block ends at the first blank or non-comment line. Each line is
//! classified into a [`LineKind`] and fed through [`transition`].

use std::fmt;

use crate::tags::dedup_first_occurrence;

/// One of the four header sections, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Description,
    Input,
    Output,
    Requirements,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Description,
        Section::Input,
        Section::Output,
        Section::Requirements,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::Input => "Input",
            Self::Output => "Output",
            Self::Requirements => "Requirements",
        }
    }

    /// Match a header label, ignoring case.
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(text))
    }

    /// Section that must follow this one; `Requirements` is last.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Description => Some(Self::Input),
            Self::Input => Some(Self::Output),
            Self::Output => Some(Self::Requirements),
            Self::Requirements => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A comment line naming a section.
    Header(Section),
    /// Any other comment line; text after `//` and one optional space,
    /// trailing whitespace removed.
    Content(&'a str),
    /// A blank line or the first line that is not a comment.
    Terminator,
}

impl<'a> LineKind<'a> {
    pub fn classify(line: &'a str) -> Self {
        let Some(rest) = line.trim_start().strip_prefix("//") else {
            return Self::Terminator;
        };
        let content = rest.strip_prefix(' ').unwrap_or(rest).trim_end();
        match Section::from_label(content.trim()) {
            Some(section) => Self::Header(section),
            None => Self::Content(content),
        }
    }
}

/// Parser position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the header of this section.
    Await(Section),
    /// Collecting content of this section.
    In(Section),
    Done,
}

/// Advance the parser by one line.
///
/// On failure returns the section that was expected but not found.
pub fn transition(state: State, kind: LineKind<'_>) -> Result<State, Section> {
    match (state, kind) {
        (State::Done, _) => Ok(State::Done),
        (State::Await(expected), LineKind::Header(found)) if found == expected => {
            Ok(State::In(found))
        }
        (State::Await(expected), _) => Err(expected),
        (State::In(current), LineKind::Content(_)) => Ok(State::In(current)),
        (State::In(Section::Requirements), LineKind::Terminator) => Ok(State::Done),
        (State::In(Section::Requirements), LineKind::Header(_)) => Err(Section::Requirements),
        (State::In(current), kind) => {
            // `In(current)` implies `Await(next)` for the next header.
            let expected = current.next().unwrap_or(Section::Requirements);
            transition(State::Await(expected), kind)
        }
    }
}

/// Controls acceptance of headers that have not been filled in yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderPolicy {
    /// Accept a header whose four sections are present but all empty.
    pub allow_placeholders: bool,
}

/// 1-based line numbers of the four section labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionLines([usize; 4]);

impl SectionLines {
    pub fn get(&self, section: Section) -> usize {
        self.0[section.index()]
    }
}

/// A fully populated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub description: String,
    pub input: String,
    pub output: String,
    /// Deduplicated, in order of first appearance.
    pub tags: Vec<String>,
    pub lines: SectionLines,
}

impl Header {
    /// Text of a free-form section; `None` for `Requirements`.
    pub fn text(&self, section: Section) -> Option<&str> {
        match section {
            Section::Description => Some(&self.description),
            Section::Input => Some(&self.input),
            Section::Output => Some(&self.output),
            Section::Requirements => None,
        }
    }
}

/// What a header block parsed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBody {
    Parsed(Header),
    /// All four labels present, all four sections empty.
    Placeholder(SectionLines),
}

impl RecordBody {
    pub fn tags(&self) -> &[String] {
        match self {
            Self::Parsed(header) => &header.tags,
            Self::Placeholder(_) => &[],
        }
    }
}

/// Header rejected: `section` was missing or empty, detected at `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderError {
    pub section: Section,
    pub line: usize,
}

/// Header block parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderParser {
    policy: HeaderPolicy,
}

impl HeaderParser {
    pub fn new(policy: HeaderPolicy) -> Self {
        Self { policy }
    }

    /// Parse the header block at the start of `text`.
    pub fn parse(&self, text: &str) -> Result<RecordBody, HeaderError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut state = State::Await(Section::Description);
        let mut content: [Vec<&str>; 4] = Default::default();
        let mut lines = [0usize; 4];
        let mut line_no = 0;

        for raw in text.lines() {
            line_no += 1;
            let kind = LineKind::classify(raw);
            state = transition(state, kind).map_err(|section| HeaderError {
                section,
                line: line_no,
            })?;

            match (state, kind) {
                (State::Done, _) => break,
                (State::In(section), LineKind::Header(_)) => lines[section.index()] = line_no,
                (State::In(section), LineKind::Content(line)) => {
                    content[section.index()].push(line)
                }
                _ => {}
            }
        }

        match state {
            State::Done | State::In(Section::Requirements) => {}
            State::In(current) => {
                return Err(HeaderError {
                    section: current.next().unwrap_or(Section::Requirements),
                    line: line_no.max(1),
                });
            }
            State::Await(section) => {
                return Err(HeaderError {
                    section,
                    line: line_no.max(1),
                });
            }
        }

        self.build(content, SectionLines(lines))
    }

    fn build(
        &self,
        content: [Vec<&str>; 4],
        lines: SectionLines,
    ) -> Result<RecordBody, HeaderError> {
        let [description, input, output, requirements] = content;
        let description = join_block(&description);
        let input = join_block(&input);
        let output = join_block(&output);
        let tags = split_tags(&requirements);

        let empty = |section: Section| match section {
            Section::Description => description.is_empty(),
            Section::Input => input.is_empty(),
            Section::Output => output.is_empty(),
            Section::Requirements => tags.is_empty(),
        };

        if self.policy.allow_placeholders && Section::ALL.into_iter().all(empty) {
            return Ok(RecordBody::Placeholder(lines));
        }
        if let Some(section) = Section::ALL.into_iter().find(|s| empty(*s)) {
            return Err(HeaderError {
                section,
                line: lines.get(section),
            });
        }

        Ok(RecordBody::Parsed(Header {
            description,
            input,
            output,
            tags,
            lines,
        }))
    }
}

/// Join section lines verbatim and trim the whole block.
fn join_block(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

/// Requirement lines become one list: commas count as separators,
/// duplicates keep their first position.
fn split_tags(lines: &[&str]) -> Vec<String> {
    let joined = lines.join(" ").replace(',', " ");
    dedup_first_occurrence(joined.split_whitespace())
}
