//! Test specification generator.
//!
//! Reads the comment header of every `<Component>_<Group>_<Name>.tsc` test
//! source, groups the tests by their `<Group>` token and writes one
//! reStructuredText specification document per group, keeping the
//! component's table of contents in sync.
//!
//! [`Generator::run`] performs a complete run; the modules below expose the
//! individual steps.

pub mod discovery;
pub mod error;
pub mod grouping;
pub mod header;
pub mod pipeline;
pub mod rendering;
pub mod tags;
pub mod toc;

pub use error::{EngineError, Result};
pub use grouping::{group_records, Group, SourceFile, TestRecord};
pub use header::{Header, HeaderError, HeaderParser, HeaderPolicy, RecordBody, Section};
pub use pipeline::{GeneratedDocument, GenerationReport, Generator, Outcome};
pub use rendering::{DocumentRenderer, RenderedDocument, Warning};
pub use tags::DisplayNames;
pub use toc::TocDocument;
