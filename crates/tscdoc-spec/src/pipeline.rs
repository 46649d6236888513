//! The end-to-end generation run.
//!
//! discover -> parse -> group -> render -> synchronize TOC -> persist.
//! Everything is produced in memory first; files are only touched once the
//! whole run has succeeded.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};
use tscdoc_common_config::ResolvedConfig;
use tscdoc_common_fs::{TempFile, MAX_TEXT_FILE_SIZE};

use crate::discovery::{discover_sources, locate_toc, stale_generated_files};
use crate::error::{EngineError, Result};
use crate::grouping::{ensure_unique_file_names, group_records, SourceFile, TestRecord};
use crate::header::{HeaderParser, HeaderPolicy};
use crate::rendering::{DocumentRenderer, RenderedDocument, Warning};
use crate::tags::DisplayNames;
use crate::toc::TocDocument;

/// One written specification document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub path: PathBuf,
    pub group_key: String,
    pub display_name: String,
}

/// What a successful run changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Every discovered source, sorted.
    pub sources: Vec<PathBuf>,
    pub toc_path: PathBuf,
    /// False when the TOC already listed exactly these documents.
    pub toc_updated: bool,
    pub documents: Vec<GeneratedDocument>,
    /// Earlier generated documents that were removed.
    pub deleted: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

/// Result of a run that did not fail.
#[derive(Debug)]
pub enum Outcome {
    Generated(GenerationReport),
    /// No `<Component>_*.tsc` file exists; nothing was touched.
    NoSources,
    /// Every source failed header validation; nothing was touched.
    Skipped {
        failures: Vec<EngineError>,
    },
}

/// Runs one generation for a resolved configuration.
#[derive(Debug, Clone)]
pub struct Generator {
    config: ResolvedConfig,
    parser: HeaderParser,
    names: DisplayNames,
}

impl Generator {
    pub fn new(config: ResolvedConfig) -> Self {
        let parser = HeaderParser::new(HeaderPolicy {
            allow_placeholders: config.allow_placeholder_headers,
        });
        let names = DisplayNames::with_overrides(&config.group_name_mappings);
        Self {
            config,
            parser,
            names,
        }
    }

    #[instrument(skip(self), fields(component = %self.config.component))]
    pub fn run(&self) -> Result<Outcome> {
        let component = self.config.component.as_str();

        let sources = discover_sources(&self.config.test_path, component)?;
        if sources.is_empty() {
            info!(test_path = %self.config.test_path.display(), "no source files found");
            return Ok(Outcome::NoSources);
        }

        let files = sources
            .iter()
            .cloned()
            .map(SourceFile::new)
            .collect::<Result<Vec<_>>>()?;

        let records = match self.parse_all(files)? {
            Parsed::All(records) => records,
            Parsed::Failed(mut failures, records) => {
                if records.is_empty() {
                    warn!(
                        failures = failures.len(),
                        "every source failed validation; skipping"
                    );
                    return Ok(Outcome::Skipped { failures });
                }
                return Err(failures.remove(0));
            }
        };

        let groups = group_records(records, &self.names);
        ensure_unique_file_names(&groups, component)?;
        debug!(groups = groups.len(), "grouped records");

        let toc_path = locate_toc(&self.config.spec_path, component)?;
        let out_dir = toc_path
            .parent()
            .unwrap_or(&self.config.spec_path)
            .to_path_buf();

        let renderer =
            DocumentRenderer::with_template_dir(component, self.config.template_dir.as_deref())?;
        let documents = groups
            .iter()
            .map(|group| renderer.render(group))
            .collect::<Result<Vec<_>>>()?;

        let toc_before = tscdoc_common_fs::read_to_string(&toc_path, MAX_TEXT_FILE_SIZE)?;
        let mut toc = TocDocument::parse(&toc_before);
        let entries: Vec<String> = documents.iter().map(|d| d.file_name.clone()).collect();
        toc.synchronize(component, &entries);
        let toc_after = toc.to_text();
        let toc_updated = toc_after != toc_before;

        let targets: Vec<PathBuf> = documents
            .iter()
            .map(|d| out_dir.join(&d.file_name))
            .collect();
        let stale = stale_generated_files(&out_dir, component, &targets)?;

        let mut staged = Vec::with_capacity(documents.len() + 1);
        for (doc, target) in documents.iter().zip(&targets) {
            staged.push((stage(target, &doc.contents)?, target.clone()));
        }
        if toc_updated {
            staged.push((stage(&toc_path, &toc_after)?, toc_path.clone()));
        }

        for (tmp, target) in staged {
            tmp.persist(&target)?;
            debug!(path = %target.display(), "wrote");
        }

        let mut deleted = Vec::new();
        for path in stale {
            if tscdoc_common_fs::remove_file_if_exists(&path)? {
                info!(path = %path.display(), "removed stale document");
                deleted.push(path);
            }
        }

        info!(
            documents = documents.len(),
            toc_updated,
            deleted = deleted.len(),
            "generation finished"
        );
        Ok(Outcome::Generated(report(
            sources,
            toc_path,
            toc_updated,
            documents,
            targets,
            deleted,
        )))
    }

    /// Parse every file, logging each failure.
    fn parse_all(&self, files: Vec<SourceFile>) -> Result<Parsed> {
        let mut records = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        for source in files {
            let text = tscdoc_common_fs::read_to_string(source.path(), MAX_TEXT_FILE_SIZE)?;
            match self.parser.parse(&text) {
                Ok(body) => records.push(TestRecord { source, body }),
                Err(e) => {
                    let failure = EngineError::HeaderParse {
                        path: source.path().to_path_buf(),
                        section: e.section,
                        line: e.line,
                    };
                    error!(path = %source.path().display(), line = e.line, "{failure}");
                    failures.push(failure);
                }
            }
        }

        if failures.is_empty() {
            Ok(Parsed::All(records))
        } else {
            Ok(Parsed::Failed(failures, records))
        }
    }
}

enum Parsed {
    All(Vec<TestRecord>),
    Failed(Vec<EngineError>, Vec<TestRecord>),
}

fn stage(target: &Path, contents: &str) -> Result<TempFile> {
    let mut tmp = TempFile::next_to(target)?;
    tmp.write(contents.as_bytes())?;
    Ok(tmp)
}

fn report(
    sources: Vec<PathBuf>,
    toc_path: PathBuf,
    toc_updated: bool,
    documents: Vec<RenderedDocument>,
    targets: Vec<PathBuf>,
    deleted: Vec<PathBuf>,
) -> GenerationReport {
    let mut warnings = Vec::new();
    let documents = documents
        .into_iter()
        .zip(targets)
        .map(|(doc, path)| {
            warnings.extend(doc.warnings);
            GeneratedDocument {
                path,
                group_key: doc.group_key,
                display_name: doc.display_name,
            }
        })
        .collect();

    GenerationReport {
        sources,
        toc_path,
        toc_updated,
        documents,
        deleted,
        warnings,
    }
}
