use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::header::Section;

/// Errors raised while turning test headers into specification documents.
///
/// Every variant is fatal for the run; nothing is written once one is
/// returned.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "no valid group token in file name `{base_name}` (expected <Component>_<Group>_<Name>)"
    )]
    GroupToken { path: PathBuf, base_name: String },

    #[error("missing or invalid `{section}` section in test header")]
    HeaderParse {
        path: PathBuf,
        section: Section,
        line: usize,
    },

    #[error("{name} not found under {} (recursive search)", spec_path.display())]
    TocNotFound { name: String, spec_path: PathBuf },

    #[error(
        "{name} found more than once at the same depth: {}",
        display_paths(candidates)
    )]
    TocAmbiguous {
        name: String,
        candidates: Vec<PathBuf>,
    },

    #[error("groups {} would all be written to {file_name}", keys.join(", "))]
    FileNameCollision {
        file_name: String,
        keys: Vec<String>,
        /// Sources of the colliding groups, sorted.
        sources: Vec<PathBuf>,
    },

    #[error("failed to search {}: {message}", path.display())]
    Discovery { path: PathBuf, message: String },

    #[error("invalid template `{name}`: {source}")]
    Template {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("failed to render `{name}`: {source}")]
    Render {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error(transparent)]
    Persistence(#[from] tscdoc_common_core::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl EngineError {
    /// File the error points at, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::GroupToken { path, .. }
            | Self::HeaderParse { path, .. }
            | Self::Discovery { path, .. } => Some(path),
            Self::TocNotFound { spec_path, .. } => Some(spec_path),
            Self::TocAmbiguous { candidates, .. } => candidates.first().map(PathBuf::as_path),
            Self::FileNameCollision { sources, .. } => sources.first().map(PathBuf::as_path),
            Self::Persistence(e) => e.path(),
            Self::Template { .. } | Self::Render { .. } => None,
        }
    }

    /// 1-based line the error points at; `1` when there is no better answer.
    pub fn line(&self) -> usize {
        match self {
            Self::HeaderParse { line, .. } => (*line).max(1),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parse_location() {
        let err = EngineError::HeaderParse {
            path: PathBuf::from("/t/Bogus_Generate_A.tsc"),
            section: Section::Requirements,
            line: 0,
        };
        assert_eq!(err.path(), Some(Path::new("/t/Bogus_Generate_A.tsc")));
        assert_eq!(err.line(), 1);
        assert_eq!(
            err.to_string(),
            "missing or invalid `Requirements` section in test header"
        );
    }

    #[test]
    fn test_ambiguous_lists_candidates() {
        let err = EngineError::TocAmbiguous {
            name: "Bogus_component_test.rst".into(),
            candidates: vec![PathBuf::from("/s/a/x.rst"), PathBuf::from("/s/b/x.rst")],
        };
        assert!(err.to_string().contains("/s/a/x.rst, /s/b/x.rst"));
        assert_eq!(err.path(), Some(Path::new("/s/a/x.rst")));
    }

    #[test]
    fn test_file_name_collision_message() {
        let err = EngineError::FileNameCollision {
            file_name: "Bogus_oAW_Generator_Tests.rst".into(),
            keys: vec!["Generate".into(), "generate".into()],
            sources: vec![PathBuf::from("/t/Bogus_Generate_A.tsc")],
        };
        assert_eq!(
            err.to_string(),
            "groups Generate, generate would all be written to Bogus_oAW_Generator_Tests.rst"
        );
        assert_eq!(err.path(), Some(Path::new("/t/Bogus_Generate_A.tsc")));
    }
}
