//! CLI error type and exit codes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use thiserror::Error;
use tscdoc_common_config::{ConfigError, EnvError};
use tscdoc_common_core::ErrorCategory;
use tscdoc_common_log::LogError;
use tscdoc_spec::EngineError;

/// Application exit codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    ValidationError = 5,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// Everything that can end a run early.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{source}")]
    Config {
        /// Configuration file in use.
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error("failed to determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl CliError {
    pub fn config(path: impl Into<PathBuf>, source: ConfigError) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }

    pub fn exit(&self) -> Exit {
        match self {
            Self::Config { .. } | Self::Env(_) => Exit::ConfigError,
            Self::Log(_) => Exit::GeneralError,
            Self::WorkingDir(_) => Exit::IoError,
            Self::Engine(e) => match e {
                EngineError::GroupToken { .. }
                | EngineError::HeaderParse { .. }
                | EngineError::TocNotFound { .. }
                | EngineError::TocAmbiguous { .. }
                | EngineError::FileNameCollision { .. } => Exit::ValidationError,
                EngineError::Discovery { .. } => Exit::IoError,
                EngineError::Persistence(e) => match e.category() {
                    ErrorCategory::FileSystem => Exit::IoError,
                    ErrorCategory::Internal => Exit::GeneralError,
                },
                EngineError::Template { .. } | EngineError::Render { .. } => Exit::GeneralError,
            },
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit().into()
    }

    /// File and 1-based line to report the error at, when there is one.
    pub fn location(&self) -> Option<(&Path, usize)> {
        match self {
            Self::Config { path, source } => Some(match source {
                ConfigError::NotFound { path }
                | ConfigError::ReadError { path, .. }
                | ConfigError::MissingDirectory { path, .. } => (path.as_path(), 1),
                ConfigError::ParseError { line, .. } => (path.as_path(), line.unwrap_or(1).max(1)),
                ConfigError::InvalidValue { .. } | ConfigError::EnvVarNotFound { .. } => {
                    (path.as_path(), 1)
                }
            }),
            Self::Engine(e) => e.path().map(|p| (p, e.line())),
            Self::Env(_) | Self::Log(_) | Self::WorkingDir(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tscdoc_spec::Section;

    #[test]
    fn test_header_error_is_validation() {
        let err = CliError::from(EngineError::HeaderParse {
            path: PathBuf::from("t/Crypto_Sign_A.tsc"),
            section: Section::Input,
            line: 3,
        });
        assert_eq!(err.exit(), Exit::ValidationError);
        assert_eq!(err.location(), Some((Path::new("t/Crypto_Sign_A.tsc"), 3)));
    }

    #[test]
    fn test_persistence_error_is_io() {
        let missing = tscdoc_common_core::Error::file_not_found("spec/Crypto_component_test.rst");
        let err = CliError::from(EngineError::from(missing));
        assert_eq!(err.exit(), Exit::IoError);
        assert_eq!(
            err.location(),
            Some((Path::new("spec/Crypto_component_test.rst"), 1))
        );
    }

    #[test]
    fn test_file_name_collision_is_validation() {
        let err = CliError::from(EngineError::FileNameCollision {
            file_name: "Crypto_oAW_Generator_Tests.rst".into(),
            keys: vec!["Generate".into(), "generate".into()],
            sources: vec![PathBuf::from("t/Crypto_Generate_A.tsc")],
        });
        assert_eq!(err.exit(), Exit::ValidationError);
        assert_eq!(
            err.location(),
            Some((Path::new("t/Crypto_Generate_A.tsc"), 1))
        );
    }

    #[test]
    fn test_config_parse_error_location() {
        let err = CliError::config(
            "tscdoc.yaml",
            ConfigError::ParseError {
                line: Some(4),
                message: "bad".into(),
            },
        );
        assert_eq!(err.exit(), Exit::ConfigError);
        assert_eq!(err.location(), Some((Path::new("tscdoc.yaml"), 4)));
    }

    #[test]
    fn test_missing_directory_points_at_directory() {
        let err = CliError::config(
            "tscdoc.yaml",
            ConfigError::MissingDirectory {
                key: "spec_path",
                path: PathBuf::from("/nowhere"),
            },
        );
        assert_eq!(err.location(), Some((Path::new("/nowhere"), 1)));
    }
}
