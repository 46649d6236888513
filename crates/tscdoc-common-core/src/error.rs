//! Error types for tscdoc.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Boxed error source carried by [`Error`] variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    pub const FILE_NOT_FOUND: Self = Self("FS001");
    pub const FILE_READ_ERROR: Self = Self("FS002");
    pub const FILE_WRITE_ERROR: Self = Self("FS003");
    pub const FILE_DELETE_ERROR: Self = Self("FS004");
    pub const DIRECTORY_ERROR: Self = Self("FS005");
    pub const INTERNAL: Self = Self("IN001");

    /// The code as printed in diagnostics.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Broad grouping of errors, used for exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    FileSystem,
    Internal,
}

/// The main error type for tscdoc operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A read, write, rename or delete failed at the storage boundary.
    #[error("{message}")]
    FileSystem {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Anything else, with optional context.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl Error {
    /// Create a file-system error for `path`.
    pub fn file_system(
        code: ErrorCode,
        message: impl Into<String>,
        path: impl AsRef<Path>,
        source: Option<BoxedSource>,
    ) -> Self {
        Self::FileSystem {
            code,
            message: message.into(),
            path: Some(path.as_ref().to_path_buf()),
            source,
        }
    }

    /// Create a file-not-found error.
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::file_system(
            ErrorCode::FILE_NOT_FOUND,
            format!("file not found: {}", path.display()),
            path,
            None,
        )
    }

    /// Create an internal error without a source.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            source: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::FileSystem { code, .. } => *code,
            Self::Internal { .. } => ErrorCode::INTERNAL,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileSystem { .. } => ErrorCategory::FileSystem,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FileSystem { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias using tscdoc's Error.
pub type Result<T> = std::result::Result<T, Error>;
