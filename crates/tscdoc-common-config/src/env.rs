//! Environment variable handling.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    /// Configuration file, same as `--config`.
    pub const TSCDOC_CONFIG: &str = "TSCDOC_CONFIG";
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Load `.env` from the working directory, if present.
///
/// Returns the file that was loaded. A missing file is not an error; a
/// malformed one is.
pub fn load_dotenv() -> Result<Option<PathBuf>, EnvError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Get an optional string variable; empty values count as unset.
pub fn get(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}
