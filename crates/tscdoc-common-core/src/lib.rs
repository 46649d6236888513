//! tscdoc common core types.
//!
//! The error vocabulary shared by the file-system layer and everything
//! built on it.

pub mod error;

pub use error::{Error, ErrorCategory, ErrorCode, Result};
