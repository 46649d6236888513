//! tscdoc CLI library
//!
//! Argument parsing, error reporting and console output for the `tscdoc`
//! binary.

pub mod cli;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, Exit};
