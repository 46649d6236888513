//! Console output: report lines, diagnostics and the final status banner.
//!
//! Reports and banners go to stdout, diagnostics to stderr.

pub mod banner;
pub mod printer;

pub use banner::Banner;
pub use printer::{diagnostic, Printer, Severity};
