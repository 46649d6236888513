//! Configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration file contents, as written by the user.
///
/// Relative paths are interpreted against the directory holding the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TscdocConfig {
    /// Component name; the prefix of every source and generated file.
    pub component: String,
    /// Root of the `.tsc` source tree.
    pub test_path: Option<PathBuf>,
    /// Root of the specification tree holding the TOC document.
    pub spec_path: Option<PathBuf>,
    /// Extra or overriding group display names, keyed by raw group key.
    pub group_name_mappings: BTreeMap<String, String>,
    /// Accept headers whose four sections are all present but empty.
    pub allow_placeholder_headers: bool,
    /// Directory with template overrides.
    pub template_dir: Option<PathBuf>,
}

/// Values supplied on the command line; they win over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub component: Option<String>,
    pub test_path: Option<PathBuf>,
    pub spec_path: Option<PathBuf>,
}

/// Fully merged and validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub component: String,
    /// Absolute, normalized, existing directory.
    pub test_path: PathBuf,
    /// Absolute, normalized, existing directory.
    pub spec_path: PathBuf,
    /// Keys lowercased, values trimmed.
    pub group_name_mappings: BTreeMap<String, String>,
    pub allow_placeholder_headers: bool,
    pub template_dir: Option<PathBuf>,
}
