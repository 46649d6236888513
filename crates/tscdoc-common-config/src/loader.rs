//! Configuration file loading, merging and validation.

use crate::types::{ConfigOverrides, ResolvedConfig, TscdocConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use tscdoc_common_fs::path as fs_path;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tscdoc.yaml";

const MAX_CONFIG_SIZE: usize = 1024 * 1024;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config {}: {message}", path.display())]
    ReadError { path: PathBuf, message: String },

    #[error("invalid config at line {}: {message}", display_line(line))]
    ParseError {
        line: Option<usize>,
        message: String,
    },

    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error("`{key}` directory does not exist: {}", path.display())]
    MissingDirectory { key: &'static str, path: PathBuf },
}

fn display_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => line.to_string(),
        None => "unknown".to_string(),
    }
}

/// Syntax of a configuration file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.json` is JSON, anything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Configuration loader for one configuration file.
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given configuration file.
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory that relative paths in the file are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        match self.config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Load and parse the configuration file.
    pub fn load(&self) -> Result<TscdocConfig, ConfigError> {
        let path = &self.config_path;
        if !path.is_file() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }

        let contents = tscdoc_common_fs::read_to_string(path, MAX_CONFIG_SIZE).map_err(|e| {
            ConfigError::ReadError {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        let expanded = expand_env_vars(&contents)?;

        let format = ConfigFormat::from_path(path);
        debug!(path = %path.display(), ?format, "parsing configuration");
        parse(&expanded, format)
    }

    /// Load the file, falling back to defaults when it does not exist.
    pub fn load_or_default(&self) -> Result<TscdocConfig, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound { path }) => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(TscdocConfig::default())
            }
            other => other,
        }
    }

    /// Load, merge `overrides` and validate.
    ///
    /// Override paths are resolved against `cwd`; file paths against the
    /// directory of the configuration file.
    pub fn resolve(
        &self,
        config: TscdocConfig,
        overrides: &ConfigOverrides,
        cwd: &Path,
    ) -> Result<ResolvedConfig, ConfigError> {
        let base = fs_path::resolve(cwd, self.base_dir());

        let component = overrides
            .component
            .clone()
            .unwrap_or(config.component)
            .trim()
            .to_string();
        validate_component(&component)?;

        let test_path = pick_path(
            "test_path",
            &overrides.test_path,
            cwd,
            &config.test_path,
            &base,
        )?;
        let spec_path = pick_path(
            "spec_path",
            &overrides.spec_path,
            cwd,
            &config.spec_path,
            &base,
        )?;
        let template_dir = config.template_dir.map(|p| fs_path::resolve(&base, p));

        let resolved = ResolvedConfig {
            component,
            test_path,
            spec_path,
            group_name_mappings: normalize_mappings(config.group_name_mappings)?,
            allow_placeholder_headers: config.allow_placeholder_headers,
            template_dir,
        };

        validate_dirs(&resolved)?;
        Ok(resolved)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

/// Parse configuration text in the given format.
pub fn parse(contents: &str, format: ConfigFormat) -> Result<TscdocConfig, ConfigError> {
    match format {
        ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| ConfigError::ParseError {
            line: Some(e.line()),
            message: e.to_string(),
        }),
        ConfigFormat::Yaml => {
            // An empty YAML document means "all defaults".
            if contents.trim().is_empty() {
                return Ok(TscdocConfig::default());
            }
            serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })
        }
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
pub fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
        ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        }
    })?;

    let mut result = String::with_capacity(content.len());
    let mut last = 0;
    for cap in re.captures_iter(content) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match default {
                Some(d) => d.to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result.push_str(&content[last..full_match.start()]);
        result.push_str(&value);
        last = full_match.end();
    }
    result.push_str(&content[last..]);

    Ok(result)
}

fn validate_component(component: &str) -> Result<(), ConfigError> {
    if component.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "component",
            message: "must not be empty".to_string(),
        });
    }
    if component
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\' || c == '_')
    {
        return Err(ConfigError::InvalidValue {
            key: "component",
            message: format!("`{component}` must not contain whitespace, `_` or path separators"),
        });
    }
    Ok(())
}

fn pick_path(
    key: &'static str,
    overridden: &Option<PathBuf>,
    cwd: &Path,
    from_file: &Option<PathBuf>,
    base: &Path,
) -> Result<PathBuf, ConfigError> {
    match (overridden, from_file) {
        (Some(p), _) => Ok(fs_path::resolve(cwd, p)),
        (None, Some(p)) => Ok(fs_path::resolve(base, p)),
        (None, None) => Err(ConfigError::InvalidValue {
            key,
            message: "is required".to_string(),
        }),
    }
}

fn normalize_mappings(
    mappings: BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut normalized = BTreeMap::new();
    for (raw, display) in mappings {
        let display = display.trim();
        if raw.trim().is_empty() || display.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "group_name_mappings",
                message: format!("empty key or value in mapping `{raw}` -> `{display}`"),
            });
        }
        normalized.insert(raw.trim().to_lowercase(), display.to_string());
    }
    Ok(normalized)
}

fn validate_dirs(config: &ResolvedConfig) -> Result<(), ConfigError> {
    for (key, path) in [
        ("test_path", &config.test_path),
        ("spec_path", &config.spec_path),
    ] {
        if !path.is_dir() {
            return Err(ConfigError::MissingDirectory {
                key,
                path: path.clone(),
            });
        }
    }
    if let Some(dir) = &config.template_dir {
        if !dir.is_dir() {
            return Err(ConfigError::MissingDirectory {
                key: "template_dir",
                path: dir.clone(),
            });
        }
    }
    Ok(())
}
