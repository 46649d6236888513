//! Logging infrastructure for tscdoc.
//!
//! Library crates only emit `tracing` events; the binary calls [`init`] once
//! with a [`LogConfig`] built from the environment and command-line flags.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Minimum level, e.g. `debug`. Wins over `-v`/`-q`.
pub const LOG_LEVEL_VAR: &str = "TSCDOC_LOG_LEVEL";
/// `pretty`, `compact` or `json`.
pub const LOG_FORMAT_VAR: &str = "TSCDOC_LOG_FORMAT";
/// Extra log file.
pub const LOG_FILE_VAR: &str = "TSCDOC_LOG_FILE";
const NO_COLOR_VAR: &str = "NO_COLOR";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Additional log file, always without ANSI colours.
    pub file_path: Option<PathBuf>,
    /// Colourize stderr output.
    pub ansi: bool,
    /// Include source location.
    pub source_location: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Nothing at all.
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            "off" | "none" => Some(Self::Off),
            _ => None,
        }
    }

    /// Level for a `-v`/`-q` count pair, starting from `warn`.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Error;
        }
        match verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-field format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON structured format.
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "full" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            ansi: true,
            source_location: false,
        }
    }
}

impl LogConfig {
    /// Create config from `TSCDOC_LOG_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(level) = env_var(LOG_LEVEL_VAR).and_then(|l| LogLevel::parse(&l)) {
            config.level = level;
        }
        if let Some(format) = env_var(LOG_FORMAT_VAR).and_then(|f| LogFormat::parse(&f)) {
            config.format = format;
        }
        if let Some(file_path) = env_var(LOG_FILE_VAR) {
            config.file_path = Some(PathBuf::from(file_path));
        }
        if env_var(NO_COLOR_VAR).is_some() {
            config.ansi = false;
        }

        config
    }

    /// Whether `TSCDOC_LOG_LEVEL` pinned the level, so flags must not override it.
    pub fn level_from_env() -> bool {
        env_var(LOG_LEVEL_VAR)
            .and_then(|l| LogLevel::parse(&l))
            .is_some()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

fn stderr_layer(config: &LogConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.ansi)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Pretty => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn file_layer(config: &LogConfig, path: &PathBuf) -> Result<BoxedLayer, LogError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    Ok(match config.format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.boxed(),
    })
}

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()))
}

/// Initialize logging with the given configuration.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let mut layers = vec![stderr_layer(&config)];
    if let Some(path) = &config.file_path {
        layers.push(file_layer(&config, path)?);
    }

    tracing_subscriber::registry()
        .with(build_filter(&config))
        .with(layers)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}
