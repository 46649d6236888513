//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser, ValueHint};
use is_terminal::IsTerminal;
use tscdoc_common_config::{env, ConfigOverrides, DEFAULT_CONFIG_FILE};
use tscdoc_common_log::{LogConfig, LogLevel};

/// tscdoc - generate reStructuredText test specifications
///
/// Reads the header comment of every `<Component>_<Group>_<Name>.tsc` test,
/// writes one specification document per group and keeps the component's
/// table of contents up to date.
#[derive(Debug, Parser)]
#[command(
    name = "tscdoc",
    author,
    version,
    about,
    long_about = None,
    help_template = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = env::vars::TSCDOC_CONFIG,
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file [default: tscdoc.yaml]"
    )]
    pub config: Option<PathBuf>,

    /// Component name, overriding the configuration file
    #[arg(long)]
    pub component: Option<String>,

    /// Directory searched for `.tsc` sources
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub test_path: Option<PathBuf>,

    /// Directory holding the component table of contents
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub spec_path: Option<PathBuf>,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors, warnings and the final banner
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// When to use terminal colors
    #[arg(long, default_value = "auto", value_enum)]
    pub color: ColorChoice,
}

impl Cli {
    /// Whether `--config` (or `TSCDOC_CONFIG`) named a file explicitly.
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some()
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            component: self.component.clone(),
            test_path: self.test_path.clone(),
            spec_path: self.spec_path.clone(),
        }
    }

    /// Colors for stdout.
    pub fn use_color(&self) -> bool {
        self.color_for(std::io::stdout().is_terminal())
    }

    fn color_for(&self, is_tty: bool) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => is_tty && env::get(env::vars::NO_COLOR).is_none(),
        }
    }

    /// Logging setup: `TSCDOC_LOG_*` first, verbosity flags unless the level
    /// was pinned by the environment.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig::from_env();
        if !LogConfig::level_from_env() {
            config = config.with_level(LogLevel::from_verbosity(self.verbose, self.quiet));
        }
        let ansi = config.ansi && self.color_for(std::io::stderr().is_terminal());
        config.with_ansi(ansi)
    }
}
