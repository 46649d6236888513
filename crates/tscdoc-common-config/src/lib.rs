//! Configuration for tscdoc.
//!
//! A run is described by a YAML or JSON file (default `tscdoc.yaml`) whose
//! values can be overridden from the command line. [`ConfigLoader`] turns
//! both into a [`ResolvedConfig`] with absolute, existing directories.

pub mod env;
pub mod loader;
pub mod types;

pub use env::{load_dotenv, EnvError};
pub use loader::{ConfigError, ConfigFormat, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use types::{ConfigOverrides, ResolvedConfig, TscdocConfig};
