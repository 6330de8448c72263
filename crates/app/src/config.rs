//! Configuration discovery
//!
//! Order: `--config <path>`, then `RANDOBOT_CONFIG`, then `randobot.toml`
//! in the platform config directory. An explicitly named file must exist;
//! the platform default is optional.

use std::ffi::OsString;
use std::path::PathBuf;

use directories::ProjectDirs;
use randobot_core::{BotConfig, Result};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "RANDOBOT_CONFIG";

const CONFIG_FILE: &str = "randobot.toml";

/// Where a config file was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line or in the environment
    Explicit(PathBuf),
    /// Platform config directory
    Platform(PathBuf),
    /// Nothing found, built-in defaults
    Builtin,
}

/// Pick the `--config` value out of command-line arguments
pub fn config_arg<I>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

/// Default config path in the platform config directory
pub fn platform_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "dwrandomizer", "randobot").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Decide which config to use
pub fn resolve(cli: Option<PathBuf>, env: Option<OsString>, platform: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = cli.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from)) {
        return ConfigSource::Explicit(path);
    }
    match platform {
        Some(path) if path.exists() => ConfigSource::Platform(path),
        _ => ConfigSource::Builtin,
    }
}

/// Load the config a source points at
pub fn load(source: &ConfigSource) -> Result<BotConfig> {
    match source {
        ConfigSource::Explicit(path) | ConfigSource::Platform(path) => Ok(BotConfig::load(path)?),
        ConfigSource::Builtin => {
            tracing::info!("No config file found, using built-in configuration");
            Ok(BotConfig::default())
        }
    }
}
