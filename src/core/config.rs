//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.lampstand/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct LampstandConfig {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    pub library_dir: Option<String>,
    pub install_dir: Option<String>,
    pub default_source: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub default_module: Option<String>,
    pub default_reference: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SOURCE: &str = "CrossWire";
pub const DEFAULT_REFERENCE: &str = "Gen 1:1";
const LIBRARY_DIR_NAME: &str = ".sword";
const INSTALL_DIR_NAME: &str = "InstallMgr";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub library_dir: PathBuf,
    pub install_dir: PathBuf,
    pub default_source: String,
    pub default_module: Option<String>,
    pub default_reference: String,
}

impl ResolvedConfig {
    /// Sparse config that reproduces these values when loaded again.
    pub fn to_config(&self) -> LampstandConfig {
        LampstandConfig {
            library: LibraryConfig {
                library_dir: Some(self.library_dir.display().to_string()),
                install_dir: Some(self.install_dir.display().to_string()),
                default_source: Some(self.default_source.clone()),
            },
            display: DisplayConfig {
                default_module: self.default_module.clone(),
                default_reference: Some(self.default_reference.clone()),
            },
        }
    }
}

/// CLI flag overrides (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub library_dir: Option<String>,
    pub default_source: Option<String>,
    pub module: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading & Saving
// ============================================================================

/// Returns the path to `~/.lampstand/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lampstand").join("config.toml"))
}

/// Load config from `~/.lampstand/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LampstandConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<LampstandConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(LampstandConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(LampstandConfig::default());
    }

    load_config_from(&path)
}

/// Load and parse a specific config file.
pub fn load_config_from(path: &Path) -> Result<LampstandConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: LampstandConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Write `config` to `path` atomically (write `.tmp`, then `rename()`).
pub fn save_config(path: &Path, config: &LampstandConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ConfigError::Io)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents).map_err(ConfigError::Io)?;
    fs::rename(&tmp_path, path).map_err(ConfigError::Io)?;
    info!("Saved config to {}", path.display());
    Ok(())
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Lampstand Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [library]
# library_dir = "~/.sword"              # Or set LAMPSTAND_LIBRARY_DIR
# install_dir = "~/.sword/InstallMgr"   # Or set LAMPSTAND_INSTALL_DIR
# default_source = "CrossWire"          # Or set LAMPSTAND_SOURCE

# [display]
# default_module = "KJV"
# default_reference = "Gen 1:1"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &LampstandConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading env vars through `env`.
pub fn resolve_with_env(
    config: &LampstandConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Library dir: CLI → env → config → ~/.sword
    let library_dir = cli
        .library_dir
        .clone()
        .or_else(|| env("LAMPSTAND_LIBRARY_DIR"))
        .or_else(|| config.library.library_dir.clone())
        .map(|dir| expand_home(&dir))
        .unwrap_or_else(default_library_dir);

    // Install dir: env → config → <library_dir>/InstallMgr
    let install_dir = env("LAMPSTAND_INSTALL_DIR")
        .or_else(|| config.library.install_dir.clone())
        .map(|dir| expand_home(&dir))
        .unwrap_or_else(|| library_dir.join(INSTALL_DIR_NAME));

    // Remote source: CLI → env → config → default
    let default_source = cli
        .default_source
        .clone()
        .or_else(|| env("LAMPSTAND_SOURCE"))
        .or_else(|| config.library.default_source.clone())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    ResolvedConfig {
        library_dir,
        install_dir,
        default_source,
        default_module: cli
            .module
            .clone()
            .or_else(|| config.display.default_module.clone()),
        default_reference: config
            .display
            .default_reference
            .clone()
            .unwrap_or_else(|| DEFAULT_REFERENCE.to_string()),
    }
}

fn default_library_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(LIBRARY_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(LIBRARY_DIR_NAME))
}

/// Expands a leading `~/` to the home directory.
fn expand_home(dir: &str) -> PathBuf {
    match (dir.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(dir),
    }
}
