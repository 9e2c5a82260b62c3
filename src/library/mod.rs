//! # Module Library
//!
//! The boundary to whatever actually stores, indexes and renders modules.
//! Lampstand never reads module files itself; it asks a [`ModuleLibrary`]
//! for raw markup and post-processes the result.
//!
//! Backends are not assumed to be re-entrant. Share them behind an `Arc` and
//! let the implementation serialize calls internally.
//!
//! Installing new modules goes through a second seam, [`Installer`], which
//! fronts the remote catalogs a backend knows about. Fetching and catalog
//! parsing stay on the other side of it.

use std::fmt;

use crate::core::catalog::ModuleInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// No installed module has this name.
    ModuleNotFound(String),
    /// The module couldn't resolve the reference.
    InvalidReference(String),
    /// Anything else the backend reports.
    Backend(String),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::ModuleNotFound(name) => write!(f, "module not found: {name}"),
            LibraryError::InvalidReference(key) => write!(f, "invalid reference: {key}"),
            LibraryError::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl std::error::Error for LibraryError {}

/// Global option filter that shows Strong's numbers in rendered text.
pub const STRONGS_OPTION: &str = "Strong's Numbers";

pub trait ModuleLibrary: Send + Sync {
    /// Human-readable backend version, shown in the status line.
    fn version(&self) -> String;

    /// Every installed module, in the backend's enumeration order.
    fn modules(&self) -> Result<Vec<ModuleInfo>, LibraryError>;

    /// Raw rendered markup for one reference, as UTF-8 bytes.
    fn render_raw(&self, module: &str, reference: &str) -> Result<Vec<u8>, LibraryError>;

    /// The reference `delta` entries away from `reference` (negative steps back).
    fn step_reference(
        &self,
        module: &str,
        reference: &str,
        delta: i32,
    ) -> Result<String, LibraryError>;

    /// Switches a named option filter on or off for `module`.
    fn set_option(&self, module: &str, option: &str, on: bool) -> Result<(), LibraryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// No module installer is attached.
    NotConfigured,
    /// The installer's own configuration couldn't be created or read.
    Config(String),
    /// No remote source goes by this name.
    SourceNotFound(String),
    /// Fetching a source's module list failed.
    Refresh { source: String, message: String },
    /// An install was requested before any source was chosen.
    NoSourceSelected,
    /// The selected source doesn't carry this module.
    ModuleNotOffered { source: String, module: String },
    /// The backend gave up writing the module (usually permissions).
    InstallFailed { module: String, message: String },
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallError::NotConfigured => write!(f, "no module installer available"),
            InstallError::Config(msg) => write!(f, "installer config error: {msg}"),
            InstallError::SourceNotFound(name) => {
                write!(f, "couldn't find remote source {name}")
            }
            InstallError::Refresh { source, message } => {
                write!(f, "error refreshing remote source {source}: {message}")
            }
            InstallError::NoSourceSelected => write!(f, "no remote source selected"),
            InstallError::ModuleNotOffered { source, module } => {
                write!(f, "remote source {source} does not make available module [{module}]")
            }
            InstallError::InstallFailed { module, message } => {
                write!(f, "error installing module [{module}]: {message}")
            }
        }
    }
}

impl std::error::Error for InstallError {}

pub trait Installer: Send + Sync {
    /// Whether the installer config exists yet (false on first run).
    fn has_config(&self) -> bool;

    /// Writes a fresh installer config with the built-in remote sources.
    fn init_config(&self) -> Result<(), InstallError>;

    /// Names of every configured remote source.
    fn remote_sources(&self) -> Vec<String>;

    /// Refreshes `source` and lists the modules it offers.
    fn refresh_source(&self, source: &str) -> Result<Vec<ModuleInfo>, InstallError>;

    /// Installs `module` from `source` into the local library.
    fn install_module(&self, source: &str, module: &str) -> Result<(), InstallError>;
}
