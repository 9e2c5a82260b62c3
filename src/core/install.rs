//! # Module Installer
//!
//! Tracks which remote source is selected and what it offers, on top of an
//! [`Installer`] backend.
//!
//! ```text
//! InstallManager::new      first run? → init_config()
//!        │                 sources = remote_sources()
//!        ▼
//! select_source(name)      "" → default source
//!        │                 refresh_source() → remote_modules
//!        ▼
//! install(module)          must be offered by the selected source
//! ```

use std::sync::Arc;

use log::{info, warn};

use crate::core::catalog::{ModuleInfo, UNKNOWN_VERSION};
use crate::core::config::ResolvedConfig;
use crate::library::{InstallError, Installer};

pub struct InstallManager {
    installer: Arc<dyn Installer>,
    default_source: String,
    pub sources: Vec<String>,
    pub selected_source: Option<String>,
    pub remote_modules: Vec<ModuleInfo>,
}

impl InstallManager {
    /// Prepares the installer, writing its config first if this is a first run.
    pub fn new(
        installer: Arc<dyn Installer>,
        default_source: impl Into<String>,
    ) -> Result<Self, InstallError> {
        if !installer.has_config() {
            info!("No installer config found, creating one");
            installer.init_config()?;
        }
        let sources = installer.remote_sources();
        info!("Installer has {} remote sources", sources.len());

        Ok(Self {
            installer,
            default_source: default_source.into(),
            sources,
            selected_source: None,
            remote_modules: Vec::new(),
        })
    }

    pub fn from_config(
        installer: Arc<dyn Installer>,
        config: &ResolvedConfig,
    ) -> Result<Self, InstallError> {
        Self::new(installer, config.default_source.clone())
    }

    /// The source `name` refers to; an empty name means the default source.
    pub fn resolve_source(&self, name: &str) -> Result<String, InstallError> {
        let name = if name.is_empty() {
            self.default_source.as_str()
        } else {
            name
        };
        if self.sources.iter().any(|s| s == name) {
            Ok(name.to_string())
        } else {
            Err(InstallError::SourceNotFound(name.to_string()))
        }
    }

    /// Selects and refreshes a source, returning the modules it offers.
    ///
    /// Modules that don't declare a version are listed as `NA`.
    pub fn select_source(&mut self, name: &str) -> Result<&[ModuleInfo], InstallError> {
        let source = self.resolve_source(name)?;
        let mut modules = self.installer.refresh_source(&source)?;
        for module in &mut modules {
            module
                .version
                .get_or_insert_with(|| UNKNOWN_VERSION.to_string());
        }
        info!("Remote source {} offers {} modules", source, modules.len());

        self.selected_source = Some(source);
        self.remote_modules = modules;
        Ok(&self.remote_modules)
    }

    /// Checks that `module` can be installed from the selected source.
    pub fn check_offered(&self, module: &str) -> Result<&str, InstallError> {
        let source = self
            .selected_source
            .as_deref()
            .ok_or(InstallError::NoSourceSelected)?;
        if self.remote_modules.iter().any(|m| m.name == module) {
            Ok(source)
        } else {
            Err(InstallError::ModuleNotOffered {
                source: source.to_string(),
                module: module.to_string(),
            })
        }
    }

    /// Installs `module` from the selected source. Returns the source name.
    pub fn install(&self, module: &str) -> Result<String, InstallError> {
        let source = self.check_offered(module)?;
        if let Err(e) = self.installer.install_module(source, module) {
            warn!("Install of {} from {} failed: {}", module, source, e);
            return Err(e);
        }
        info!("Installed {} from {}", module, source);
        Ok(source.to_string())
    }
}
