//! # Viewer State
//!
//! Everything the viewer knows, in one explicit context object that callers
//! pass around instead of reaching for a global backend.
//!
//! ```text
//! Viewer
//! ├── library: Arc<dyn ModuleLibrary>  // external module backend
//! ├── groups: ModuleGroups             // installed modules by kind
//! ├── selected_module: Option<String>  // module being read
//! ├── reference: String                // current position
//! ├── history: Vec<String>             // references to go back to
//! ├── status_message: String           // status bar text
//! ├── error: Option<String>            // last error shown to the user
//! └── installer: Option<InstallManager> // remote sources, if attached
//! ```
//!
//! Navigation decisions happen in `update(viewer, action)` in action.rs.
//! The methods here that touch the library are `render`, `step`,
//! `select_source` and `install`.

use std::sync::Arc;

use log::{info, warn};

use crate::core::catalog::ModuleGroups;
use crate::core::config::{DEFAULT_REFERENCE, ResolvedConfig};
use crate::core::install::InstallManager;
use crate::library::{InstallError, ModuleLibrary, STRONGS_OPTION};
use crate::markup::{RenderError, render_for_display};

pub struct Viewer {
    pub library: Arc<dyn ModuleLibrary>,
    pub groups: ModuleGroups,
    pub selected_module: Option<String>,
    pub reference: String,
    pub history: Vec<String>,
    pub status_message: String,
    pub error: Option<String>,
    pub installer: Option<InstallManager>,
}

/// Groups the library's modules and sets each one's Strong's numbers filter.
fn load_groups(library: &dyn ModuleLibrary) -> Result<ModuleGroups, String> {
    let modules = library.modules().map_err(|e| {
        warn!("Failed to enumerate modules: {}", e);
        e.to_string()
    })?;
    let groups = ModuleGroups::from_modules(&modules);
    if groups.is_empty() {
        warn!("No readable modules installed");
    }

    for (kind, name) in groups.iter() {
        if let Err(e) = library.set_option(name, STRONGS_OPTION, kind.shows_strongs()) {
            warn!("Couldn't set {} for {}: {}", STRONGS_OPTION, name, e);
        }
    }
    Ok(groups)
}

impl Viewer {
    pub fn new(library: Arc<dyn ModuleLibrary>) -> Self {
        let (groups, error) = match load_groups(library.as_ref()) {
            Ok(groups) => (groups, None),
            Err(e) => (ModuleGroups::default(), Some(e)),
        };

        let status_message = format!("Welcome to Lampstand! Using {}", library.version());
        Self {
            selected_module: groups.bibles.first().cloned(),
            library,
            groups,
            reference: DEFAULT_REFERENCE.to_string(),
            history: Vec::new(),
            status_message,
            error,
            installer: None,
        }
    }

    pub fn with_installer(mut self, installer: InstallManager) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Builds a viewer and applies the configured module and starting reference.
    pub fn from_config(library: Arc<dyn ModuleLibrary>, config: &ResolvedConfig) -> Self {
        let mut viewer = Self::new(library);
        viewer.reference = config.default_reference.clone();
        if let Some(ref name) = config.default_module {
            if viewer.groups.contains(name) {
                viewer.selected_module = Some(name.clone());
            } else {
                warn!("Configured module {} is not installed", name);
            }
        }
        viewer
    }

    /// Moves to `reference`, remembering where we were.
    pub fn go_to(&mut self, reference: String) {
        if reference != self.reference {
            let previous = std::mem::replace(&mut self.reference, reference);
            self.history.push(previous);
        }
        self.error = None;
    }

    /// Display-ready markup for the current module and reference.
    pub fn render(&self) -> Result<String, RenderError> {
        let module = self
            .selected_module
            .as_deref()
            .ok_or(RenderError::NoModuleSelected)?;
        render_for_display(self.library.as_ref(), module, &self.reference)
    }

    /// Steps `delta` entries through the selected module.
    pub fn step(&mut self, delta: i32) -> Result<(), RenderError> {
        let module = self
            .selected_module
            .as_deref()
            .ok_or(RenderError::NoModuleSelected)?;
        let next = self.library.step_reference(module, &self.reference, delta)?;
        info!("Stepped {delta} from {} to {next}", self.reference);
        self.go_to(next);
        Ok(())
    }

    /// Selects a remote source (empty for the default) and lists its modules.
    pub fn select_source(&mut self, name: &str) -> Result<(), InstallError> {
        let manager = self.installer.as_mut().ok_or(InstallError::NotConfigured)?;
        let count = manager.select_source(name)?.len();
        if let Some(source) = manager.selected_source.as_deref() {
            self.status_message = format!("{source}: {count} modules available");
        }
        self.error = None;
        Ok(())
    }

    /// Installs `module` from the selected source and reloads the module list.
    pub fn install(&mut self, module: &str) -> Result<(), InstallError> {
        let manager = self.installer.as_ref().ok_or(InstallError::NotConfigured)?;
        let source = manager.install(module)?;

        match load_groups(self.library.as_ref()) {
            Ok(groups) => self.groups = groups,
            Err(e) => self.error = Some(e),
        }
        if self.selected_module.is_none() {
            self.selected_module = self.groups.bibles.first().cloned();
        }
        self.status_message = format!("Installed {module} from {source}");
        Ok(())
    }
}
