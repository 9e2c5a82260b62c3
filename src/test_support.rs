//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::catalog::ModuleInfo;
use crate::core::install::InstallManager;
use crate::core::state::Viewer;
use crate::library::{InstallError, Installer, LibraryError, ModuleLibrary};

/// Builds a `ModuleInfo` with placeholder language and description.
pub fn module(name: &str, module_type: &str) -> ModuleInfo {
    ModuleInfo {
        name: name.to_string(),
        module_type: module_type.to_string(),
        language: "en".to_string(),
        description: format!("{name} test module"),
        version: None,
    }
}

/// An in-memory library: modules plus canned text keyed by (module, reference).
///
/// References step through `order`, the list of keys in insertion order.
/// Option changes are recorded, and `FakeInstaller` adds to `installed`.
#[derive(Default)]
pub struct FakeLibrary {
    modules: Vec<ModuleInfo>,
    texts: HashMap<(String, String), Vec<u8>>,
    order: Vec<String>,
    installed: Mutex<Vec<ModuleInfo>>,
    options: Mutex<Vec<(String, String, bool)>>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, name: &str, module_type: &str) -> Self {
        self.modules.push(module(name, module_type));
        self
    }

    pub fn with_text(self, module: &str, reference: &str, text: &str) -> Self {
        self.with_raw(module, reference, text.as_bytes())
    }

    pub fn with_raw(mut self, module_name: &str, reference: &str, raw: &[u8]) -> Self {
        if !self.modules.iter().any(|m| m.name == module_name) {
            self.modules.push(module(module_name, "Biblical Texts"));
        }
        if !self.order.iter().any(|r| r == reference) {
            self.order.push(reference.to_string());
        }
        self.texts
            .insert((module_name.to_string(), reference.to_string()), raw.to_vec());
        self
    }

    /// Every `set_option` call so far, as (module, option, on).
    pub fn option_calls(&self) -> Vec<(String, String, bool)> {
        self.options.lock().unwrap().clone()
    }

    fn add_installed(&self, info: ModuleInfo) {
        self.installed.lock().unwrap().push(info);
    }

    fn check_module(&self, name: &str) -> Result<(), LibraryError> {
        let installed = self.installed.lock().unwrap();
        if self.modules.iter().chain(installed.iter()).any(|m| m.name == name) {
            Ok(())
        } else {
            Err(LibraryError::ModuleNotFound(name.to_string()))
        }
    }
}

impl ModuleLibrary for FakeLibrary {
    fn version(&self) -> String {
        "Fake 1.0".to_string()
    }

    fn modules(&self) -> Result<Vec<ModuleInfo>, LibraryError> {
        let mut all = self.modules.clone();
        all.extend(self.installed.lock().unwrap().iter().cloned());
        Ok(all)
    }

    fn render_raw(&self, module: &str, reference: &str) -> Result<Vec<u8>, LibraryError> {
        self.check_module(module)?;
        self.texts
            .get(&(module.to_string(), reference.to_string()))
            .cloned()
            .ok_or_else(|| LibraryError::InvalidReference(reference.to_string()))
    }

    fn step_reference(
        &self,
        module: &str,
        reference: &str,
        delta: i32,
    ) -> Result<String, LibraryError> {
        self.check_module(module)?;
        let pos = self
            .order
            .iter()
            .position(|r| r == reference)
            .ok_or_else(|| LibraryError::InvalidReference(reference.to_string()))?;
        let last = self.order.len() as i64 - 1;
        let target = (pos as i64 + delta as i64).clamp(0, last);
        Ok(self.order[target as usize].clone())
    }

    fn set_option(&self, module: &str, option: &str, on: bool) -> Result<(), LibraryError> {
        self.check_module(module)?;
        self.options
            .lock()
            .unwrap()
            .push((module.to_string(), option.to_string(), on));
        Ok(())
    }
}

/// An installer over canned remote sources that installs into a `FakeLibrary`.
///
/// `unconfigured()` simulates a first run; `init_config` then adds a single
/// empty `CrossWire` source.
pub struct FakeInstaller {
    library: Arc<FakeLibrary>,
    configured: AtomicBool,
    init_calls: AtomicUsize,
    sources: Mutex<Vec<(String, Vec<ModuleInfo>)>>,
    failing: Vec<String>,
}

impl FakeInstaller {
    pub fn new(library: Arc<FakeLibrary>) -> Self {
        Self {
            library,
            configured: AtomicBool::new(true),
            init_calls: AtomicUsize::new(0),
            sources: Mutex::new(Vec::new()),
            failing: Vec::new(),
        }
    }

    pub fn with_source(self, name: &str, modules: Vec<ModuleInfo>) -> Self {
        self.sources.lock().unwrap().push((name.to_string(), modules));
        self
    }

    pub fn unconfigured(self) -> Self {
        self.configured.store(false, Ordering::SeqCst);
        self
    }

    /// Makes installing `module` fail as a write error would.
    pub fn failing(mut self, module: &str) -> Self {
        self.failing.push(module.to_string());
        self
    }

    pub fn init_count(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

impl Installer for FakeInstaller {
    fn has_config(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    fn init_config(&self) -> Result<(), InstallError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.configured.store(true, Ordering::SeqCst);
        let mut sources = self.sources.lock().unwrap();
        if !sources.iter().any(|(name, _)| name == "CrossWire") {
            sources.push(("CrossWire".to_string(), Vec::new()));
        }
        Ok(())
    }

    fn remote_sources(&self) -> Vec<String> {
        let sources = self.sources.lock().unwrap();
        sources.iter().map(|(name, _)| name.clone()).collect()
    }

    fn refresh_source(&self, source: &str) -> Result<Vec<ModuleInfo>, InstallError> {
        let sources = self.sources.lock().unwrap();
        sources
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, modules)| modules.clone())
            .ok_or_else(|| InstallError::SourceNotFound(source.to_string()))
    }

    fn install_module(&self, source: &str, module: &str) -> Result<(), InstallError> {
        if self.failing.iter().any(|m| m == module) {
            return Err(InstallError::InstallFailed {
                module: module.to_string(),
                message: "write permissions?".to_string(),
            });
        }
        let info = self
            .refresh_source(source)?
            .into_iter()
            .find(|m| m.name == module)
            .ok_or_else(|| InstallError::ModuleNotOffered {
                source: source.to_string(),
                module: module.to_string(),
            })?;
        self.library.add_installed(info);
        Ok(())
    }
}

/// A sample library with one Bible, one commentary and one lexicon.
pub fn sample_library() -> FakeLibrary {
    FakeLibrary::new()
        .with_module("KJV", "Biblical Texts")
        .with_module("MHC", "Commentaries")
        .with_module("StrongsGreek", "Lexicons / Dictionaries")
        .with_text(
            "KJV",
            "Gen 1:1",
            "In the beginning God created the heaven and the earth.",
        )
        .with_text(
            "KJV",
            "Gen 1:2",
            "And the earth was without form <a href=\"x?action=showRef&type=scripRef&value=Jer.4.23\">Jer 4:23</a>",
        )
        .with_text("KJV", "John 1:1", "In the beginning was the Word")
}

/// Creates a test Viewer over `sample_library()`.
pub fn test_viewer() -> Viewer {
    Viewer::new(Arc::new(sample_library()))
}

/// A viewer over `sample_library()` with an installer offering `ESV` and
/// `Josephus` from `CrossWire`. Returns the library so tests can inspect it.
pub fn installing_viewer() -> (Viewer, Arc<FakeLibrary>) {
    let library = Arc::new(sample_library());
    let installer = FakeInstaller::new(library.clone()).with_source(
        "CrossWire",
        vec![module("ESV", "Biblical Texts"), module("Josephus", "Generic Books")],
    );
    let manager = InstallManager::new(Arc::new(installer), "CrossWire").unwrap();
    let viewer = Viewer::new(library.clone()).with_installer(manager);
    (viewer, library)
}
