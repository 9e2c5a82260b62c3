//! # Module Catalog
//!
//! Metadata for installed modules and their grouping by kind. Only Bibles,
//! commentaries and lexicons are shown; other module types are logged and
//! left out.

use log::info;
use serde::{Deserialize, Serialize};

/// Version label shown when a module doesn't declare one.
pub const UNKNOWN_VERSION: &str = "NA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    /// Type string as reported by the library, e.g. `"Biblical Texts"`.
    pub module_type: String,
    pub language: String,
    pub description: String,
    pub version: Option<String>,
}

impl ModuleInfo {
    pub fn kind(&self) -> Option<ModuleKind> {
        ModuleKind::from_type(&self.module_type)
    }

    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKind {
    Bible,
    Commentary,
    Lexicon,
}

impl ModuleKind {
    pub fn from_type(module_type: &str) -> Option<Self> {
        match module_type {
            "Biblical Texts" => Some(ModuleKind::Bible),
            "Commentaries" => Some(ModuleKind::Commentary),
            "Lexicons / Dictionaries" => Some(ModuleKind::Lexicon),
            _ => None,
        }
    }

    /// Strong's numbers are only switched on for Bible text.
    pub fn shows_strongs(self) -> bool {
        self == ModuleKind::Bible
    }
}

/// Installed module names, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleGroups {
    pub bibles: Vec<String>,
    pub commentaries: Vec<String>,
    pub lexicons: Vec<String>,
}

impl ModuleGroups {
    pub fn from_modules(modules: &[ModuleInfo]) -> Self {
        let mut groups = ModuleGroups::default();
        for module in modules {
            let bucket = match module.kind() {
                Some(ModuleKind::Bible) => &mut groups.bibles,
                Some(ModuleKind::Commentary) => &mut groups.commentaries,
                Some(ModuleKind::Lexicon) => &mut groups.lexicons,
                None => {
                    info!(
                        "Module {} ({}) not included in viewer",
                        module.name, module.module_type
                    );
                    continue;
                }
            };
            bucket.push(module.name.clone());
        }
        groups
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn kind_of(&self, name: &str) -> Option<ModuleKind> {
        let has = |list: &[String]| list.iter().any(|m| m == name);
        if has(&self.bibles) {
            Some(ModuleKind::Bible)
        } else if has(&self.commentaries) {
            Some(ModuleKind::Commentary)
        } else if has(&self.lexicons) {
            Some(ModuleKind::Lexicon)
        } else {
            None
        }
    }

    /// Every grouped module with its kind: Bibles, then commentaries, then lexicons.
    pub fn iter(&self) -> impl Iterator<Item = (ModuleKind, &str)> {
        let bibles = self.bibles.iter().map(|n| (ModuleKind::Bible, n.as_str()));
        let commentaries = self.commentaries.iter().map(|n| (ModuleKind::Commentary, n.as_str()));
        let lexicons = self.lexicons.iter().map(|n| (ModuleKind::Lexicon, n.as_str()));
        bibles.chain(commentaries).chain(lexicons)
    }

    pub fn is_empty(&self) -> bool {
        self.bibles.is_empty() && self.commentaries.is_empty() && self.lexicons.is_empty()
    }
}
