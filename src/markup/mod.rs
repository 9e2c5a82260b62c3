//! # Markup Pipeline
//!
//! Prepares raw module markup for display in two pure passes:
//!
//! ```text
//! raw bytes ──► escape ──► rewrite_links ──► display markup
//!              (ASCII)    (condensed <a>)
//! ```
//!
//! Escaping runs first so the link scan only ever sees ASCII. Neither pass
//! holds state between calls; both are safe to run from any thread.

pub mod escape;
pub mod links;
mod scan;

use std::fmt;

use log::debug;

use crate::library::{LibraryError, ModuleLibrary};

pub use escape::{decode_references, escape, escape_str};
pub use links::{
    AnchorFields, CondensedAnchor, DisplayLink, LinkAction, LinkTarget, collect_links,
    parse_anchor, rewrite_links,
};

/// Failures of the markup passes themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// Input bytes are not UTF-8. `valid_up_to` is the length of the valid prefix.
    InvalidUtf8 { valid_up_to: usize },
    /// An `<a` at byte `offset` has no `</a>` after it.
    UnterminatedAnchor { offset: usize },
    /// A condensed href doesn't split into exactly three fields.
    MalformedHref(String),
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupError::InvalidUtf8 { valid_up_to } => {
                write!(f, "markup is not valid UTF-8 after byte {valid_up_to}")
            }
            MarkupError::UnterminatedAnchor { offset } => {
                write!(f, "anchor at byte {offset} is never closed")
            }
            MarkupError::MalformedHref(href) => write!(f, "malformed link target: {href:?}"),
        }
    }
}

impl std::error::Error for MarkupError {}

/// Anything that can stop a render request.
#[derive(Debug)]
pub enum RenderError {
    /// The viewer has no module to render from.
    NoModuleSelected,
    Library(LibraryError),
    Markup(MarkupError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoModuleSelected => write!(f, "no module selected"),
            RenderError::Library(e) => write!(f, "library error: {e}"),
            RenderError::Markup(e) => write!(f, "markup error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::NoModuleSelected => None,
            RenderError::Library(e) => Some(e),
            RenderError::Markup(e) => Some(e),
        }
    }
}

impl From<LibraryError> for RenderError {
    fn from(e: LibraryError) -> Self {
        RenderError::Library(e)
    }
}

impl From<MarkupError> for RenderError {
    fn from(e: MarkupError) -> Self {
        RenderError::Markup(e)
    }
}

/// Run both passes over raw module output.
pub fn prepare_for_display(raw: &[u8]) -> Result<String, MarkupError> {
    let escaped = escape(raw)?;
    rewrite_links(&escaped)
}

/// Fetch `reference` from `module` and prepare it for display.
pub fn render_for_display(
    library: &dyn ModuleLibrary,
    module: &str,
    reference: &str,
) -> Result<String, RenderError> {
    let raw = library.render_raw(module, reference)?;
    debug!("Rendering {module} {reference} ({} bytes)", raw.len());
    Ok(prepare_for_display(&raw)?)
}
