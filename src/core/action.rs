//! # Actions
//!
//! Everything that can happen in the viewer becomes an `Action`.
//! User picks a module? That's `Action::SelectModule(name)`.
//! User clicks a condensed link? That's `Action::FollowLink(href)`.
//!
//! The `update()` function applies an action to the `Viewer` and returns the
//! `Effect` the caller must carry out. No I/O happens here: rendering and
//! library lookups are the caller's job.
//!
//! ```text
//! Viewer + Action  →  update()  →  Effect
//! ```

use log::{debug, warn};

use crate::core::state::Viewer;
use crate::library::InstallError;
use crate::markup::{LinkAction, LinkTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectModule(String),
    GoTo(String),
    Step(i32),
    FollowLink(String),
    Back,
    /// Pick a remote source by name; empty means the configured default.
    SelectSource(String),
    Install(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Re-render the current module at the current reference.
    Render,
    /// Ask the library for the entry `n` steps away, then re-render.
    Step(i32),
    /// Show a lexicon entry, note or morphology code for this link.
    Lookup(LinkTarget),
    /// Refresh this remote source through `Viewer::select_source`.
    RefreshSource(String),
    /// Install this module through `Viewer::install`.
    Install(String),
    Quit,
}

pub fn update(viewer: &mut Viewer, action: Action) -> Effect {
    debug!("Action: {:?}", action);
    match action {
        Action::SelectModule(name) => {
            if viewer.groups.contains(&name) {
                viewer.status_message = format!("Reading {name}");
                viewer.selected_module = Some(name);
                viewer.error = None;
                Effect::Render
            } else {
                warn!("Module {} is not installed", name);
                viewer.error = Some(format!("Module {name} is not installed"));
                Effect::None
            }
        }
        Action::GoTo(reference) => {
            viewer.go_to(reference);
            Effect::Render
        }
        Action::Step(0) => Effect::None,
        Action::Step(delta) => Effect::Step(delta),
        Action::FollowLink(href) => match LinkTarget::from_href(&href) {
            Ok(target) => match target.link_action() {
                LinkAction::ShowRef => {
                    viewer.go_to(target.value);
                    Effect::Render
                }
                _ => Effect::Lookup(target),
            },
            Err(e) => {
                warn!("Ignoring link: {}", e);
                viewer.error = Some(e.to_string());
                Effect::None
            }
        },
        Action::Back => match viewer.history.pop() {
            Some(previous) => {
                viewer.reference = previous;
                Effect::Render
            }
            None => Effect::None,
        },
        Action::SelectSource(name) => {
            let source = viewer
                .installer
                .as_ref()
                .ok_or(InstallError::NotConfigured)
                .and_then(|manager| manager.resolve_source(&name));
            match source {
                Ok(source) => Effect::RefreshSource(source),
                Err(e) => reject(viewer, e),
            }
        }
        Action::Install(module) => {
            let offered = viewer
                .installer
                .as_ref()
                .ok_or(InstallError::NotConfigured)
                .and_then(|manager| manager.check_offered(&module).map(|_| ()));
            match offered {
                Ok(()) => Effect::Install(module),
                Err(e) => reject(viewer, e),
            }
        }
        Action::Quit => Effect::Quit,
    }
}

fn reject(viewer: &mut Viewer, e: InstallError) -> Effect {
    warn!("Install request rejected: {}", e);
    viewer.error = Some(e.to_string());
    Effect::None
}
