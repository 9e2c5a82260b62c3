//! # Core Application Logic
//!
//! This module contains the viewer's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Viewer (context)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   markup   │      │  library   │      │    CLI     │
//!     │ (pipeline) │      │  (trait)   │      │ (main.rs)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `Viewer` struct, all viewer state in one place
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`catalog`]: Module metadata and grouping by kind
//! - [`config`]: Settings with their override hierarchy
//! - [`install`]: Remote source selection and module installs

pub mod action;
pub mod catalog;
pub mod config;
pub mod install;
pub mod state;
