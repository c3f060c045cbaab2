//! Terminal rendering of the compare sidebar, plus an interactive session
//! that drives it from the keyboard.
//!
//! Rendering is a thin layer over [`ComparisonSelectionState`] and the
//! store's [`RepositoryState`]; it holds no state of its own.
//!
//! [`ComparisonSelectionState`]: crate::compare::ComparisonSelectionState
//! [`RepositoryState`]: crate::model::RepositoryState

mod app;
mod colors;
mod input;
mod sidebar;

pub use app::{CommandLog, Session, run};
pub use input::{KeyAction, key_action};
pub use sidebar::render_sidebar;
