//! branch-compare - Branch comparison sidebar for terminal git clients
//!
//! Lets a user pick a branch and see how far the current branch is ahead of
//! or behind it. The [`CompareSidebar`] owns the selection state and issues
//! commands to a [`Dispatcher`]; everything it reads comes from a
//! [`RepositoryState`] snapshot owned by someone else.
//!
//! [`RepositoryState`]: model::RepositoryState

pub mod compare;
pub mod config;
pub mod dispatch;
pub mod git;
pub mod model;
pub mod paths;
pub mod tui;

pub use compare::{CompareSidebar, SidebarContext, SidebarEvent};
pub use config::Config;
pub use dispatch::Dispatcher;
