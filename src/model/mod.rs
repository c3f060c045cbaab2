//! Read-only views of the repository-state store.
//!
//! Everything here is owned by whoever opened the repository. The compare
//! sidebar only ever borrows these values.

mod branch;
mod state;

pub use branch::{Branch, Repository, TipState};
pub use state::{BranchesState, CompareState, ComparisonType, RepositoryState};
