//! Read-only view of an on-disk repository's branches

mod snapshot;

pub use snapshot::{Reader as SnapshotReader, load_branches_state};

use anyhow::{Context, Result};
use git2::Repository;
use std::path::Path;

/// Open a git repository at the given path
///
/// # Errors
///
/// Returns an error if the path is not a git repository
pub fn open_repository(path: &Path) -> Result<Repository> {
    Repository::discover(path)
        .with_context(|| format!("Failed to open git repository at {}", path.display()))
}

/// Get the root of the git repository containing the given path
///
/// # Errors
///
/// Returns an error if the path is not inside a git repository
pub fn repository_root(path: &Path) -> Result<std::path::PathBuf> {
    let repo = open_repository(path)?;
    repo.workdir()
        .map(Path::to_path_buf)
        .context("Repository has no working directory")
}
