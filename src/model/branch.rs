//! Repository, branch and tip values

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Identity of an opened repository, passed along with every command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a repository handle for the given working directory
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Working directory of the repository
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name (last path component)
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or_else(|| self.path.to_string_lossy().to_string(), str::to_string)
    }
}

/// A branch as reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Branch {
    /// Full branch name, e.g. `origin/main` for a remote-tracking branch
    pub name: String,
    /// SHA of the commit the branch points to
    pub tip_sha: String,
    /// Remote name (e.g., "origin") for remote-tracking branches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

impl Branch {
    /// Create a local branch value
    #[must_use]
    pub fn local(name: impl Into<String>, tip_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tip_sha: tip_sha.into(),
            remote: None,
        }
    }

    /// Create a remote-tracking branch value named `<remote>/<name>`
    #[must_use]
    pub fn remote(remote: impl Into<String>, name: &str, tip_sha: impl Into<String>) -> Self {
        let remote = remote.into();
        Self {
            name: format!("{remote}/{name}"),
            tip_sha: tip_sha.into(),
            remote: Some(remote),
        }
    }

    /// Whether this is a remote-tracking branch
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Name with the remote prefix removed, e.g. `main` for `origin/main`
    #[must_use]
    pub fn name_without_remote(&self) -> &str {
        self.remote
            .as_deref()
            .and_then(|remote| self.name.strip_prefix(remote))
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.name)
    }

    /// First seven characters of the tip SHA
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.tip_sha.get(..7).unwrap_or(&self.tip_sha)
    }
}

/// Where HEAD currently points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TipState {
    /// HEAD has not been read yet, or could not be read
    #[default]
    Unknown,
    /// HEAD names a branch with no commits
    Unborn {
        /// Name of the unborn branch
        ref_name: String,
    },
    /// HEAD points directly at a commit
    Detached {
        /// SHA of the checked out commit
        sha: String,
    },
    /// HEAD resolves to a concrete branch
    Valid {
        /// The checked out branch
        branch: Branch,
    },
}

impl TipState {
    /// The checked out branch when the tip is valid
    #[must_use]
    pub const fn branch(&self) -> Option<&Branch> {
        match self {
            Self::Valid { branch } => Some(branch),
            _ => None,
        }
    }

    /// Whether the tip resolves to a branch
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}
