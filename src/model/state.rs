//! Repository state snapshots consumed by the sidebar

use super::{Branch, TipState};

/// Which relationship between the current and the selected branch is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ComparisonType {
    /// No explicit ahead/behind comparison has been requested yet
    #[default]
    Default,
    /// Commits on the current branch missing from the selected one
    Ahead,
    /// Commits on the selected branch missing from the current one
    Behind,
}

impl ComparisonType {
    /// Lowercase label used in logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Ahead => "ahead",
            Self::Behind => "behind",
        }
    }
}

/// Branch information owned by the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchesState {
    /// Where HEAD points
    pub tip: TipState,
    /// The repository's default branch, once resolved
    pub default_branch: Option<Branch>,
    /// Every known branch, local first
    pub all_branches: Vec<Branch>,
    /// Recently checked out branches, newest first
    pub recent_branches: Vec<Branch>,
}

impl BranchesState {
    /// The checked out branch, if the tip is valid
    #[must_use]
    pub const fn current_branch(&self) -> Option<&Branch> {
        self.tip.branch()
    }
}

/// Result of the most recent comparison
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareState {
    /// Loaded commits of the active comparison, in display order
    pub commit_shas: Vec<String>,
    /// Commit selected in the commit list
    pub selected_sha: Option<String>,
    /// Commits the current branch has that the selected one lacks
    pub ahead: usize,
    /// Commits the selected branch has that the current one lacks
    pub behind: usize,
}

/// The part of the repository-state store the sidebar reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryState {
    /// Branch information
    pub branches: BranchesState,
    /// Comparison result
    pub compare: CompareState,
}
