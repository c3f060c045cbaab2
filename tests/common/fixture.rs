//! Test fixture for setting up temporary git repositories

use std::fs;
use std::path::{Path, PathBuf};

use branch_compare::model::{CompareState, Repository as RepositoryId, RepositoryState};
use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

/// Test fixture that sets up a temporary git repository on `master`
pub struct TestFixture {
    /// Temporary directory containing the git repo
    _temp_dir: TempDir,
    /// Path to the git repository
    pub repo_path: PathBuf,
    /// Open handle to the repository
    pub repo: Repository,
}

impl TestFixture {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        // Canonicalize to handle symlinked temp dirs.
        let repo_path = temp_dir
            .path()
            .canonicalize()
            .unwrap_or_else(|_| temp_dir.path().to_path_buf());

        // Git's default branch is user-configurable, so pin it.
        let mut init_opts = RepositoryInitOptions::new();
        init_opts.initial_head("master");
        let repo = Repository::init_opts(&repo_path, &init_opts)?;

        let fixture = Self {
            _temp_dir: temp_dir,
            repo_path,
            repo,
        };
        fixture.commit_file("README.md", "# Test Repository\n", "Initial commit")?;
        Ok(fixture)
    }

    /// Commit a file on top of HEAD
    pub fn commit_file(
        &self,
        name: &str,
        contents: &str,
        message: &str,
    ) -> Result<Oid, Box<dyn std::error::Error>> {
        fs::write(self.repo_path.join(name), contents)?;
        let sig = Signature::now("Test", "test@test.com")?;

        let mut index = self.repo.index()?;
        index.add_path(Path::new(name))?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        Ok(oid)
    }

    /// Create a branch at HEAD
    pub fn create_branch(&self, name: &str) -> Result<(), git2::Error> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &head, false)?;
        Ok(())
    }

    /// Point HEAD at a branch and record the move in the reflog
    pub fn checkout(&self, name: &str) -> Result<(), git2::Error> {
        let from = self
            .repo
            .head()?
            .shorthand()
            .unwrap_or("HEAD")
            .to_string();
        self.repo.set_head(&format!("refs/heads/{name}"))?;

        let oid = self.repo.refname_to_id("HEAD")?;
        let sig = Signature::now("Test", "test@test.com")?;
        let mut reflog = self.repo.reflog("HEAD")?;
        reflog.append(oid, &sig, Some(&format!("checkout: moving from {from} to {name}")))?;
        reflog.write()
    }

    /// Identity handed to the sidebar
    pub fn repository(&self) -> RepositoryId {
        RepositoryId::new(&self.repo_path)
    }

    /// Snapshot of the repository's branches with an empty comparison
    pub fn repository_state(&self) -> anyhow::Result<RepositoryState> {
        Ok(RepositoryState {
            branches: branch_compare::git::load_branches_state(&self.repo, 5)?,
            compare: CompareState::default(),
        })
    }
}
