//! Build a [`BranchesState`] snapshot from a git repository

use crate::model::{Branch, BranchesState, TipState};
use anyhow::{Context, Result};
use git2::{BranchType, ErrorCode, Repository};
use tracing::{debug, warn};

const CHECKOUT_PREFIX: &str = "checkout: moving from ";
const ORIGIN_HEAD: &str = "refs/remotes/origin/HEAD";
const ORIGIN_PREFIX: &str = "refs/remotes/origin/";

/// Reads branch information out of a repository
pub struct Reader<'a> {
    repo: &'a Repository,
}

impl std::fmt::Debug for Reader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader").finish_non_exhaustive()
    }
}

impl<'a> Reader<'a> {
    /// Create a reader for the given repository
    #[must_use]
    pub const fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    /// Read everything the sidebar needs
    ///
    /// # Errors
    ///
    /// Returns an error if branches cannot be listed
    pub fn load(&self, recent_limit: usize) -> Result<BranchesState> {
        let all_branches = self.branches()?;
        let default_branch = self.default_branch(&all_branches);
        let recent_branches = self.recent_branches(&all_branches, recent_limit);

        Ok(BranchesState {
            tip: self.tip(),
            default_branch,
            all_branches,
            recent_branches,
        })
    }

    /// Where HEAD points
    #[must_use]
    pub fn tip(&self) -> TipState {
        match self.repo.head() {
            Ok(head) => {
                let sha = head.target().map(|oid| oid.to_string()).unwrap_or_default();
                if !head.is_branch() {
                    return TipState::Detached { sha };
                }
                head.shorthand().map_or_else(
                    || {
                        warn!("HEAD branch name is not valid UTF-8");
                        TipState::Unknown
                    },
                    |name| TipState::Valid {
                        branch: Branch::local(name, sha),
                    },
                )
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let ref_name = self
                    .repo
                    .find_reference("HEAD")
                    .ok()
                    .and_then(|head| {
                        head.symbolic_target()
                            .map(|target| target.trim_start_matches("refs/heads/").to_string())
                    })
                    .unwrap_or_default();
                TipState::Unborn { ref_name }
            }
            Err(e) => {
                warn!("Failed to read HEAD: {}", e);
                TipState::Unknown
            }
        }
    }

    /// Local branches followed by remote-tracking branches
    ///
    /// # Errors
    ///
    /// Returns an error if branches cannot be listed
    pub fn branches(&self) -> Result<Vec<Branch>> {
        let mut result = Vec::new();

        let locals = self
            .repo
            .branches(Some(BranchType::Local))
            .context("Failed to list local branches")?;
        for branch_result in locals {
            let (branch, _) = branch_result.context("Failed to read branch")?;
            let Some(oid) = branch.get().target() else {
                continue;
            };
            if let Some(name) = branch.name().context("Branch name is not valid UTF-8")? {
                result.push(Branch::local(name, oid.to_string()));
            }
        }

        let remotes = self
            .repo
            .branches(Some(BranchType::Remote))
            .context("Failed to list remote branches")?;
        for branch_result in remotes {
            let (branch, _) = branch_result.context("Failed to read branch")?;
            let Some(full_name) = branch.name().context("Branch name is not valid UTF-8")? else {
                continue;
            };
            // Skip HEAD aliases like "origin/HEAD"
            if full_name.ends_with("/HEAD") {
                continue;
            }
            let Some(oid) = branch.get().target() else {
                continue;
            };
            let sha = oid.to_string();
            result.push(full_name.split_once('/').map_or_else(
                || Branch::local(full_name, sha.clone()),
                |(remote, name)| Branch::remote(remote, name, sha.clone()),
            ));
        }

        Ok(result)
    }

    /// The branch `origin/HEAD` points at, else local `main`, else local
    /// `master`
    #[must_use]
    pub fn default_branch(&self, branches: &[Branch]) -> Option<Branch> {
        let origin_default = self
            .repo
            .find_reference(ORIGIN_HEAD)
            .ok()
            .and_then(|head| head.symbolic_target().map(str::to_string));

        if let Some(target) = origin_default
            && let Some(name) = target.strip_prefix(ORIGIN_PREFIX)
        {
            let found = find_local(branches, name).or_else(|| {
                branches.iter().find(|b| {
                    b.remote.as_deref() == Some("origin") && b.name_without_remote() == name
                })
            });
            if let Some(branch) = found {
                return Some(branch.clone());
            }
            debug!(branch = name, "origin/HEAD target has no branch");
        }

        ["main", "master"]
            .into_iter()
            .find_map(|name| find_local(branches, name))
            .cloned()
    }

    /// Branches named by the HEAD reflog's checkout entries, newest first.
    ///
    /// Only branches that still exist locally are returned.
    #[must_use]
    pub fn recent_branches(&self, branches: &[Branch], limit: usize) -> Vec<Branch> {
        let reflog = match self.repo.reflog("HEAD") {
            Ok(reflog) => reflog,
            Err(e) => {
                debug!("No HEAD reflog: {}", e);
                return Vec::new();
            }
        };

        let mut recent: Vec<Branch> = Vec::new();
        for entry in reflog.iter() {
            if recent.len() >= limit {
                break;
            }
            let Some(name) = entry.message().and_then(checkout_target) else {
                continue;
            };
            if recent.iter().any(|b| b.name == name) {
                continue;
            }
            if let Some(branch) = find_local(branches, name) {
                recent.push(branch.clone());
            }
        }
        recent
    }
}

fn find_local<'b>(branches: &'b [Branch], name: &str) -> Option<&'b Branch> {
    branches.iter().find(|b| !b.is_remote() && b.name == name)
}

/// Branch name a `checkout: moving from A to B` reflog message moved to
fn checkout_target(message: &str) -> Option<&str> {
    let (_, to) = message.strip_prefix(CHECKOUT_PREFIX)?.split_once(" to ")?;
    let to = to.trim();
    Some(to.strip_prefix("refs/heads/").unwrap_or(to))
}

/// Read a [`BranchesState`] for the repository
///
/// # Errors
///
/// Returns an error if branches cannot be listed
pub fn load_branches_state(repo: &Repository, recent_limit: usize) -> Result<BranchesState> {
    Reader::new(repo).load(recent_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, Signature};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn init_test_repo_with_commit() -> Result<(TempDir, Repository, Oid), Box<dyn std::error::Error>>
    {
        let temp_dir = TempDir::new()?;
        let mut init_opts = git2::RepositoryInitOptions::new();
        init_opts.initial_head("master");
        let repo = Repository::init_opts(temp_dir.path(), &init_opts)?;

        let sig = Signature::now("Test", "test@test.com")?;

        let file_path = temp_dir.path().join("README.md");
        fs::write(&file_path, "# Test")?;

        let mut index = repo.index()?;
        index.add_path(std::path::Path::new("README.md"))?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let oid = {
            let tree = repo.find_tree(tree_id)?;
            repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])?
        };

        Ok((temp_dir, repo, oid))
    }

    fn create_branch(repo: &Repository, name: &str) -> Result<(), git2::Error> {
        let head = repo.head()?.peel_to_commit()?;
        repo.branch(name, &head, false)?;
        Ok(())
    }

    fn append_checkout(repo: &Repository, oid: Oid, from: &str, to: &str) -> Result<(), git2::Error> {
        let sig = Signature::now("Test", "test@test.com")?;
        let mut reflog = repo.reflog("HEAD")?;
        reflog.append(oid, &sig, Some(&format!("checkout: moving from {from} to {to}")))?;
        reflog.write()
    }

    fn names(branches: &[Branch]) -> Vec<String> {
        branches.iter().map(|b| b.name.clone()).collect()
    }

    fn sorted_names(branches: &[Branch]) -> Vec<String> {
        let mut names = names(branches);
        names.sort();
        names
    }

    #[rstest]
    #[case("checkout: moving from main to feature", Some("feature"))]
    #[case("checkout: moving from main to refs/heads/topic", Some("topic"))]
    #[case("commit: add readme", None)]
    #[case("checkout: moving from main", None)]
    fn test_checkout_target(#[case] message: &str, #[case] expected: Option<&str>) {
        assert_eq!(checkout_target(message), expected);
    }

    #[test]
    fn test_tip_valid_branch() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, oid) = init_test_repo_with_commit()?;

        assert_eq!(
            Reader::new(&repo).tip(),
            TipState::Valid {
                branch: Branch::local("master", oid.to_string()),
            }
        );
        Ok(())
    }

    #[test]
    fn test_tip_detached() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, oid) = init_test_repo_with_commit()?;
        repo.set_head_detached(oid)?;

        assert_eq!(
            Reader::new(&repo).tip(),
            TipState::Detached {
                sha: oid.to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn test_tip_unborn() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let mut init_opts = git2::RepositoryInitOptions::new();
        init_opts.initial_head("trunk");
        let repo = Repository::init_opts(temp_dir.path(), &init_opts)?;

        assert_eq!(
            Reader::new(&repo).tip(),
            TipState::Unborn {
                ref_name: "trunk".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn test_branches_local_then_remote() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, oid) = init_test_repo_with_commit()?;
        create_branch(&repo, "feature/a")?;
        repo.reference("refs/remotes/origin/master", oid, true, "test")?;
        repo.reference_symbolic(ORIGIN_HEAD, "refs/remotes/origin/master", true, "test")?;

        let branches = Reader::new(&repo).branches()?;

        let (locals, remotes): (Vec<Branch>, Vec<Branch>) =
            branches.iter().cloned().partition(|b| !b.is_remote());
        assert_eq!(sorted_names(&locals), vec!["feature/a", "master"]);
        assert_eq!(names(&remotes), vec!["origin/master"]);
        assert_eq!(branches.last().map(|b| b.name.as_str()), Some("origin/master"));
        assert_eq!(branches.last().map(Branch::name_without_remote), Some("master"));
        assert!(branches.iter().all(|b| b.tip_sha == oid.to_string()));
        Ok(())
    }

    #[test]
    fn test_default_branch_prefers_main() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, _) = init_test_repo_with_commit()?;
        create_branch(&repo, "main")?;
        let reader = Reader::new(&repo);

        let default_branch = reader.default_branch(&reader.branches()?);
        assert_eq!(default_branch.map(|b| b.name), Some("main".to_string()));
        Ok(())
    }

    #[test]
    fn test_default_branch_falls_back_to_master() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, _) = init_test_repo_with_commit()?;
        let reader = Reader::new(&repo);

        let default_branch = reader.default_branch(&reader.branches()?);
        assert_eq!(default_branch.map(|b| b.name), Some("master".to_string()));
        Ok(())
    }

    #[test]
    fn test_default_branch_follows_origin_head() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, oid) = init_test_repo_with_commit()?;
        repo.reference("refs/remotes/origin/develop", oid, true, "test")?;
        repo.reference_symbolic(ORIGIN_HEAD, "refs/remotes/origin/develop", true, "test")?;
        let reader = Reader::new(&repo);

        let default_branch = reader.default_branch(&reader.branches()?);
        assert_eq!(
            default_branch.map(|b| b.name),
            Some("origin/develop".to_string())
        );

        // A local branch of the same name wins over the remote one
        create_branch(&repo, "develop")?;
        let default_branch = reader.default_branch(&reader.branches()?);
        assert_eq!(
            default_branch.map(|b| b.name),
            Some("develop".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_recent_branches_from_reflog() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, oid) = init_test_repo_with_commit()?;
        for name in ["one", "two", "three"] {
            create_branch(&repo, name)?;
        }
        append_checkout(&repo, oid, "master", "one")?;
        append_checkout(&repo, oid, "one", "gone")?;
        append_checkout(&repo, oid, "gone", "two")?;
        append_checkout(&repo, oid, "two", "one")?;
        append_checkout(&repo, oid, "one", "three")?;
        let reader = Reader::new(&repo);
        let branches = reader.branches()?;

        assert_eq!(
            names(&reader.recent_branches(&branches, 5)),
            vec!["three", "one", "two"]
        );
        assert_eq!(names(&reader.recent_branches(&branches, 2)), vec!["three", "one"]);
        Ok(())
    }

    #[test]
    fn test_load_snapshot() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, oid) = init_test_repo_with_commit()?;
        create_branch(&repo, "feature")?;
        append_checkout(&repo, oid, "master", "feature")?;

        let state = load_branches_state(&repo, 5)?;

        assert_eq!(state.current_branch().map(|b| b.name.as_str()), Some("master"));
        assert_eq!(
            state.default_branch.map(|b| b.name),
            Some("master".to_string())
        );
        assert_eq!(sorted_names(&state.all_branches), vec!["feature", "master"]);
        assert_eq!(names(&state.recent_branches), vec!["feature"]);
        Ok(())
    }

    #[test]
    fn test_reader_debug() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo, _) = init_test_repo_with_commit()?;
        let debug = format!("{:?}", Reader::new(&repo));
        assert!(debug.contains("Reader"));
        Ok(())
    }
}
