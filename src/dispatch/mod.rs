//! Command sink for work the sidebar cannot do itself.
//!
//! Every method is fire-and-forget: the sidebar never waits for a result.
//! Success or failure shows up later as a change in [`RepositoryState`].
//!
//! [`RepositoryState`]: crate::model::RepositoryState

mod channel;

pub use channel::ChannelDispatcher;

use crate::model::{Branch, ComparisonType, Repository};
use std::fmt;

/// Receiver of commands issued by the compare sidebar
pub trait Dispatcher {
    /// Recompute ahead/behind counts and the commit list for `branch`
    fn load_compare_state(
        &mut self,
        repository: &Repository,
        branch: Option<&Branch>,
        compare_type: ComparisonType,
    );

    /// Mark a commit as selected in the history
    fn change_history_commit_selection(&mut self, repository: &Repository, sha: &str);

    /// Fetch the changed files of the selected commit
    fn load_changed_files_for_current_selection(&mut self, repository: &Repository);

    /// Extend the loaded commit window
    fn load_next_history_batch(&mut self, repository: &Repository);

    /// Merge `branch_name` into the current branch
    fn merge_branch(&mut self, repository: &Repository, branch_name: &str);
}

/// A dispatcher call captured as a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// See [`Dispatcher::load_compare_state`]
    LoadCompareState {
        /// Target repository
        repository: Repository,
        /// Branch to compare against
        branch: Option<Branch>,
        /// Requested comparison
        compare_type: ComparisonType,
    },
    /// See [`Dispatcher::change_history_commit_selection`]
    ChangeHistoryCommitSelection {
        /// Target repository
        repository: Repository,
        /// Selected commit
        sha: String,
    },
    /// See [`Dispatcher::load_changed_files_for_current_selection`]
    LoadChangedFilesForCurrentSelection {
        /// Target repository
        repository: Repository,
    },
    /// See [`Dispatcher::load_next_history_batch`]
    LoadNextHistoryBatch {
        /// Target repository
        repository: Repository,
    },
    /// See [`Dispatcher::merge_branch`]
    MergeBranch {
        /// Target repository
        repository: Repository,
        /// Branch to merge into the current one
        branch_name: String,
    },
}

impl Command {
    /// Short name used in logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LoadCompareState { .. } => "load_compare_state",
            Self::ChangeHistoryCommitSelection { .. } => "change_history_commit_selection",
            Self::LoadChangedFilesForCurrentSelection { .. } => {
                "load_changed_files_for_current_selection"
            }
            Self::LoadNextHistoryBatch { .. } => "load_next_history_batch",
            Self::MergeBranch { .. } => "merge_branch",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())?;
        match self {
            Self::LoadCompareState {
                branch,
                compare_type,
                ..
            } => {
                let branch = branch.as_ref().map_or("-", |b| b.name.as_str());
                write!(f, " {} {branch}", compare_type.label())
            }
            Self::ChangeHistoryCommitSelection { sha, .. } => {
                write!(f, " {}", sha.get(..7).unwrap_or(sha.as_str()))
            }
            Self::MergeBranch { branch_name, .. } => write!(f, " {branch_name}"),
            Self::LoadChangedFilesForCurrentSelection { .. }
            | Self::LoadNextHistoryBatch { .. } => Ok(()),
        }
    }
}

/// Anything that can accept a [`Command`] value is a dispatcher
pub trait CommandSink {
    /// Accept one command
    fn send_command(&mut self, command: Command);
}

impl<S: CommandSink> Dispatcher for S {
    fn load_compare_state(
        &mut self,
        repository: &Repository,
        branch: Option<&Branch>,
        compare_type: ComparisonType,
    ) {
        self.send_command(Command::LoadCompareState {
            repository: repository.clone(),
            branch: branch.cloned(),
            compare_type,
        });
    }

    fn change_history_commit_selection(&mut self, repository: &Repository, sha: &str) {
        self.send_command(Command::ChangeHistoryCommitSelection {
            repository: repository.clone(),
            sha: sha.to_string(),
        });
    }

    fn load_changed_files_for_current_selection(&mut self, repository: &Repository) {
        self.send_command(Command::LoadChangedFilesForCurrentSelection {
            repository: repository.clone(),
        });
    }

    fn load_next_history_batch(&mut self, repository: &Repository) {
        self.send_command(Command::LoadNextHistoryBatch {
            repository: repository.clone(),
        });
    }

    fn merge_branch(&mut self, repository: &Repository, branch_name: &str) {
        self.send_command(Command::MergeBranch {
            repository: repository.clone(),
            branch_name: branch_name.to_string(),
        });
    }
}

/// Keeps every command it receives, in order
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    commands: Vec<Command>,
}

impl RecordingDispatcher {
    /// Create an empty recorder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Commands received so far
    #[must_use]
    pub const fn commands(&self) -> &[Command] {
        self.commands.as_slice()
    }

    /// Remove and return everything received so far
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

impl CommandSink for RecordingDispatcher {
    fn send_command(&mut self, command: Command) {
        self.commands.push(command);
    }
}
