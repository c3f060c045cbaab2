//! The comparison coordinator: turns sidebar events into local state changes
//! and dispatcher commands.

use super::scheduler::ThrottledScheduler;
use super::selection::ComparisonSelectionState;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::model::{Branch, ComparisonType, Repository, RepositoryState};
use std::ops::Range;
use std::time::{Duration, Instant};
use tracing::debug;

/// Everything the sidebar needs from its owner at construction
#[derive(Debug)]
pub struct SidebarContext<D> {
    /// Repository being compared
    pub repository: Repository,
    /// Sink for commands
    pub dispatcher: D,
    /// Timing and paging settings
    pub config: Config,
}

/// Input from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    /// The filter box gained focus
    FilterFocused,
    /// The filter box lost focus
    FilterBlurred,
    /// The filter text was edited
    FilterTextChanged(String),
    /// Keyboard highlight moved within the branch picker
    BranchHighlighted(Option<Branch>),
    /// A branch in the picker was activated
    BranchClicked(Branch),
    /// The ahead/behind radio control changed
    CompareTypeChanged(ComparisonType),
    /// A commit in the commit list was selected
    CommitSelected(String),
    /// The commit list scrolled; rows `start..end` are visible
    Scrolled(Range<usize>),
    /// The merge button was activated
    MergeClicked,
}

/// Coordinates branch comparison for one repository.
///
/// Created by [`initialize`](Self::initialize) and torn down by
/// [`dispose`](Self::dispose). Deferred work only runs from
/// [`tick`](Self::tick), so nothing can fire once the sidebar is gone.
#[derive(Debug)]
pub struct CompareSidebar<D> {
    repository: Repository,
    dispatcher: D,
    state: ComparisonSelectionState,
    load_changed_files: ThrottledScheduler<()>,
    close_to_bottom_threshold: usize,
}

impl<D: Dispatcher> CompareSidebar<D> {
    /// Build the sidebar and request the initial `Default` comparison
    /// against the repository's default branch.
    #[must_use]
    pub fn initialize(context: SidebarContext<D>, repo_state: &RepositoryState) -> Self {
        let SidebarContext {
            repository,
            dispatcher,
            config,
        } = context;

        let mut sidebar = Self {
            repository,
            dispatcher,
            state: ComparisonSelectionState::new(&repo_state.branches),
            load_changed_files: ThrottledScheduler::new(Duration::from_millis(
                config.load_changed_files_delay_ms,
            )),
            close_to_bottom_threshold: config.close_to_bottom_threshold,
        };

        debug!(
            repository = %sidebar.repository.name(),
            default_branch = sidebar.state.selected_branch.as_ref().map(|b| b.name.as_str()),
            "Initializing compare sidebar"
        );
        sidebar.dispatcher.load_compare_state(
            &sidebar.repository,
            sidebar.state.selected_branch.as_ref(),
            ComparisonType::Default,
        );
        sidebar
    }

    /// Tear the sidebar down, dropping any deferred work, and hand the
    /// dispatcher back to the owner.
    pub fn dispose(self) -> D {
        debug!(repository = %self.repository.name(), "Disposing compare sidebar");
        self.load_changed_files.dispose();
        self.dispatcher
    }

    /// Current selection state
    #[must_use]
    pub const fn state(&self) -> &ComparisonSelectionState {
        &self.state
    }

    /// Repository this sidebar compares
    #[must_use]
    pub const fn repository(&self) -> &Repository {
        &self.repository
    }

    /// The command sink
    #[must_use]
    pub const fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Mutable access to the command sink
    pub const fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// Whether a changed-files load is waiting on the debounce delay
    #[must_use]
    pub const fn has_pending_work(&self) -> bool {
        self.load_changed_files.is_pending()
    }

    /// Route an event to its handler
    pub fn handle(&mut self, event: SidebarEvent, repo_state: &RepositoryState, now: Instant) {
        match event {
            SidebarEvent::FilterFocused => self.on_filter_focused(),
            SidebarEvent::FilterBlurred => self.on_filter_blurred(),
            SidebarEvent::FilterTextChanged(text) => self.on_filter_text_changed(text),
            SidebarEvent::BranchHighlighted(branch) => self.on_branch_highlighted(branch),
            SidebarEvent::BranchClicked(branch) => self.on_branch_clicked(branch),
            SidebarEvent::CompareTypeChanged(compare_type) => {
                self.on_compare_type_changed(compare_type);
            }
            SidebarEvent::CommitSelected(sha) => self.on_commit_selected(&sha, now),
            SidebarEvent::Scrolled(visible) => self.on_scroll(visible, repo_state),
            SidebarEvent::MergeClicked => self.on_merge_clicked(repo_state),
        }
    }

    /// Show the branch picker
    pub const fn on_filter_focused(&mut self) {
        self.state.show_filter_list = true;
    }

    /// Hide the branch picker
    pub const fn on_filter_blurred(&mut self) {
        self.state.show_filter_list = false;
    }

    /// Store the typed filter text; the picker narrows itself from it
    pub fn on_filter_text_changed(&mut self, text: impl Into<String>) {
        self.state.filter_text = text.into();
    }

    /// Track the picker's highlighted branch without loading anything
    pub fn on_branch_highlighted(&mut self, branch: Option<Branch>) {
        self.state.selected_branch = branch;
    }

    /// Compare against a branch picked from the list
    pub fn on_branch_clicked(&mut self, branch: Branch) {
        let compare_type = self.state.pick_branch(branch);
        debug!(
            branch = self.state.selected_branch.as_ref().map(|b| b.name.as_str()),
            compare_type = compare_type.label(),
            "Branch picked for comparison"
        );
        self.dispatcher.load_compare_state(
            &self.repository,
            self.state.selected_branch.as_ref(),
            compare_type,
        );
    }

    /// Switch between `Ahead` and `Behind` for the selected branch.
    ///
    /// Ignored when no branch is selected, and for `Default`, which is not a
    /// radio option.
    pub fn on_compare_type_changed(&mut self, compare_type: ComparisonType) {
        if compare_type == ComparisonType::Default {
            debug!("Ignoring radio change to default comparison");
            return;
        }
        let Some(branch) = self.state.selected_branch.as_ref() else {
            debug!("No branch selected, ignoring comparison change");
            return;
        };

        self.dispatcher
            .load_compare_state(&self.repository, Some(branch), compare_type);
        self.state.compare_type = compare_type;
    }

    /// Select a commit now and load its changed files once selection settles
    pub fn on_commit_selected(&mut self, sha: &str, now: Instant) {
        self.dispatcher
            .change_history_commit_selection(&self.repository, sha);
        self.load_changed_files.queue_at((), now);
    }

    /// Run deferred work that has become due. Returns whether anything ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.load_changed_files.take_due(now).is_none() {
            return false;
        }
        self.dispatcher
            .load_changed_files_for_current_selection(&self.repository);
        true
    }

    /// Load the next history page when the visible window nears the end of
    /// the loaded commits.
    pub fn on_scroll(&mut self, visible: Range<usize>, repo_state: &RepositoryState) {
        let loaded = repo_state.compare.commit_shas.len();
        if loaded.saturating_sub(visible.end) <= self.close_to_bottom_threshold {
            debug!(loaded, end = visible.end, "Near end of history, loading next batch");
            self.dispatcher.load_next_history_batch(&self.repository);
        }
    }

    /// Merge the selected branch into the current one
    pub fn on_merge_clicked(&mut self, repo_state: &RepositoryState) {
        if !repo_state.branches.tip.is_valid() {
            debug!("Tip is not a branch, ignoring merge");
            return;
        }
        let Some(branch) = self.state.selected_branch.as_ref() else {
            debug!("No branch selected, ignoring merge");
            return;
        };

        self.dispatcher
            .merge_branch(&self.repository, &branch.name);
    }

    /// Re-derive the current branch after the store changed
    pub fn on_repository_state_changed(&mut self, repo_state: &RepositoryState) {
        let current = repo_state.branches.current_branch();
        if self.state.current_branch.as_ref() != current {
            debug!(
                current = current.map(|b| b.name.as_str()),
                "Current branch changed"
            );
            self.state.current_branch = current.cloned();
        }
    }
}
