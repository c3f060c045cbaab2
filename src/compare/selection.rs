//! Local selection state of the compare sidebar and the pure derivations
//! the presentation layer reads from it.

use crate::model::{Branch, BranchesState, CompareState, ComparisonType};

/// Placeholder shown in an empty filter box when no branch name is known
pub const SELECT_BRANCH_PLACEHOLDER: &str = "Select branch";

/// What the user has picked and typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSelectionState {
    /// Checked out branch, absent while the tip is not valid
    pub current_branch: Option<Branch>,
    /// Branch the user is comparing against
    pub selected_branch: Option<Branch>,
    /// Active comparison
    pub compare_type: ComparisonType,
    /// Raw filter text
    pub filter_text: String,
    /// Whether the branch picker replaces the commit list
    pub show_filter_list: bool,
}

impl ComparisonSelectionState {
    /// Initial state: nothing typed, picker hidden, `Default` comparison
    #[must_use]
    pub fn new(branches: &BranchesState) -> Self {
        Self {
            current_branch: branches.current_branch().cloned(),
            selected_branch: branches.default_branch.clone(),
            compare_type: ComparisonType::Default,
            filter_text: String::new(),
            show_filter_list: false,
        }
    }

    /// Record a branch click and return the comparison to load for it
    pub fn pick_branch(&mut self, branch: Branch) -> ComparisonType {
        let compare_type = next_compare_type(self.compare_type);
        self.compare_type = compare_type;
        self.filter_text.clone_from(&branch.name);
        self.selected_branch = Some(branch);
        compare_type
    }
}

/// Comparison used when a branch is picked from the list.
///
/// The first pick shows what the current branch is missing; every later pick
/// shows `Ahead`, whatever was chosen before.
#[must_use]
pub const fn next_compare_type(current: ComparisonType) -> ComparisonType {
    match current {
        ComparisonType::Default => ComparisonType::Behind,
        ComparisonType::Ahead | ComparisonType::Behind => ComparisonType::Ahead,
    }
}

/// Branches the picker may offer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchCandidates<'a> {
    /// Every branch except the current one
    pub all: Vec<&'a Branch>,
    /// Recent branches except the current one
    pub recent: Vec<&'a Branch>,
}

impl BranchCandidates<'_> {
    /// Keep only branches whose name contains `filter_text`, ignoring case
    #[must_use]
    pub fn matching(&self, filter_text: &str) -> Self {
        Self {
            all: filter_by_text(&self.all, filter_text),
            recent: filter_by_text(&self.recent, filter_text),
        }
    }

    /// Whether neither list has anything to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.recent.is_empty()
    }
}

/// Exclude the current branch (by name) from both branch lists.
///
/// With no current branch, both lists pass through unchanged.
#[must_use]
pub fn branch_candidates(branches: &BranchesState) -> BranchCandidates<'_> {
    let current = branches.current_branch().map(|b| b.name.as_str());
    let keep = |branch: &&Branch| current.is_none_or(|name| branch.name != name);

    BranchCandidates {
        all: branches.all_branches.iter().filter(keep).collect(),
        recent: branches.recent_branches.iter().filter(keep).collect(),
    }
}

fn filter_by_text<'a>(branches: &[&'a Branch], filter_text: &str) -> Vec<&'a Branch> {
    let needle = filter_text.trim().to_lowercase();
    if needle.is_empty() {
        return branches.to_vec();
    }
    branches
        .iter()
        .copied()
        .filter(|branch| branch.name.to_lowercase().contains(&needle))
        .collect()
}

/// Placeholder for the filter box
#[must_use]
pub fn placeholder_text<'a>(
    selected: Option<&'a Branch>,
    default_branch: Option<&'a Branch>,
) -> &'a str {
    selected
        .or(default_branch)
        .map_or(SELECT_BRANCH_PLACEHOLDER, |branch| branch.name.as_str())
}

/// Label for one of the ahead/behind radio options
#[must_use]
pub fn radio_label(compare_type: ComparisonType, compare: &CompareState) -> Option<String> {
    match compare_type {
        ComparisonType::Behind => Some(format!("Behind ({})", compare.behind)),
        ComparisonType::Ahead => Some(format!("Ahead ({})", compare.ahead)),
        ComparisonType::Default => None,
    }
}

/// The merge button and its explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCallToAction {
    /// Button label, e.g. `Merge into main`
    pub button_label: String,
    /// Summary of what the merge brings in; absent when nothing would
    pub message: Option<String>,
}

/// Build the merge call-to-action, if it should be shown at all.
///
/// It is shown only while comparing `Ahead` against a selected branch on a
/// valid tip.
#[must_use]
pub fn merge_call_to_action(
    selection: &ComparisonSelectionState,
    branches: &BranchesState,
    compare: &CompareState,
) -> Option<MergeCallToAction> {
    if selection.compare_type != ComparisonType::Ahead {
        return None;
    }
    let selected = selection.selected_branch.as_ref()?;
    let current = branches.current_branch()?;

    let message = (compare.behind > 0).then(|| {
        let noun = if compare.behind > 1 {
            "commits"
        } else {
            "commit"
        };
        format!(
            "This will merge {} {noun} from {}",
            compare.behind, selected.name
        )
    });

    Some(MergeCallToAction {
        button_label: format!("Merge into {}", current.name),
        message,
    })
}
