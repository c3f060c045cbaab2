//! Branch comparison: selection state, the debounce for follow-up loads, and
//! the coordinator that ties them to a [`Dispatcher`](crate::dispatch::Dispatcher).

mod coordinator;
mod scheduler;
mod selection;

pub use coordinator::{CompareSidebar, SidebarContext, SidebarEvent};
pub use scheduler::ThrottledScheduler;
pub use selection::{
    BranchCandidates, ComparisonSelectionState, MergeCallToAction, SELECT_BRANCH_PLACEHOLDER,
    branch_candidates, merge_call_to_action, next_compare_type, placeholder_text, radio_label,
};
