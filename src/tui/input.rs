//! Key handling for the interactive sidebar
//!
//! While the branch picker is open, typed characters edit the filter and the
//! arrow keys move the highlight. Otherwise single keys drive the commit list
//! and the comparison controls.

use crate::compare::{
    ComparisonSelectionState, SidebarEvent, branch_candidates, merge_call_to_action,
};
use crate::model::{Branch, ComparisonType, RepositoryState};
use ratatui::crossterm::event::KeyCode;

/// What a key press asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the interactive view
    Quit,
    /// Re-read the branch snapshot
    Reload,
    /// Feed these events to the sidebar, in order
    Events(Vec<SidebarEvent>),
}

/// Map a key press to sidebar events, given what is on screen
#[must_use]
pub fn key_action(
    code: KeyCode,
    selection: &ComparisonSelectionState,
    repo_state: &RepositoryState,
) -> KeyAction {
    if selection.show_filter_list {
        KeyAction::Events(picker_events(code, selection, repo_state))
    } else {
        commit_list_action(code, selection, repo_state)
    }
}

fn picker_events(
    code: KeyCode,
    selection: &ComparisonSelectionState,
    repo_state: &RepositoryState,
) -> Vec<SidebarEvent> {
    match code {
        KeyCode::Esc => vec![SidebarEvent::FilterBlurred],
        KeyCode::Enter => {
            let mut events: Vec<_> = highlighted(selection, repo_state)
                .cloned()
                .map(SidebarEvent::BranchClicked)
                .into_iter()
                .collect();
            events.push(SidebarEvent::FilterBlurred);
            events
        }
        KeyCode::Down => move_highlight(selection, repo_state, true),
        KeyCode::Up => move_highlight(selection, repo_state, false),
        KeyCode::Char(c) => {
            let mut text = selection.filter_text.clone();
            text.push(c);
            vec![SidebarEvent::FilterTextChanged(text)]
        }
        KeyCode::Backspace => {
            let mut text = selection.filter_text.clone();
            if text.pop().is_none() {
                return Vec::new();
            }
            vec![SidebarEvent::FilterTextChanged(text)]
        }
        _ => Vec::new(),
    }
}

fn commit_list_action(
    code: KeyCode,
    selection: &ComparisonSelectionState,
    repo_state: &RepositoryState,
) -> KeyAction {
    let events = match code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('r') => return KeyAction::Reload,
        KeyCode::Char('/') => vec![SidebarEvent::FilterFocused],
        KeyCode::Char('a') => vec![SidebarEvent::CompareTypeChanged(ComparisonType::Ahead)],
        KeyCode::Char('b') => vec![SidebarEvent::CompareTypeChanged(ComparisonType::Behind)],
        // Only when the merge button is on screen
        KeyCode::Char('m')
            if merge_call_to_action(selection, &repo_state.branches, &repo_state.compare)
                .is_some() =>
        {
            vec![SidebarEvent::MergeClicked]
        }
        KeyCode::Down | KeyCode::Char('j') => move_commit(repo_state, true),
        KeyCode::Up | KeyCode::Char('k') => move_commit(repo_state, false),
        _ => Vec::new(),
    };
    KeyAction::Events(events)
}

/// Branches in the order the picker draws them, each name once
fn picker_order<'a>(
    selection: &ComparisonSelectionState,
    repo_state: &'a RepositoryState,
) -> Vec<&'a Branch> {
    let candidates = branch_candidates(&repo_state.branches).matching(&selection.filter_text);
    let mut order: Vec<&Branch> = Vec::new();
    for branch in candidates.recent.into_iter().chain(candidates.all) {
        if !order.iter().any(|b| b.name == branch.name) {
            order.push(branch);
        }
    }
    order
}

fn highlighted<'a>(
    selection: &ComparisonSelectionState,
    repo_state: &'a RepositoryState,
) -> Option<&'a Branch> {
    let selected = selection.selected_branch.as_ref()?;
    picker_order(selection, repo_state)
        .into_iter()
        .find(|b| b.name == selected.name)
}

fn move_highlight(
    selection: &ComparisonSelectionState,
    repo_state: &RepositoryState,
    forward: bool,
) -> Vec<SidebarEvent> {
    let order = picker_order(selection, repo_state);
    let current = selection
        .selected_branch
        .as_ref()
        .and_then(|selected| order.iter().position(|b| b.name == selected.name));

    let Some(branch) = step(current, order.len(), forward).and_then(|index| order.get(index))
    else {
        return Vec::new();
    };
    vec![SidebarEvent::BranchHighlighted(Some((*branch).clone()))]
}

fn move_commit(repo_state: &RepositoryState, forward: bool) -> Vec<SidebarEvent> {
    let compare = &repo_state.compare;
    let current = compare
        .selected_sha
        .as_ref()
        .and_then(|selected| compare.commit_shas.iter().position(|sha| sha == selected));

    let Some(index) = step(current, compare.commit_shas.len(), forward) else {
        return Vec::new();
    };
    let Some(sha) = compare.commit_shas.get(index) else {
        return Vec::new();
    };
    // The cursor row is the bottom of what the user has looked at
    vec![
        SidebarEvent::CommitSelected(sha.clone()),
        SidebarEvent::Scrolled(index..index + 1),
    ]
}

/// Next cursor position in a list of `len` rows, clamped to the ends
fn step(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    let last = len.checked_sub(1)?;
    Some(match (current, forward) {
        (None, true) => 0,
        (None, false) => last,
        (Some(index), true) => (index + 1).min(last),
        (Some(index), false) => index.saturating_sub(1),
    })
}
