//! Compare sidebar rendering

use super::colors;
use crate::compare::{
    ComparisonSelectionState, branch_candidates, merge_call_to_action, placeholder_text,
    radio_label,
};
use crate::model::{Branch, ComparisonType, RepositoryState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the sidebar into `area`.
///
/// The branch picker replaces the commit list while the filter box has focus.
pub fn render_sidebar(
    frame: &mut Frame<'_>,
    area: Rect,
    selection: &ComparisonSelectionState,
    repo_state: &RepositoryState,
) {
    let block = Block::default()
        .title(" Compare ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [filter_area, body_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

    frame.render_widget(Paragraph::new(filter_line(selection, repo_state)), filter_area);

    let body = if selection.show_filter_list {
        picker_lines(selection, repo_state)
    } else {
        commit_lines(selection, repo_state)
    };
    frame.render_widget(Paragraph::new(body), body_area);
}

fn filter_line<'a>(
    selection: &'a ComparisonSelectionState,
    repo_state: &'a RepositoryState,
) -> Line<'a> {
    let text = if selection.filter_text.is_empty() {
        Span::styled(
            placeholder_text(
                selection.selected_branch.as_ref(),
                repo_state.branches.default_branch.as_ref(),
            ),
            Style::default().fg(colors::TEXT_MUTED),
        )
    } else {
        Span::styled(
            selection.filter_text.as_str(),
            Style::default().fg(colors::TEXT_PRIMARY),
        )
    };
    Line::from(vec![
        Span::styled("Branch: ", Style::default().fg(colors::TEXT_DIM)),
        text,
    ])
}

fn branch_line(branch: &Branch, selected: Option<&Branch>) -> Line<'static> {
    let is_selected = selected.is_some_and(|s| s.name == branch.name);
    let (prefix, style) = if is_selected {
        (
            "> ",
            Style::default()
                .fg(colors::SELECTED)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(colors::TEXT_PRIMARY))
    };
    Line::from(vec![
        Span::raw(prefix),
        Span::styled(branch.name.clone(), style),
    ])
}

fn picker_lines<'a>(
    selection: &'a ComparisonSelectionState,
    repo_state: &'a RepositoryState,
) -> Vec<Line<'a>> {
    let candidates = branch_candidates(&repo_state.branches).matching(&selection.filter_text);
    if candidates.is_empty() {
        return vec![Line::from(Span::styled(
            "No branches match",
            Style::default().fg(colors::TEXT_DIM),
        ))];
    }

    let selected = selection.selected_branch.as_ref();
    let mut lines = Vec::new();
    if !candidates.recent.is_empty() {
        lines.push(section_header("── Recent ──"));
        lines.extend(candidates.recent.iter().map(|b| branch_line(b, selected)));
    }
    if !candidates.all.is_empty() {
        lines.push(section_header("── Branches ──"));
        lines.extend(candidates.all.iter().map(|b| branch_line(b, selected)));
    }
    lines
}

fn section_header(title: &str) -> Line<'_> {
    Line::from(Span::styled(title, Style::default().fg(colors::TEXT_MUTED)))
}

fn radio_span(
    compare_type: ComparisonType,
    selection: &ComparisonSelectionState,
    repo_state: &RepositoryState,
) -> Span<'static> {
    let label = radio_label(compare_type, &repo_state.compare).unwrap_or_default();
    if selection.compare_type == compare_type {
        Span::styled(
            format!("(*) {label}"),
            Style::default()
                .fg(colors::SELECTED)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!("( ) {label}"),
            Style::default().fg(colors::TEXT_DIM),
        )
    }
}

fn commit_lines<'a>(
    selection: &'a ComparisonSelectionState,
    repo_state: &'a RepositoryState,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    if selection.selected_branch.is_some() {
        lines.push(Line::from(vec![
            radio_span(ComparisonType::Behind, selection, repo_state),
            Span::raw("  "),
            radio_span(ComparisonType::Ahead, selection, repo_state),
        ]));
        lines.push(Line::from(""));
    }

    let compare = &repo_state.compare;
    if compare.commit_shas.is_empty() {
        lines.push(Line::from(Span::styled(
            "No commits",
            Style::default().fg(colors::TEXT_DIM),
        )));
    }
    for sha in &compare.commit_shas {
        let short = sha.get(..7).unwrap_or(sha.as_str());
        let line = if compare.selected_sha.as_deref() == Some(sha.as_str()) {
            Line::from(vec![
                Span::raw("> "),
                Span::styled(
                    short,
                    Style::default()
                        .fg(colors::SELECTED)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        } else {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(short, Style::default().fg(colors::TEXT_PRIMARY)),
            ])
        };
        lines.push(line);
    }

    if let Some(cta) = merge_call_to_action(selection, &repo_state.branches, compare) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[ {} ]", cta.button_label),
            Style::default()
                .fg(colors::ACCENT_POSITIVE)
                .add_modifier(Modifier::BOLD),
        )));
        if let Some(message) = cta.message {
            lines.push(Line::from(Span::styled(
                message,
                Style::default().fg(colors::TEXT_DIM),
            )));
        }
    }

    lines
}
