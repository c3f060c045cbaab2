//! End-to-end sidebar flows against a real repository snapshot

use std::time::{Duration, Instant};

use crate::common::TestFixture;
use branch_compare::compare::{CompareSidebar, SidebarContext, SidebarEvent, merge_call_to_action};
use branch_compare::config::Config;
use branch_compare::dispatch::{ChannelDispatcher, Command};
use branch_compare::model::ComparisonType;

#[test]
fn test_pick_compare_and_merge_flow() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.create_branch("feature")?;
    fixture.checkout("feature")?;
    fixture.commit_file("feature.txt", "work\n", "Feature work")?;
    fixture.checkout("master")?;

    let mut state = fixture.repository_state()?;
    let (dispatcher, rx) = ChannelDispatcher::new();
    let mut sidebar = CompareSidebar::initialize(
        SidebarContext {
            repository: fixture.repository(),
            dispatcher,
            config: Config::default(),
        },
        &state,
    );
    let now = Instant::now();

    let feature = state
        .branches
        .all_branches
        .iter()
        .find(|b| b.name == "feature")
        .cloned()
        .ok_or("feature branch missing")?;

    sidebar.handle(SidebarEvent::FilterFocused, &state, now);
    sidebar.handle(SidebarEvent::FilterTextChanged("feat".to_string()), &state, now);
    sidebar.handle(SidebarEvent::BranchClicked(feature.clone()), &state, now);
    sidebar.handle(SidebarEvent::FilterBlurred, &state, now);
    assert_eq!(sidebar.state().compare_type, ComparisonType::Behind);

    sidebar.handle(
        SidebarEvent::CompareTypeChanged(ComparisonType::Ahead),
        &state,
        now,
    );

    // Pretend the store finished the comparison
    state.compare.behind = 1;
    state.compare.commit_shas = vec![feature.tip_sha.clone()];
    let cta = merge_call_to_action(sidebar.state(), &state.branches, &state.compare)
        .ok_or("merge call to action should be visible")?;
    assert_eq!(cta.button_label, "Merge into master");
    assert_eq!(
        cta.message.as_deref(),
        Some("This will merge 1 commit from feature")
    );

    sidebar.handle(SidebarEvent::MergeClicked, &state, now);
    drop(sidebar.dispose());

    let commands: Vec<Command> = rx.try_iter().collect();
    let repository = fixture.repository();
    assert_eq!(
        commands,
        vec![
            Command::LoadCompareState {
                repository: repository.clone(),
                branch: state.branches.default_branch.clone(),
                compare_type: ComparisonType::Default,
            },
            Command::LoadCompareState {
                repository: repository.clone(),
                branch: Some(feature.clone()),
                compare_type: ComparisonType::Behind,
            },
            Command::LoadCompareState {
                repository: repository.clone(),
                branch: Some(feature),
                compare_type: ComparisonType::Ahead,
            },
            Command::MergeBranch {
                repository,
                branch_name: "feature".to_string(),
            },
        ]
    );
    Ok(())
}

#[test]
fn test_commit_browsing_debounces_changed_files() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    let state = fixture.repository_state()?;
    let (dispatcher, rx) = ChannelDispatcher::new();
    let mut sidebar = CompareSidebar::initialize(
        SidebarContext {
            repository: fixture.repository(),
            dispatcher,
            config: Config::default(),
        },
        &state,
    );
    let start = Instant::now();

    for (i, sha) in ["a", "b", "c", "d"].into_iter().enumerate() {
        let at = start + Duration::from_millis(40 * u64::try_from(i)?);
        sidebar.handle(SidebarEvent::CommitSelected(sha.to_string()), &state, at);
        sidebar.tick(at);
    }
    sidebar.tick(start + Duration::from_millis(120 + 200));
    sidebar.tick(start + Duration::from_secs(5));

    let kinds: Vec<_> = rx.try_iter().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "load_compare_state",
            "change_history_commit_selection",
            "change_history_commit_selection",
            "change_history_commit_selection",
            "change_history_commit_selection",
            "load_changed_files_for_current_selection",
        ]
    );
    Ok(())
}

#[test]
fn test_teardown_before_delay_drops_changed_files() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    let state = fixture.repository_state()?;
    let (dispatcher, rx) = ChannelDispatcher::new();
    let mut sidebar = CompareSidebar::initialize(
        SidebarContext {
            repository: fixture.repository(),
            dispatcher,
            config: Config::default(),
        },
        &state,
    );

    sidebar.on_commit_selected("abc", Instant::now());
    assert!(sidebar.has_pending_work());
    drop(sidebar.dispose());

    assert!(
        rx.try_iter()
            .all(|c| c.kind() != "load_changed_files_for_current_selection")
    );
    Ok(())
}
