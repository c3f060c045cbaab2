//! Tests for reading branch snapshots from a repository

use crate::common::TestFixture;
use branch_compare::compare::branch_candidates;
use branch_compare::model::TipState;

#[test]
fn test_snapshot_of_fresh_repository() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    let state = fixture.repository_state()?;

    assert_eq!(
        state.branches.current_branch().map(|b| b.name.as_str()),
        Some("master")
    );
    assert_eq!(
        state.branches.default_branch.as_ref().map(|b| b.name.as_str()),
        Some("master")
    );
    assert!(branch_candidates(&state.branches).is_empty());
    Ok(())
}

#[test]
fn test_recent_branches_follow_checkouts() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.create_branch("feature")?;
    fixture.create_branch("bugfix")?;
    fixture.checkout("feature")?;
    fixture.checkout("bugfix")?;
    fixture.checkout("master")?;

    let state = fixture.repository_state()?;
    let recent: Vec<_> = state
        .branches
        .recent_branches
        .iter()
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(recent, vec!["master", "bugfix", "feature"]);

    // The picker never offers the checked out branch
    let candidates = branch_candidates(&state.branches);
    let offered: Vec<_> = candidates.recent.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(offered, vec!["bugfix", "feature"]);
    Ok(())
}

#[test]
fn test_detached_head_offers_every_branch() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.create_branch("feature")?;
    let head = fixture.repo.refname_to_id("HEAD")?;
    fixture.repo.set_head_detached(head)?;

    let state = fixture.repository_state()?;
    assert!(matches!(state.branches.tip, TipState::Detached { .. }));
    assert_eq!(
        branch_candidates(&state.branches).all.len(),
        state.branches.all_branches.len()
    );
    Ok(())
}
