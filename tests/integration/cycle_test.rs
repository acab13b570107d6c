//! Integration tests for the presence refresh cycle.

use chrono::Duration;

use rosterwatch_core::traits::Clock;
use rosterwatch_core::types::PresenceState;
use rosterwatch_worker::CycleOutcome;

use crate::helpers::{OWNER, TestHarness, peer};

fn populated() -> TestHarness {
    let h = TestHarness::new();
    h.api.set_roster(&[peer(1), peer(2), peer(3), peer(4)]);
    h.api.set_presence(OWNER, "Me", 1, None, None);
    h.api.set_presence(peer(1), "bob", 1, None, None);
    h.api.set_presence(peer(2), "Alice", 1, Some("Portal 2"), None);
    h.api.set_presence(peer(3), "carol", 0, None, None);
    h.api.set_presence(peer(4), "Dave", 2, None, None);
    h
}

#[tokio::test]
async fn test_full_cycle_publishes_sorted_board() {
    let h = populated();

    assert_eq!(h.cycle.run_once().await, CycleOutcome::Published);

    let board = h.board();
    assert_eq!(board.status, None);
    assert_eq!(board.last_checked, Some(h.clock.now()));
    assert_eq!(board.view.counts.online, 3);
    assert_eq!(board.view.counts.in_game, 1);
    assert_eq!(board.view.counts.offline, 1);

    let online: Vec<_> = board.view.online.iter().map(|r| r.id).collect();
    assert_eq!(online, vec![peer(2), peer(1), peer(4)]);
    assert_eq!(board.view.online[0].state, PresenceState::InGame);
    assert_eq!(board.view.online[0].activity.as_deref(), Some("Portal 2"));
    assert_eq!(board.view.online[2].state_label, "Busy");

    assert_eq!(board.view.offline.len(), 1);
    assert_eq!(board.view.offline[0].state_label, "Offline");

    let me = board.self_profile.unwrap();
    assert_eq!(me.display_name.as_deref(), Some("Me"));
    assert_eq!(me.state, PresenceState::Online);
}

#[tokio::test]
async fn test_identical_snapshot_only_refreshes_timestamp() {
    let h = populated();
    h.cycle.run_once().await;
    let revision = h.board().revision;

    h.next_minute();
    assert_eq!(h.cycle.run_once().await, CycleOutcome::Unchanged);

    let board = h.board();
    assert_eq!(board.revision, revision);
    assert_eq!(board.last_checked, Some(h.clock.now()));
}

#[tokio::test]
async fn test_vanity_profile_is_resolved_once() {
    let h = TestHarness::with_config(|c| {
        c.account.profile = "https://steamcommunity.com/id/someone/".into();
    });
    h.api.add_vanity("someone", OWNER);
    h.api.set_roster(&[peer(1)]);
    h.api.set_presence(peer(1), "bob", 1, None, None);

    assert_eq!(h.cycle.run_once().await, CycleOutcome::Published);
    h.next_minute();
    h.cycle.run_once().await;

    assert_eq!(h.api.vanity_calls(), 1);
}

#[tokio::test]
async fn test_unknown_vanity_is_missing_configuration() {
    let h = TestHarness::with_config(|c| c.account.profile = "nobody".into());

    assert_eq!(
        h.cycle.run_once().await,
        CycleOutcome::MissingConfiguration
    );
    assert_eq!(
        h.board().status.as_deref(),
        Some("Missing API key or profile.")
    );
}

#[tokio::test]
async fn test_missing_api_key_resets_board() {
    let h = populated();
    h.cycle.run_once().await;
    assert!(!h.board().view.online.is_empty());

    h.settings.update(|s| s.api_key.clear());
    h.next_minute();
    assert_eq!(
        h.cycle.run_once().await,
        CycleOutcome::MissingConfiguration
    );

    let board = h.board();
    assert!(board.view.online.is_empty());
    assert_eq!(board.last_checked, None);
    assert_eq!(board.status.as_deref(), Some("Missing API key or profile."));
}

#[tokio::test]
async fn test_roster_refetched_only_after_ttl() {
    let h = populated();
    h.cycle.run_once().await;

    h.clock.advance(Duration::hours(5));
    h.cycle.run_once().await;
    assert_eq!(h.api.roster_calls(), 1);

    h.clock.advance(Duration::hours(2));
    h.cycle.run_once().await;
    assert_eq!(h.api.roster_calls(), 2);
}

#[tokio::test]
async fn test_empty_roster_resets_then_recovers() {
    let h = TestHarness::new();

    assert_eq!(h.cycle.run_once().await, CycleOutcome::EmptyRoster);
    assert_eq!(
        h.board().status.as_deref(),
        Some("No friends returned by the remote API.")
    );

    h.api.set_roster(&[peer(1)]);
    h.api.set_presence(peer(1), "bob", 1, None, None);
    h.next_minute();
    assert_eq!(h.cycle.run_once().await, CycleOutcome::Published);
    assert_eq!(h.board().status, None);
}

#[tokio::test]
async fn test_failure_keeps_board_until_stale() {
    let h = populated();
    h.cycle.run_once().await;

    h.api.fail(true);
    h.clock.advance(Duration::minutes(5));
    assert_eq!(
        h.cycle.run_once().await,
        CycleOutcome::Failed { reset: false }
    );
    let board = h.board();
    assert_eq!(board.status, None);
    assert_eq!(board.view.online.len(), 3);

    h.clock.advance(Duration::minutes(6));
    assert_eq!(
        h.cycle.run_once().await,
        CycleOutcome::Failed { reset: true }
    );
    let board = h.board();
    assert!(board.view.online.is_empty());
    assert_eq!(
        board.status.as_deref(),
        Some("Remote API error (no successful refresh for 10 minutes).")
    );

    h.api.fail(false);
    h.next_minute();
    assert_eq!(h.cycle.run_once().await, CycleOutcome::Published);
}

#[tokio::test]
async fn test_offline_list_follows_setting() {
    let h = populated();
    h.settings.update(|s| s.show_offline = false);

    h.cycle.run_once().await;

    let board = h.board();
    assert!(board.view.offline.is_empty());
    assert_eq!(board.view.counts.offline, 1);
}

#[tokio::test]
async fn test_online_list_is_truncated() {
    let h = TestHarness::with_config(|c| c.display.max_online = 5);
    let ids: Vec<_> = (1..=8).map(peer).collect();
    h.api.set_roster(&ids);
    for (i, id) in ids.iter().enumerate() {
        h.api.set_presence(*id, &format!("peer{i}"), 1, None, None);
    }

    h.cycle.run_once().await;

    let board = h.board();
    assert_eq!(board.view.counts.online, 8);
    assert_eq!(board.view.online.len(), 5);
    assert_eq!(board.view.online[0].display_name, "peer0");
}

#[tokio::test]
async fn test_self_without_presence_is_offline() {
    let h = TestHarness::new();
    h.api.set_roster(&[peer(1)]);
    h.api.set_presence(peer(1), "bob", 1, None, None);

    h.cycle.run_once().await;

    let me = h.board().self_profile.unwrap();
    assert_eq!(me.display_name, None);
    assert_eq!(me.state, PresenceState::Offline);
    assert!(h.board().view.online.iter().all(|r| r.id != OWNER));
}
