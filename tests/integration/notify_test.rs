//! Integration tests for transition notifications.

use chrono::Duration;

use rosterwatch_core::config::NotificationOutput;
use rosterwatch_core::types::TransitionKind;

use crate::helpers::{OWNER, TestHarness, peer};

fn with_peers(names: &[&str]) -> TestHarness {
    let h = TestHarness::new();
    let ids: Vec<_> = (1..=names.len() as u64).map(peer).collect();
    h.api.set_roster(&ids);
    for (id, name) in ids.iter().zip(names) {
        h.api.set_presence(*id, name, 0, None, None);
    }
    h.api.set_presence(OWNER, "Me", 0, None, None);
    h
}

#[tokio::test]
async fn test_first_cycle_is_baseline() {
    let h = with_peers(&["Alice"]);
    h.api.set_presence(peer(1), "Alice", 1, None, None);

    h.cycle.run_once().await;

    assert_eq!(h.banner.count(), 0);
    assert_eq!(h.toast.count(), 0);
}

#[tokio::test]
async fn test_cycle_without_peer_presence_is_not_a_baseline() {
    let h = TestHarness::new();
    h.api.set_roster(&[peer(1)]);
    h.api.set_presence(OWNER, "Me", 1, None, None);
    h.cycle.run_once().await;

    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.next_minute();
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 0);

    h.api.set_presence(peer(1), "Alice", 1, Some("Portal 2"), None);
    h.next_minute();
    h.cycle.run_once().await;
    let sent = h.banner.notifications();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, TransitionKind::ActivityStart);
}

#[tokio::test]
async fn test_connect_shows_banner() {
    let h = with_peers(&["Alice"]);
    h.cycle.run_once().await;

    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.next_minute();
    h.cycle.run_once().await;

    let sent = h.banner.notifications();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].peer_id, peer(1));
    assert_eq!(sent[0].kind, TransitionKind::Connect);
    assert_eq!(sent[0].banner_text, "Alice is now Online");
    assert_eq!(h.toast.count(), 0);
}

#[tokio::test]
async fn test_activity_start_on_both_outputs() {
    let h = with_peers(&["Alice"]);
    h.settings.update(|s| s.output = NotificationOutput::Both);
    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.cycle.run_once().await;

    h.api.set_presence(peer(1), "Alice", 1, Some("Portal 2"), None);
    h.next_minute();
    h.cycle.run_once().await;

    let banner = h.banner.notifications();
    assert_eq!(banner.len(), 1);
    assert_eq!(banner[0].kind, TransitionKind::ActivityStart);
    assert_eq!(banner[0].banner_text, "Alice started playing Portal 2");

    let toast = h.toast.notifications();
    assert_eq!(toast.len(), 1);
    assert_eq!(toast[0].toast_title, "Alice");
    assert_eq!(toast[0].toast_body, "Playing Portal 2");
}

#[tokio::test]
async fn test_one_notification_per_cycle() {
    let h = with_peers(&["Alice", "Bob"]);
    h.cycle.run_once().await;

    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.api.set_presence(peer(2), "Bob", 1, None, None);
    h.next_minute();
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 1);

    h.next_minute();
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 1);
}

#[tokio::test]
async fn test_cooldown_suppresses_rapid_reconnect() {
    let h = with_peers(&["Alice"]);
    h.cycle.run_once().await;

    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.clock.advance(Duration::seconds(1));
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 1);

    h.api.set_presence(peer(1), "Alice", 0, None, None);
    h.clock.advance(Duration::seconds(1));
    h.cycle.run_once().await;
    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.clock.advance(Duration::seconds(1));
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 1);

    h.api.set_presence(peer(1), "Alice", 0, None, None);
    h.clock.advance(Duration::seconds(10));
    h.cycle.run_once().await;
    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.clock.advance(Duration::seconds(10));
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 2);
}

#[tokio::test]
async fn test_disabled_output_tracks_history_silently() {
    let h = with_peers(&["Alice"]);
    h.settings.update(|s| s.output = NotificationOutput::Off);
    h.cycle.run_once().await;

    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.next_minute();
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 0);

    h.settings.update(|s| s.output = NotificationOutput::Banner);
    h.next_minute();
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 0);
}

#[tokio::test]
async fn test_own_transition_is_not_notified() {
    let h = with_peers(&["Alice"]);
    h.cycle.run_once().await;

    h.api.set_presence(OWNER, "Me", 1, Some("Portal 2"), None);
    h.next_minute();
    h.cycle.run_once().await;

    assert_eq!(h.banner.count(), 0);
    assert_eq!(h.board().self_profile.unwrap().activity.as_deref(), Some("Portal 2"));
}

#[tokio::test]
async fn test_resume_rebaselines() {
    let h = with_peers(&["Alice"]);
    h.cycle.run_once().await;

    h.cycle.request_rebaseline();
    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.next_minute();
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 0);

    h.api.set_presence(peer(1), "Alice", 1, Some("Portal 2"), None);
    h.next_minute();
    h.cycle.run_once().await;
    assert_eq!(h.banner.count(), 1);
}

#[tokio::test]
async fn test_test_notification_uses_placeholder_peer() {
    let h = with_peers(&["Alice"]);

    let sent = h.cycle.send_test_notification().unwrap();
    assert_eq!(sent.banner_text, "FriendName is now Online");
    assert_eq!(h.banner.count(), 1);

    h.settings.update(|s| {
        s.notify_on_connect = false;
        s.notify_on_activity_start = false;
    });
    assert!(h.cycle.send_test_notification().is_none());
    assert_eq!(h.banner.count(), 1);
}
