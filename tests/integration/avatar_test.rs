//! Integration tests for avatar caching through the refresh cycle.

use std::time::Duration;

use rosterwatch_worker::CycleOutcome;

use crate::helpers::{OWNER, TestHarness, peer, wait_until};

#[tokio::test]
async fn test_avatar_swapped_to_local_copy_after_download() {
    let h = TestHarness::new();
    h.api.set_roster(&[peer(1)]);
    h.api
        .set_presence(peer(1), "Alice", 1, None, Some("https://cdn.example/a.jpg"));

    h.cycle.run_once().await;
    assert_eq!(
        h.board().view.online[0].avatar.as_deref(),
        Some("https://cdn.example/a.jpg")
    );

    let store = h.cycle.avatars().store();
    assert!(wait_until(|| store.path_for(peer(1)).is_file()).await);

    h.next_minute();
    assert_eq!(h.cycle.run_once().await, CycleOutcome::Published);
    let avatar = h.board().view.online[0].avatar.clone().unwrap();
    assert!(avatar.starts_with("file://"));
    assert_eq!(h.avatars.fetches(), 1);
}

#[tokio::test]
async fn test_downloads_capped_per_cycle() {
    let h = TestHarness::new();
    let ids: Vec<_> = (1..=10).map(peer).collect();
    h.api.set_roster(&ids);
    for id in &ids {
        let url = format!("https://cdn.example/{id}.jpg");
        h.api.set_presence(*id, &format!("p{id}"), 1, None, Some(&url));
    }

    h.cycle.run_once().await;
    assert!(wait_until(|| h.avatars.fetches() == 4).await);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.avatars.fetches(), 4);

    let store = h.cycle.avatars().store();
    let cached = || ids.iter().filter(|id| store.path_for(**id).is_file()).count();
    assert!(wait_until(|| cached() == 4).await);

    h.next_minute();
    h.cycle.run_once().await;
    assert!(wait_until(|| h.avatars.fetches() == 8).await);
}

#[tokio::test]
async fn test_offline_rows_only_use_cached_avatars() {
    let h = TestHarness::new();
    h.api.set_roster(&[peer(1)]);
    h.api
        .set_presence(peer(1), "Alice", 0, None, Some("https://cdn.example/a.jpg"));

    h.cycle.run_once().await;
    assert_eq!(h.board().view.offline[0].avatar, None);

    h.cycle
        .avatars()
        .store()
        .write_atomic(peer(1), b"cached")
        .await
        .unwrap();

    h.next_minute();
    assert_eq!(h.cycle.run_once().await, CycleOutcome::Published);
    let avatar = h.board().view.offline[0].avatar.clone().unwrap();
    assert!(avatar.starts_with("file://"));
    assert_eq!(h.avatars.fetches(), 0);
}

#[tokio::test]
async fn test_own_avatar_downloaded_outside_peer_budget() {
    let h = TestHarness::with_config(|c| c.cache.avatar_downloads_per_cycle = 1);
    h.api.set_roster(&[peer(1), peer(2)]);
    h.api
        .set_presence(OWNER, "Me", 1, None, Some("https://cdn.example/me.jpg"));
    h.api
        .set_presence(peer(1), "Alice", 1, None, Some("https://cdn.example/a.jpg"));
    h.api
        .set_presence(peer(2), "Bob", 1, None, Some("https://cdn.example/b.jpg"));

    h.cycle.run_once().await;

    let store = h.cycle.avatars().store();
    assert!(
        wait_until(|| store.path_for(OWNER).is_file() && store.path_for(peer(1)).is_file()).await
    );
    assert_eq!(h.avatars.fetches(), 2);
    assert!(!store.exists(peer(2)).await);
}
