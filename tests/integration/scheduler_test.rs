//! Integration tests for the scheduler driving a real presence cycle.

use std::sync::Arc;

use chrono::Duration;

use rosterwatch_core::traits::Clock;
use rosterwatch_worker::{ManualTicks, Scheduler, SchedulerState, TickOutcome, TickSource};

use crate::helpers::{OWNER, TestHarness, peer, wait_until};

fn harness() -> TestHarness {
    let h = TestHarness::new();
    h.api.set_roster(&[peer(1)]);
    h.api.set_presence(OWNER, "Me", 1, None, None);
    h.api.set_presence(peer(1), "Alice", 0, None, None);
    h
}

fn scheduler(h: &TestHarness, ticks: ManualTicks) -> Scheduler {
    Scheduler::new(
        h.cycle.clone(),
        h.clock.clone(),
        Arc::new(move || Box::new(ticks.clone()) as Box<dyn TickSource>),
        Duration::minutes(10),
    )
}

#[tokio::test]
async fn test_eager_cycle_then_timer_ticks() {
    let h = harness();
    let ticks = ManualTicks::new();
    let scheduler = scheduler(&h, ticks.clone());

    assert!(scheduler.start());
    assert!(wait_until(|| h.board().revision == 1).await);

    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.next_minute();
    ticks.fire();
    assert!(wait_until(|| h.board().revision == 2).await);
    assert_eq!(h.banner.count(), 1);

    scheduler.stop();
    scheduler.await_completion().await;
    assert_eq!(scheduler.state(), SchedulerState::Idle);
}

#[tokio::test]
async fn test_foreground_activity_pauses_polling() {
    let h = harness();
    let scheduler = scheduler(&h, ManualTicks::new());

    scheduler.activity_started(h.clock.now());
    assert_eq!(scheduler.force_tick().await, TickOutcome::Paused);
    assert_eq!(h.api.roster_calls(), 0);

    h.clock.advance(Duration::minutes(11));
    assert_eq!(scheduler.force_tick().await, TickOutcome::Completed);
    assert_eq!(scheduler.paused_until(), None);
}

#[tokio::test]
async fn test_resume_after_activity_rebaselines() {
    let h = harness();
    let scheduler = scheduler(&h, ManualTicks::new());
    assert_eq!(scheduler.force_tick().await, TickOutcome::Completed);

    scheduler.activity_started(h.clock.now());
    h.api.set_presence(peer(1), "Alice", 1, None, None);
    h.next_minute();
    assert_eq!(scheduler.force_tick().await, TickOutcome::Paused);

    scheduler.activity_stopped();
    assert!(wait_until(|| h.board().revision == 2).await);
    assert_eq!(h.banner.count(), 0);

    scheduler.stop();
}

#[tokio::test]
async fn test_disabled_polling_never_runs() {
    let h = TestHarness::with_config(|c| c.polling.enabled = false);
    h.api.set_roster(&[peer(1)]);
    let scheduler = scheduler(&h, ManualTicks::new());

    assert!(!scheduler.start());
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert_eq!(scheduler.force_tick().await, TickOutcome::Disabled);
    assert_eq!(h.api.roster_calls(), 0);
}
