//! Refresh scheduler.
//!
//! State machine: `Idle` (no timer) → `Armed` (timer running) → `Ticking`
//! (one cycle in flight) → back to `Armed`. Arming always runs one eager
//! cycle before waiting for the first tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use rosterwatch_core::traits::Clock;

use crate::ticks::TickSource;

/// Work executed on every tick.
#[async_trait]
pub trait CycleTask: Send + Sync + std::fmt::Debug + 'static {
    /// Run one cycle. Failures are handled inside the cycle.
    async fn run_cycle(&self);

    /// Whether the feature should run at all under the current configuration.
    fn should_run(&self) -> bool {
        true
    }

    /// Called when polling resumes after a foreground activity ended.
    fn on_resume(&self) {}
}

/// Builds a fresh tick source each time the scheduler is armed.
pub type TickFactory = Arc<dyn Fn() -> Box<dyn TickSource> + Send + Sync>;

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// No timer running.
    Idle,
    /// Timer running, no cycle in flight.
    Armed,
    /// A cycle is in flight.
    Ticking,
}

/// Result of one tick attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A cycle ran to completion.
    Completed,
    /// Another cycle was in flight; nothing ran.
    Busy,
    /// Polling is paused for a foreground activity.
    Paused,
    /// The task does not want to run.
    Disabled,
}

struct Timer {
    cancel: watch::Sender<bool>,
    _handle: JoinHandle<()>,
}

struct Inner {
    task: Arc<dyn CycleTask>,
    clock: Arc<dyn Clock>,
    ticks: TickFactory,
    pause_duration: Duration,
    busy: AtomicBool,
    paused_until: Mutex<Option<DateTime<Utc>>>,
    state: watch::Sender<SchedulerState>,
    timer: Mutex<Option<Timer>>,
}

/// Clears the busy flag and restores the resting state when a cycle ends.
struct BusyGuard<'a> {
    inner: &'a Inner,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.inner.busy.store(false, Ordering::SeqCst);
        self.inner.state.send_replace(self.inner.resting_state());
    }
}

impl Inner {
    fn is_armed(&self) -> bool {
        self.timer.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    fn resting_state(&self) -> SchedulerState {
        if self.is_armed() {
            SchedulerState::Armed
        } else {
            SchedulerState::Idle
        }
    }

    fn is_paused(&self, now: DateTime<Utc>) -> bool {
        let mut paused = self.paused_until.lock().unwrap_or_else(|e| e.into_inner());
        match *paused {
            Some(until) if now < until => true,
            Some(_) => {
                *paused = None;
                false
            }
            None => false,
        }
    }

    async fn tick(&self) -> TickOutcome {
        if !self.task.should_run() {
            return TickOutcome::Disabled;
        }
        if self.is_paused(self.clock.now()) {
            trace!("Tick skipped, paused");
            return TickOutcome::Paused;
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            trace!("Tick skipped, cycle in flight");
            return TickOutcome::Busy;
        }

        let _guard = BusyGuard { inner: self };
        self.state.send_replace(SchedulerState::Ticking);
        self.task.run_cycle().await;
        TickOutcome::Completed
    }

    fn disarm(&self) -> bool {
        let timer = self.timer.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(timer) = timer else {
            return false;
        };
        let _ = timer.cancel.send(true);
        if !self.busy.load(Ordering::SeqCst) {
            self.state.send_replace(SchedulerState::Idle);
        }
        true
    }

    async fn run_loop(
        self: Arc<Self>,
        mut ticks: Box<dyn TickSource>,
        mut cancel: watch::Receiver<bool>,
    ) {
        if self.tick().await == TickOutcome::Disabled {
            self.disarm();
            return;
        }

        loop {
            tokio::select! {
                biased;
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
                more = ticks.tick() => {
                    if !more {
                        break;
                    }
                    if self.tick().await == TickOutcome::Disabled {
                        info!("Refresh disabled, stopping timer");
                        self.disarm();
                        break;
                    }
                }
            }
        }
        debug!("Refresh loop stopped");
    }
}

/// Owns the recurring refresh timer.
///
/// At most one cycle runs at a time; a tick arriving while one is in flight
/// is dropped. Ticks are also dropped while paused or while the task's
/// `should_run` predicate is false, and the latter disarms the timer.
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &*self.inner.state.borrow())
            .field("task", &self.inner.task)
            .finish()
    }
}

impl Scheduler {
    /// Create an idle scheduler.
    ///
    /// `pause_duration` is how long polling stays paused after
    /// [`Scheduler::activity_started`].
    pub fn new(
        task: Arc<dyn CycleTask>,
        clock: Arc<dyn Clock>,
        ticks: TickFactory,
        pause_duration: Duration,
    ) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            inner: Arc::new(Inner {
                task,
                clock,
                ticks,
                pause_duration,
                busy: AtomicBool::new(false),
                paused_until: Mutex::new(None),
                state,
                timer: Mutex::new(None),
            }),
        }
    }

    /// Arm the timer and run one eager cycle.
    ///
    /// Returns `false` and stays idle when the task does not want to run.
    /// Arming an armed scheduler is a no-op.
    pub fn start(&self) -> bool {
        if !self.inner.task.should_run() {
            self.inner.disarm();
            return false;
        }

        let mut timer = self.inner.timer.lock().unwrap_or_else(|e| e.into_inner());
        if timer.is_some() {
            return true;
        }

        let (cancel, cancel_rx) = watch::channel(false);
        let ticks = (self.inner.ticks)();
        let handle = tokio::spawn(Arc::clone(&self.inner).run_loop(ticks, cancel_rx));
        *timer = Some(Timer {
            cancel,
            _handle: handle,
        });
        drop(timer);

        if !self.inner.busy.load(Ordering::SeqCst) {
            self.inner.state.send_replace(SchedulerState::Armed);
        }
        info!("Refresh scheduler armed");
        true
    }

    /// Cancel the timer. A cycle already in flight runs to completion.
    pub fn stop(&self) {
        if self.inner.disarm() {
            info!("Refresh scheduler stopped");
        }
    }

    /// Run one cycle now, subject to the same gates as a timer tick.
    pub async fn force_tick(&self) -> TickOutcome {
        self.inner.tick().await
    }

    /// Wait until no cycle is in flight.
    pub async fn await_completion(&self) {
        let mut rx = self.inner.state.subscribe();
        let _ = rx.wait_for(|s| *s != SchedulerState::Ticking).await;
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        *self.inner.state.borrow()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.inner.state.subscribe()
    }

    /// Suppress cycles until `until`.
    pub fn pause_until(&self, until: DateTime<Utc>) {
        *self
            .inner
            .paused_until
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(until);
    }

    /// Lift any pause.
    pub fn resume(&self) {
        *self
            .inner
            .paused_until
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// End of the current pause, if any.
    pub fn paused_until(&self) -> Option<DateTime<Utc>> {
        *self
            .inner
            .paused_until
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// A foreground activity started: pause polling for the configured time.
    pub fn activity_started(&self, now: DateTime<Utc>) {
        let until = now + self.inner.pause_duration;
        self.pause_until(until);
        info!(until = %until, "Foreground activity started, polling paused");
    }

    /// A foreground activity ended: resume, re-baseline, and re-arm with an
    /// eager cycle.
    pub fn activity_stopped(&self) {
        self.resume();
        self.inner.task.on_resume();
        self.inner.disarm();
        info!("Foreground activity stopped, polling resumed");
        self.start();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.inner.disarm();
    }
}
