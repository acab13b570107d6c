//! Tick sources that drive the scheduler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Produces scheduler ticks.
#[async_trait]
pub trait TickSource: Send + 'static {
    /// Wait for the next tick. `false` means the source is exhausted.
    async fn tick(&mut self) -> bool;
}

/// Fixed-period ticks from the tokio timer.
///
/// The first tick fires one full period after creation; the scheduler runs
/// its eager cycle separately. Missed ticks are skipped, not replayed.
#[derive(Debug)]
pub struct IntervalTicks {
    interval: Interval,
}

impl IntervalTicks {
    /// Ticks every `period`.
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl TickSource for IntervalTicks {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Ticks fired by hand, for tests and host-driven refresh.
///
/// Clones share the same trigger. A fire with nobody waiting is kept until
/// the next wait.
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    trigger: Arc<Notify>,
}

impl ManualTicks {
    /// Create a trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire one tick.
    pub fn fire(&self) {
        self.trigger.notify_one();
    }
}

#[async_trait]
impl TickSource for ManualTicks {
    async fn tick(&mut self) -> bool {
        self.trigger.notified().await;
        true
    }
}
