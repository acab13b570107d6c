//! Refresh loop for rosterwatch.
//!
//! This crate provides:
//! - A [`Scheduler`] with a reentrancy guard, pause gating, and an injectable
//!   tick source
//! - The [`PresenceCycle`] that runs one resolve, fetch, diff, and publish pass
//! - Display-list arrangement and the signature debouncer
//! - A [`BoardSink`] holding the published presence board

pub mod arrange;
pub mod board;
pub mod cycle;
pub mod scheduler;
pub mod signature;
pub mod ticks;

pub use board::{BoardSink, PresenceBoard};
pub use cycle::{Collaborators, CycleOutcome, PresenceCycle};
pub use scheduler::{CycleTask, Scheduler, SchedulerState, TickOutcome};
pub use ticks::{IntervalTicks, ManualTicks, TickSource};
