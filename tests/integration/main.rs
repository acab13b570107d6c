//! End-to-end tests of the refresh cycle wired to in-memory fakes.

mod avatar_test;
mod cycle_test;
mod helpers;
mod notify_test;
mod scheduler_test;
