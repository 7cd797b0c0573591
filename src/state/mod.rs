//! Application state management.
//!
//! The board owns one mounted counter per [`Variant`] and the activity log
//! their deferred updates write to. Counter state itself lives in
//! [`StateCell`]s and [`Accumulator`]s shared with in-flight updates.

mod accumulator;
mod activity;
mod cell;

pub use accumulator::Accumulator;
pub use activity::{Activity, ActivityKind, ActivityLog, ACTIVITY_CAPACITY};
pub use cell::{StateCell, StateError};

use std::time::Duration;

use crate::counter::{self, Counter, CounterSnapshot, Variant};

/// Application state.
pub struct BoardState {
    /// One counter per variant, in [`Variant::ALL`] order.
    counters: Vec<Box<dyn Counter>>,
    /// Unmounted counters that still have updates in flight.
    retired: Vec<Box<dyn Counter>>,
    /// Shared activity log.
    activity: ActivityLog,
    /// Delay used for every deferred update.
    delay: Duration,
    /// Number of times the counters have been mounted.
    generation: u64,
    /// Index of the selected panel.
    selected: usize,
}

impl BoardState {
    /// Mounts one counter per variant. Must be called inside a `LocalSet`.
    pub fn mount(delay: Duration) -> Self {
        let activity = ActivityLog::new();
        let counters = Self::mount_counters(&activity, delay);

        Self {
            counters,
            retired: Vec::new(),
            activity,
            delay,
            generation: 1,
            selected: 0,
        }
    }

    fn mount_counters(activity: &ActivityLog, delay: Duration) -> Vec<Box<dyn Counter>> {
        Variant::ALL
            .iter()
            .map(|&variant| counter::mount(variant, activity.clone(), delay).counter)
            .collect()
    }

    pub fn snapshots(&self) -> Vec<CounterSnapshot> {
        self.counters.iter().map(|c| c.snapshot()).collect()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_variant(&self) -> Variant {
        self.counters[self.selected].variant()
    }

    /// Total updates still in flight across every counter, mounted or not.
    pub fn pending_total(&self) -> usize {
        self.counters
            .iter()
            .chain(&self.retired)
            .map(|c| c.scheduler().pending())
            .sum()
    }

    /// Schedules one increment on every counter.
    pub fn schedule_all(&self) {
        for counter in &self.counters {
            counter.schedule(self.delay);
        }
    }

    /// Schedules one increment on the selected counter.
    pub fn schedule_selected(&self) {
        self.counters[self.selected].schedule(self.delay);
    }

    /// Schedules `n` overlapping increments on every counter.
    pub fn burst_all(&self, n: usize) {
        tracing::info!(n, "scheduling burst");
        for counter in &self.counters {
            for _ in 0..n {
                counter.schedule(self.delay);
            }
        }
    }

    pub fn unmount_all(&self) {
        for counter in &self.counters {
            counter.unmount();
        }
    }

    /// Unmounts the current counters and mounts fresh ones. Updates pending
    /// on the old counters still fire and are rejected.
    pub fn remount(&mut self) {
        self.unmount_all();
        let fresh = Self::mount_counters(&self.activity, self.delay);
        let old = std::mem::replace(&mut self.counters, fresh);

        self.retired.retain(|c| c.scheduler().pending() > 0);
        self.retired
            .extend(old.into_iter().filter(|c| c.scheduler().pending() > 0));
        self.generation += 1;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.counters.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.counters.len() - 1) % self.counters.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::task::LocalSet;

    const DELAY: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn burst_exposes_the_stale_counter() {
        LocalSet::new()
            .run_until(async {
                let board = BoardState::mount(DELAY);
                tokio::time::sleep(DELAY * 2).await;

                board.burst_all(3);
                tokio::time::sleep(DELAY * 2).await;

                let counts: Vec<_> = board.snapshots().iter().map(|s| s.count).collect();
                assert_eq!(counts, vec![2, 4, 4]);
                assert_eq!(board.pending_total(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn remount_rejects_old_updates() {
        LocalSet::new()
            .run_until(async {
                let mut board = BoardState::mount(DELAY);
                board.remount();
                tokio::time::sleep(DELAY * 2).await;

                assert_eq!(board.generation(), 2);
                for snapshot in board.snapshots() {
                    assert_eq!(snapshot.count, 1);
                    assert!(snapshot.mounted);
                }
                for variant in Variant::ALL {
                    let rejected = board
                        .activity()
                        .count(variant, |k| *k == ActivityKind::Rejected);
                    assert_eq!(rejected, 1);
                }
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn remount_during_burst_keeps_old_updates_in_flight() {
        LocalSet::new()
            .run_until(async {
                let mut board = BoardState::mount(Duration::from_millis(1000));
                board.burst_all(3);
                board.remount();

                // Three counters with four updates each, plus three fresh mount updates.
                assert_eq!(board.pending_total(), 15);

                tokio::time::sleep(Duration::from_millis(1001)).await;
                assert_eq!(board.pending_total(), 0);

                board.remount();
                assert_eq!(board.pending_total(), 3);
                assert!(board.retired.is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn selection_wraps() {
        LocalSet::new()
            .run_until(async {
                let mut board = BoardState::mount(DELAY);
                board.select_prev();
                assert_eq!(board.selected_variant(), Variant::External);
                board.select_next();
                assert_eq!(board.selected_variant(), Variant::Stale);
            })
            .await;
    }
}
