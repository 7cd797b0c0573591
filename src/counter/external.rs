//! Counter that keeps its running total in an external accumulator.

use std::time::Duration;

use tokio::task::JoinHandle;

use super::{Applied, Counter, Scheduler, Variant, INITIAL_COUNT};
use crate::state::{Accumulator, ActivityLog, StateCell};

/// Mirrors an [`Accumulator`] into the displayed state.
///
/// The accumulator is the source of truth. It is read and advanced when the
/// update fires, then copied into the display. The two agree after every
/// update as long as the counter is mounted; after unmount the accumulator
/// keeps advancing while the display is frozen.
pub struct ExternalCounter {
    count: StateCell<i64>,
    total: Accumulator,
    scheduler: Scheduler,
}

impl ExternalCounter {
    pub fn new(log: ActivityLog) -> Self {
        Self {
            count: StateCell::new(INITIAL_COUNT),
            total: Accumulator::new(INITIAL_COUNT),
            scheduler: Scheduler::new(Variant::External, log),
        }
    }
}

impl Counter for ExternalCounter {
    fn variant(&self) -> Variant {
        Variant::External
    }

    fn state(&self) -> &StateCell<i64> {
        &self.count
    }

    fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn accumulator(&self) -> Option<i64> {
        Some(self.total.get())
    }

    fn schedule(&self, delay: Duration) -> JoinHandle<()> {
        let count = self.count.clone();
        let total = self.total.clone();

        self.scheduler.defer(delay, move || {
            let read = total.get();
            let wrote = total.advance(1);
            count.set(wrote)?;
            Ok(Applied { read, wrote })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::task::LocalSet;

    #[tokio::test(start_paused = true)]
    async fn accumulator_matches_display_after_each_update() {
        LocalSet::new()
            .run_until(async {
                let counter = ExternalCounter::new(ActivityLog::new());

                for expected in 1..=5 {
                    counter.schedule(Duration::from_millis(50)).await.unwrap();
                    assert_eq!(counter.count(), expected);
                    assert_eq!(counter.accumulator(), Some(expected));
                }
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn accumulator_diverges_after_unmount() {
        LocalSet::new()
            .run_until(async {
                let counter = ExternalCounter::new(ActivityLog::new());
                counter.schedule(Duration::from_millis(50)).await.unwrap();

                let pending = counter.schedule(Duration::from_millis(50));
                counter.unmount();
                pending.await.unwrap();

                assert_eq!(counter.count(), 1);
                assert_eq!(counter.accumulator(), Some(2));
            })
            .await;
    }
}
