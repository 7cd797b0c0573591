//! Counter whose deferred update is a transition of the current value.

use std::time::Duration;

use tokio::task::JoinHandle;

use super::{Applied, Counter, Scheduler, Variant, INITIAL_COUNT};
use crate::state::{ActivityLog, StateCell};

pub struct FunctionalCounter {
    count: StateCell<i64>,
    scheduler: Scheduler,
}

impl FunctionalCounter {
    pub fn new(log: ActivityLog) -> Self {
        Self {
            count: StateCell::new(INITIAL_COUNT),
            scheduler: Scheduler::new(Variant::Functional, log),
        }
    }
}

impl Counter for FunctionalCounter {
    fn variant(&self) -> Variant {
        Variant::Functional
    }

    fn state(&self) -> &StateCell<i64> {
        &self.count
    }

    fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn schedule(&self, delay: Duration) -> JoinHandle<()> {
        let count = self.count.clone();

        self.scheduler.defer(delay, move || {
            let mut read = 0;
            let wrote = count.update(|current| {
                read = *current;
                current + 1
            })?;
            Ok(Applied { read, wrote })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use pretty_assertions::assert_eq;
    use tokio::task::LocalSet;

    #[tokio::test(start_paused = true)]
    async fn overlapping_updates_all_count() {
        LocalSet::new()
            .run_until(async {
                let counter = FunctionalCounter::new(ActivityLog::new());

                let handles: Vec<_> = (0..4)
                    .map(|_| counter.schedule(Duration::from_millis(100)))
                    .collect();
                join_all(handles).await;

                assert_eq!(counter.count(), 4);
                assert_eq!(counter.snapshot().dropped(), 0);
            })
            .await;
    }
}
