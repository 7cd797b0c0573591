//! Counter whose deferred update writes a value captured at scheduling time.

use std::time::Duration;

use tokio::task::JoinHandle;

use super::{Applied, Counter, Scheduler, Variant, INITIAL_COUNT};
use crate::state::{ActivityLog, StateCell};

/// Loses increments when more than one update is in flight.
///
/// Each update copies the count into its task when it is scheduled. Updates
/// scheduled before any of them lands all copy the same value and all write
/// `copy + 1`.
pub struct StaleCounter {
    count: StateCell<i64>,
    scheduler: Scheduler,
}

impl StaleCounter {
    pub fn new(log: ActivityLog) -> Self {
        Self {
            count: StateCell::new(INITIAL_COUNT),
            scheduler: Scheduler::new(Variant::Stale, log),
        }
    }
}

impl Counter for StaleCounter {
    fn variant(&self) -> Variant {
        Variant::Stale
    }

    fn state(&self) -> &StateCell<i64> {
        &self.count
    }

    fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn schedule(&self, delay: Duration) -> JoinHandle<()> {
        let captured = self.count.get();
        let count = self.count.clone();

        self.scheduler.defer(delay, move || {
            let wrote = captured + 1;
            count.set(wrote)?;
            Ok(Applied {
                read: captured,
                wrote,
            })
        })
    }
}
