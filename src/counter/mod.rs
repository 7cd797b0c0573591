//! Counter widgets and the deferred updates that drive them.
//!
//! Each widget starts at [`INITIAL_COUNT`] and, when mounted, schedules one
//! update that fires after a delay and adds one to the count. The three
//! implementations differ only in how that update computes the new value:
//!
//! - [`StaleCounter`] copies the count when the update is scheduled and
//!   writes `copy + 1` when it fires
//! - [`FunctionalCounter`] hands the state a transition evaluated when the
//!   update fires
//! - [`ExternalCounter`] keeps the running total in an [`Accumulator`] and
//!   mirrors it into the displayed state
//!
//! Deferred updates are `spawn_local` tasks, so everything here must run
//! inside a [`tokio::task::LocalSet`].
//!
//! [`Accumulator`]: crate::state::Accumulator

mod external;
mod functional;
mod stale;

pub use external::ExternalCounter;
pub use functional::FunctionalCounter;
pub use stale::StaleCounter;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::state::{ActivityKind, ActivityLog, StateCell, StateError};

/// Value every counter starts from.
pub const INITIAL_COUNT: i64 = 0;

/// Delay of the update scheduled at mount.
pub const MOUNT_DELAY: Duration = Duration::from_millis(1000);

/// Which update strategy a counter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Writes a value captured at scheduling time.
    Stale,
    /// Writes a transition of the current value.
    Functional,
    /// Writes through an external accumulator.
    External,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Stale, Variant::Functional, Variant::External];

    pub fn label(&self) -> &'static str {
        match self {
            Variant::Stale => "Stale capture",
            Variant::Functional => "Functional update",
            Variant::External => "External accumulator",
        }
    }

    /// One-line description of what the deferred update writes.
    pub fn strategy(&self) -> &'static str {
        match self {
            Variant::Stale => "set(captured + 1)",
            Variant::Functional => "update(|c| c + 1)",
            Variant::External => "acc += 1; set(acc)",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Stale => "stale",
            Variant::Functional => "functional",
            Variant::External => "external",
        };
        f.write_str(name)
    }
}

/// Values a deferred update read and wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub read: i64,
    pub wrote: i64,
}

/// Spawns deferred updates for one counter and keeps count of them.
#[derive(Debug)]
pub struct Scheduler {
    variant: Variant,
    log: ActivityLog,
    scheduled: Cell<usize>,
    pending: Rc<Cell<usize>>,
}

impl Scheduler {
    pub fn new(variant: Variant, log: ActivityLog) -> Self {
        Self {
            variant,
            log,
            scheduled: Cell::new(0),
            pending: Rc::new(Cell::new(0)),
        }
    }

    /// Updates scheduled since mount.
    pub fn scheduled(&self) -> usize {
        self.scheduled.get()
    }

    /// Updates scheduled but not yet fired.
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Runs `apply` once, after `delay`, on the current `LocalSet`.
    ///
    /// Rejected writes are logged, not returned: nothing awaits the outcome
    /// of a deferred update except tests.
    pub fn defer<F>(&self, delay: Duration, apply: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Result<Applied, StateError> + 'static,
    {
        self.scheduled.set(self.scheduled.get() + 1);
        self.pending.set(self.pending.get() + 1);
        self.log.record(self.variant, ActivityKind::Scheduled);
        tracing::debug!(variant = %self.variant, ?delay, "update scheduled");

        let variant = self.variant;
        let pending = Rc::clone(&self.pending);
        let log = self.log.clone();

        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            pending.set(pending.get().saturating_sub(1));

            match apply() {
                Ok(Applied { read, wrote }) => {
                    tracing::debug!(%variant, read, wrote, "update applied");
                    log.record(variant, ActivityKind::Applied { read, wrote });
                }
                Err(err) => {
                    tracing::warn!(%variant, %err, "deferred update outlived its counter");
                    log.record(variant, ActivityKind::Rejected);
                }
            }
        })
    }
}

/// Point-in-time view of a counter, used for rendering and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub variant: Variant,
    pub count: i64,
    /// What the count would be if no increment had been lost.
    pub expected: i64,
    pub pending: usize,
    pub accumulator: Option<i64>,
    pub mounted: bool,
    /// Writes the displayed state has accepted.
    pub writes: u64,
}

impl CounterSnapshot {
    /// Increments lost so far. Only meaningful once nothing is pending.
    pub fn dropped(&self) -> i64 {
        if self.pending > 0 {
            return 0;
        }
        self.expected - self.count
    }
}

/// A counter widget.
pub trait Counter {
    fn variant(&self) -> Variant;

    /// The displayed state.
    fn state(&self) -> &StateCell<i64>;

    fn scheduler(&self) -> &Scheduler;

    /// Schedules one increment to fire after `delay`.
    fn schedule(&self, delay: Duration) -> JoinHandle<()>;

    /// Authoritative running total, for counters that keep one.
    fn accumulator(&self) -> Option<i64> {
        None
    }

    fn count(&self) -> i64 {
        self.state().get()
    }

    /// Tears the widget down. Pending updates keep running and are rejected
    /// when they try to write.
    fn unmount(&self) {
        if !self.state().is_mounted() {
            return;
        }
        self.state().unmount();
        self.scheduler()
            .log()
            .record(self.variant(), ActivityKind::Unmounted);
        tracing::info!(
            variant = %self.variant(),
            pending = self.scheduler().pending(),
            "counter unmounted"
        );
    }

    fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            variant: self.variant(),
            count: self.count(),
            expected: INITIAL_COUNT + self.scheduler().scheduled() as i64,
            pending: self.scheduler().pending(),
            accumulator: self.accumulator(),
            mounted: self.state().is_mounted(),
            writes: self.state().version(),
        }
    }
}

/// Builds a counter without running its mount effect.
pub fn create(variant: Variant, log: ActivityLog) -> Box<dyn Counter> {
    match variant {
        Variant::Stale => Box::new(StaleCounter::new(log)),
        Variant::Functional => Box::new(FunctionalCounter::new(log)),
        Variant::External => Box::new(ExternalCounter::new(log)),
    }
}

/// A freshly mounted counter and the update its mount effect scheduled.
pub struct Mounted {
    pub counter: Box<dyn Counter>,
    pub effect: JoinHandle<()>,
}

/// Creates a counter and runs its mount effect: one increment after `delay`.
pub fn mount(variant: Variant, log: ActivityLog, delay: Duration) -> Mounted {
    let counter = create(variant, log);
    counter
        .scheduler()
        .log()
        .record(variant, ActivityKind::Mounted);
    tracing::info!(%variant, "counter mounted");

    let effect = counter.schedule(delay);
    Mounted { counter, effect }
}
