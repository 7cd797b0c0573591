//! Headless runs of the counter variants.
//!
//! Each scenario mounts a counter, waits for the mount update to land, then
//! schedules more updates either all at once or one after another. All
//! functions here must be awaited inside a `LocalSet`.

use std::fmt;
use std::time::Duration;

use futures::future::join_all;
use itertools::Itertools;
use serde::Serialize;

use crate::counter::{self, Counter, Mounted, Variant, INITIAL_COUNT};
use crate::state::ActivityLog;

/// How the extra updates were scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// All scheduled before any lands.
    Overlapping,
    /// Each scheduled after the previous one landed.
    Sequential,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Overlapping => f.write_str("overlapping"),
            Mode::Sequential => f.write_str("sequential"),
        }
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub variant: Variant,
    pub mode: Mode,
    /// Updates scheduled after the mount update.
    pub scheduled: usize,
    pub expected: i64,
    pub displayed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accumulator: Option<i64>,
}

impl Outcome {
    /// Increments the display lost.
    pub fn dropped(&self) -> i64 {
        self.expected - self.displayed
    }

    /// True when the display matches the expected value and, if there is an
    /// accumulator, the accumulator agrees with the display.
    pub fn is_consistent(&self) -> bool {
        self.dropped() == 0 && self.accumulator.map_or(true, |acc| acc == self.displayed)
    }
}

async fn mounted(variant: Variant, delay: Duration) -> Box<dyn Counter> {
    let Mounted { counter, effect } = counter::mount(variant, ActivityLog::new(), delay);
    if let Err(err) = effect.await {
        tracing::error!(%variant, %err, "mount update did not complete");
    }
    counter
}

fn outcome(counter: &dyn Counter, mode: Mode, scheduled: usize) -> Outcome {
    Outcome {
        variant: counter.variant(),
        mode,
        scheduled,
        expected: INITIAL_COUNT + 1 + scheduled as i64,
        displayed: counter.count(),
        accumulator: counter.accumulator(),
    }
}

/// Schedules `n` updates at once and waits for all of them.
pub async fn overlapping(variant: Variant, n: usize, delay: Duration) -> Outcome {
    let counter = mounted(variant, delay).await;

    let handles: Vec<_> = (0..n).map(|_| counter.schedule(delay)).collect();
    for joined in join_all(handles).await {
        if let Err(err) = joined {
            tracing::error!(%variant, %err, "deferred update did not complete");
        }
    }

    outcome(counter.as_ref(), Mode::Overlapping, n)
}

/// Schedules `n` updates, each after the previous one landed.
pub async fn sequential(variant: Variant, n: usize, delay: Duration) -> Outcome {
    let counter = mounted(variant, delay).await;

    for _ in 0..n {
        if let Err(err) = counter.schedule(delay).await {
            tracing::error!(%variant, %err, "deferred update did not complete");
        }
    }

    outcome(counter.as_ref(), Mode::Sequential, n)
}

/// Outcomes of both scenarios for every variant.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub updates: usize,
    pub delay_ms: u64,
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_consistent())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} extra updates per run, {} ms delay",
            self.updates, self.delay_ms
        )?;
        writeln!(
            f,
            "{:<12} {:<12} {:>8} {:>9} {:>11}  {}",
            "variant", "mode", "expected", "displayed", "accumulator", "result"
        )?;
        let mut rows = self.outcomes.iter().map(|o| {
            let acc = o
                .accumulator
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string());
            let result = if o.is_consistent() {
                "ok".to_string()
            } else {
                format!("lost {}", o.dropped())
            };
            format!(
                "{:<12} {:<12} {:>8} {:>9} {:>11}  {}",
                o.variant.to_string(),
                o.mode.to_string(),
                o.expected,
                o.displayed,
                acc,
                result
            )
        });
        write!(f, "{}", rows.join("\n"))
    }
}

/// Milliseconds in `delay`, saturating at `u64::MAX`.
fn whole_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Runs every variant in both modes. The runs are independent and proceed
/// concurrently on the local set.
pub async fn run_all(n: usize, delay: Duration) -> Report {
    let runs = Variant::ALL.iter().flat_map(|&variant| {
        [
            futures::future::Either::Left(overlapping(variant, n, delay)),
            futures::future::Either::Right(sequential(variant, n, delay)),
        ]
    });
    let outcomes = join_all(runs).await;

    Report {
        updates: n,
        delay_ms: whole_millis(delay),
        outcomes,
    }
}
