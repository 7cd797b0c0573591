//! Bounded log of what deferred updates did.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{DateTime, Local};

use crate::counter::Variant;

/// Maximum number of entries kept.
pub const ACTIVITY_CAPACITY: usize = 64;

/// What happened when a deferred update ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// The update was scheduled.
    Scheduled,
    /// The update read `read` and wrote `wrote`.
    Applied { read: i64, wrote: i64 },
    /// The update fired after unmount and was dropped.
    Rejected,
    Mounted,
    Unmounted,
}

/// A single log entry.
#[derive(Debug, Clone)]
pub struct Activity {
    pub at: DateTime<Local>,
    pub variant: Variant,
    pub kind: ActivityKind,
}

impl Activity {
    pub fn describe(&self) -> String {
        match self.kind {
            ActivityKind::Scheduled => "update scheduled".to_string(),
            ActivityKind::Applied { read, wrote } => format!("read {read}, wrote {wrote}"),
            ActivityKind::Rejected => "update fired after unmount, ignored".to_string(),
            ActivityKind::Mounted => "mounted".to_string(),
            ActivityKind::Unmounted => "unmounted".to_string(),
        }
    }
}

/// Shared ring buffer of [`Activity`] entries, newest last.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Rc<RefCell<VecDeque<Activity>>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, variant: Variant, kind: ActivityKind) {
        let mut entries = self.entries.borrow_mut();
        if entries.len() == ACTIVITY_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(Activity {
            at: Local::now(),
            variant,
            kind,
        });
    }

    /// Copies out the newest `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<Activity> {
        let entries = self.entries.borrow();
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Counts entries of one variant matching `pred`.
    pub fn count(&self, variant: Variant, pred: impl Fn(&ActivityKind) -> bool) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|a| a.variant == variant && pred(&a.kind))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_entries_are_evicted() {
        let log = ActivityLog::new();
        for i in 0..(ACTIVITY_CAPACITY as i64 + 5) {
            log.record(
                Variant::Functional,
                ActivityKind::Applied {
                    read: i,
                    wrote: i + 1,
                },
            );
        }

        assert_eq!(log.len(), ACTIVITY_CAPACITY);
        let recent = log.recent(1);
        assert_eq!(
            recent[0].kind,
            ActivityKind::Applied {
                read: ACTIVITY_CAPACITY as i64 + 4,
                wrote: ACTIVITY_CAPACITY as i64 + 5,
            }
        );
    }

    #[test]
    fn count_filters_by_variant() {
        let log = ActivityLog::new();
        log.record(Variant::Stale, ActivityKind::Rejected);
        log.record(Variant::External, ActivityKind::Rejected);
        log.record(Variant::Stale, ActivityKind::Scheduled);

        assert_eq!(log.count(Variant::Stale, |k| *k == ActivityKind::Rejected), 1);
    }
}
