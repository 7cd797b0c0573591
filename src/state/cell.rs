//! Render-owned counter state.
//!
//! A `StateCell` is the state a counter widget displays. It lives as long as
//! the widget is mounted; once unmounted it refuses further writes.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Errors raised by state writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// A deferred update tried to write after the widget was torn down.
    #[error("state update on an unmounted counter was ignored")]
    Unmounted,
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    mounted: bool,
    version: u64,
}

/// Shared handle to a piece of widget state.
///
/// Clones point at the same slot, so a deferred task can hold one while the
/// widget renders from another.
#[derive(Debug)]
pub struct StateCell<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: Clone> StateCell<T> {
    /// Creates mounted state holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value: initial,
                mounted: true,
                version: 0,
            })),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    /// Replaces the value with one computed by the caller.
    pub fn set(&self, value: T) -> Result<(), StateError> {
        let mut slot = self.slot.borrow_mut();
        if !slot.mounted {
            return Err(StateError::Unmounted);
        }
        slot.value = value;
        slot.version += 1;
        Ok(())
    }

    /// Applies `transition` to the value as it is right now and stores the
    /// result, which is also returned.
    pub fn update(&self, transition: impl FnOnce(&T) -> T) -> Result<T, StateError> {
        let mut slot = self.slot.borrow_mut();
        if !slot.mounted {
            return Err(StateError::Unmounted);
        }
        let next = transition(&slot.value);
        slot.value = next.clone();
        slot.version += 1;
        Ok(next)
    }
}

impl<T> StateCell<T> {
    /// Number of accepted writes since creation.
    pub fn version(&self) -> u64 {
        self.slot.borrow().version
    }

    pub fn is_mounted(&self) -> bool {
        self.slot.borrow().mounted
    }

    /// Marks the state as torn down. Pending writers are not cancelled.
    pub fn unmount(&self) {
        self.slot.borrow_mut().mounted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clones_share_the_slot() {
        let count = StateCell::new(0i64);
        let handle = count.clone();

        handle.set(5).unwrap();

        assert_eq!(count.get(), 5);
        assert_eq!(count.version(), 1);
    }

    #[test]
    fn update_reads_the_value_at_apply_time() {
        let count = StateCell::new(0i64);
        count.set(10).unwrap();

        let next = count.update(|c| c + 1).unwrap();

        assert_eq!(next, 11);
        assert_eq!(count.get(), 11);
    }

    #[test]
    fn writes_after_unmount_are_rejected() {
        let count = StateCell::new(3i64);
        count.unmount();

        assert_eq!(count.set(4), Err(StateError::Unmounted));
        assert_eq!(count.update(|c| c + 1), Err(StateError::Unmounted));
        assert_eq!(count.get(), 3);
        assert_eq!(count.version(), 0);
        assert!(!count.is_mounted());
    }
}
