//! Mutable cell that lives outside the render lifecycle.

use std::cell::Cell;
use std::rc::Rc;

/// Running total shared between a widget and its deferred updates.
///
/// Unlike [`StateCell`](super::StateCell) it has no notion of mounting and
/// accepts writes for as long as any handle exists.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    current: Rc<Cell<i64>>,
}

impl Accumulator {
    pub fn new(initial: i64) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
        }
    }

    pub fn get(&self) -> i64 {
        self.current.get()
    }

    /// Reads the current total, adds `delta`, stores and returns the result.
    pub fn advance(&self, delta: i64) -> i64 {
        let next = self.current.get() + delta;
        self.current.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_read_before_write() {
        let acc = Accumulator::new(0);
        let other = acc.clone();

        assert_eq!(acc.advance(1), 1);
        assert_eq!(other.advance(1), 2);
        assert_eq!(acc.get(), 2);
    }
}
