//! Callback table shared between thread mode and the interrupt vectors

use core::cell::Cell;

use critical_section::Mutex;

use super::Line;

/// Procedure run from the interrupt vector of a line
///
/// It executes in interrupt context and should return promptly.
pub type Callback = fn();

type Slot = Mutex<Cell<Option<Callback>>>;

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY: Slot = Mutex::new(Cell::new(None));

pub(super) struct Callbacks {
    slots: [Slot; Line::COUNT],
}

impl Callbacks {
    pub(super) const fn new() -> Self {
        Callbacks {
            slots: [EMPTY; Line::COUNT],
        }
    }

    pub(super) fn replace(&self, line: Line, callback: Option<Callback>) -> Option<Callback> {
        critical_section::with(|cs| self.slots[line.index()].borrow(cs).replace(callback))
    }

    pub(super) fn get(&self, line: Line) -> Option<Callback> {
        critical_section::with(|cs| self.slots[line.index()].borrow(cs).get())
    }

    /// Runs outside of the critical section, so the callback itself may
    /// register callbacks.
    pub(super) fn dispatch(&self, line: Line) {
        if let Some(callback) = self.get(line) {
            callback();
        }
    }
}
