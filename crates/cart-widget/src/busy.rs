//! Per-control busy flags.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use cart_core::ControlId;

/// Controls with an operation in progress.
#[derive(Debug, Default, Clone)]
pub struct BusyControls {
    active: Rc<RefCell<HashSet<ControlId>>>,
}

impl BusyControls {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a control busy. Returns `None` if it already is.
    ///
    /// The flag clears when the returned guard drops.
    pub fn try_acquire(&self, control: &ControlId) -> Option<BusyGuard> {
        if !self.active.borrow_mut().insert(control.clone()) {
            return None;
        }
        Some(BusyGuard {
            active: Rc::clone(&self.active),
            control: control.clone(),
        })
    }

    /// Check whether a control is busy.
    pub fn is_busy(&self, control: &ControlId) -> bool {
        self.active.borrow().contains(control)
    }
}

/// Holds a control's busy flag.
#[derive(Debug)]
pub struct BusyGuard {
    active: Rc<RefCell<HashSet<ControlId>>>,
    control: ControlId,
}

impl BusyGuard {
    /// The control this guard holds.
    pub fn control(&self) -> &ControlId {
        &self.control
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.active.borrow_mut().remove(&self.control);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let busy = BusyControls::new();
        let control = ControlId::new("add-0");

        let guard = busy.try_acquire(&control).unwrap();
        assert!(busy.is_busy(&control));
        assert!(busy.try_acquire(&control).is_none());

        drop(guard);
        assert!(!busy.is_busy(&control));
        assert!(busy.try_acquire(&control).is_some());
    }

    #[test]
    fn test_controls_are_independent() {
        let busy = BusyControls::new();
        let _a = busy.try_acquire(&ControlId::new("add-0")).unwrap();
        assert!(busy.try_acquire(&ControlId::new("add-1")).is_some());
    }
}
