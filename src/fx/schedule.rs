/// Holds at most one pending scheduled unit (timer, frame request, one-shot
/// listener). Scheduling a new unit drops, and thereby cancels, the previous one.
#[derive(Debug)]
pub struct Slot<T> {
    pending: Option<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, unit: T) {
        // Drop the old unit before the new one takes its place.
        self.pending.take();
        self.pending = Some(unit);
    }

    /// Like `replace`, but an unschedulable unit still cancels the pending one.
    pub fn replace_with(&mut self, unit: Option<T>) {
        self.pending.take();
        self.pending = unit;
    }

    pub fn cancel(&mut self) {
        self.pending.take();
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Unit {
        id: u32,
        cancelled: Rc<RefCell<Vec<u32>>>,
    }

    impl Drop for Unit {
        fn drop(&mut self) {
            self.cancelled.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn replacing_cancels_previous_unit() {
        let cancelled = Rc::new(RefCell::new(Vec::new()));
        let mut slot = Slot::new();

        for id in 0..3 {
            slot.replace(Unit { id, cancelled: cancelled.clone() });
        }

        assert_eq!(*cancelled.borrow(), vec![0, 1]);
        assert!(slot.is_pending());

        slot.cancel();
        assert_eq!(*cancelled.borrow(), vec![0, 1, 2]);
        assert!(!slot.is_pending());
    }

    #[test]
    fn replace_with_none_still_cancels() {
        let cancelled = Rc::new(RefCell::new(Vec::new()));
        let mut slot = Slot::new();
        slot.replace(Unit { id: 7, cancelled: cancelled.clone() });

        slot.replace_with(None);

        assert_eq!(*cancelled.borrow(), vec![7]);
        assert!(!slot.is_pending());
    }

    #[test]
    fn dropping_slot_cancels_pending_unit() {
        let cancelled = Rc::new(RefCell::new(Vec::new()));
        {
            let mut slot = Slot::new();
            slot.replace(Unit { id: 1, cancelled: cancelled.clone() });
        }
        assert_eq!(*cancelled.borrow(), vec![1]);
    }
}
