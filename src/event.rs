use crate::scheduler::TaskId;
use crate::types::{Coords, WorkoutKind};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PositionAcquired(Coords),
    PositionFailed(String),
    MapClicked(Coords),
    TypeChanged(WorkoutKind),
    Submitted,
    /// Raw `data-id` of the clicked list entry, if the click landed on one.
    ListEntryClicked(Option<String>),
    TimerFired(TaskId),
}

/// FIFO of pending events shared between the controller and the surfaces
/// that feed it. Single-threaded: handles are cheap `Rc` clones.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Rc<RefCell<VecDeque<Event>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.inner.borrow_mut().push_back(event);
    }

    pub fn pop(&self) -> Option<Event> {
        self.inner.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_queue_in_fifo_order() {
        let q = EventQueue::new();
        let producer = q.clone();
        producer.push(Event::Submitted);
        producer.push(Event::TypeChanged(WorkoutKind::Cycling));

        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(Event::Submitted));
        assert_eq!(q.pop(), Some(Event::TypeChanged(WorkoutKind::Cycling)));
        assert!(producer.is_empty());
    }
}
