//! Deferred, cancellable one-shot tasks.

use crate::event::{Event, EventQueue};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

pub trait Scheduler {
    /// Arrange for `Event::TimerFired` to be delivered after `delay`.
    fn schedule(&mut self, delay: Duration) -> TaskId;
    /// Returns `false` if the task already fired or was never scheduled.
    fn cancel(&mut self, task: TaskId) -> bool;
}

#[derive(Debug)]
struct Timer {
    id: TaskId,
    due: Instant,
}

/// Timers kept in memory and turned into events by `fire_due`.
#[derive(Debug)]
pub struct TimerQueue {
    events: EventQueue,
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new(events: EventQueue) -> Self {
        Self {
            events,
            timers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Push a `TimerFired` for every timer due at `now`, earliest first.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let (mut due, rest): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = rest;
        due.sort_by_key(|t| (t.due, t.id));

        for t in &due {
            tracing::trace!(task = t.id.0, "timer fired");
            self.events.push(Event::TimerFired(t.id));
        }
        due.len()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: Instant::now() + delay,
        });
        id
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != task);
        before != self.timers.len()
    }
}

/// Lets the host keep polling a queue the controller schedules into.
impl<S: Scheduler> Scheduler for Rc<RefCell<S>> {
    fn schedule(&mut self, delay: Duration) -> TaskId {
        self.borrow_mut().schedule(delay)
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        self.borrow_mut().cancel(task)
    }
}
