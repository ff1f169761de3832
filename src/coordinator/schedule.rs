//! Deferred commands.
//!
//! A navigation key that closes an editor is not replayed as a synthetic
//! key event. The coordinator finishes the close, then asks a
//! [`Scheduler`] to call it back with a [`TimerId`]; only the most recent
//! id is honoured.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::Delta;

pub type TimerId = u64;

/// Host timer facility.
pub trait Scheduler {
    /// Arrange for `Coordinator::run_deferred(id)` to be called after `delay_ms`.
    fn schedule(&mut self, id: TimerId, delay_ms: u32);

    /// Drop a previously scheduled callback. Unknown ids are ignored.
    fn cancel(&mut self, id: TimerId);

    /// The timer for `id` went off and is being handled.
    fn fired(&mut self, _id: TimerId) {}
}

/// Command replayed once the timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredCommand {
    MoveBy(Delta),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredMove {
    pub id: TimerId,
    pub command: DeferredCommand,
}

/// Scheduler whose timers fire only when the host drains them.
///
/// Clones share the same queue, so a test (or a native event loop) can
/// keep a handle while the coordinator owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Vec<(TimerId, u32)>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids currently waiting, oldest first.
    pub fn pending(&self) -> Vec<TimerId> {
        self.queue.borrow().iter().map(|&(id, _)| id).collect()
    }

    /// Remove and return every waiting id.
    pub fn take_due(&self) -> Vec<TimerId> {
        self.queue.borrow_mut().drain(..).map(|(id, _)| id).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, id: TimerId, delay_ms: u32) {
        self.queue.borrow_mut().push((id, delay_ms));
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.borrow_mut().retain(|&(queued, _)| queued != id);
    }
}
