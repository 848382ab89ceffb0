//! The read-only, lock-scoped inspector view returned by `Queue::inspect`.

use std::sync::Arc;

use crate::error::{QueueError, Result};
use crate::item::Item;
use crate::monitor::MonitorGuard;
use crate::queue::QueueState;

/// A read-only snapshot of one topic, borrowed from a live [`View`].
pub struct TopicSnapshot<'a> {
    pub name: &'a str,
    pub provided_by: Vec<&'a str>,
    pub required_by: Vec<&'a str>,
}

/// A scoped, lock-holding read projection over a queue's internal
/// collections — the only safe way to traverse them from outside.
///
/// Dropping the view releases the monitor. An explicit [`View::release`]
/// is also provided for callers that want to end the borrow early without
/// waiting on scope exit; every accessor fails with
/// [`QueueError::LockReleased`] once released.
pub struct View<'q, V> {
    guard: Option<MonitorGuard<'q, QueueState<V>>>,
}

impl<'q, V> View<'q, V> {
    pub(crate) fn new(guard: MonitorGuard<'q, QueueState<V>>) -> Self {
        Self { guard: Some(guard) }
    }

    fn guard(&self) -> Result<&MonitorGuard<'q, QueueState<V>>> {
        self.guard.as_ref().ok_or(QueueError::LockReleased)
    }

    /// Topics in insertion order.
    pub fn topics(&self) -> Result<impl Iterator<Item = TopicSnapshot<'_>>> {
        let guard = self.guard()?;
        Ok(guard.topics.iter().map(|(name, topic)| TopicSnapshot {
            name,
            provided_by: topic.provided_by().iter().map(|i| i.name()).collect(),
            required_by: topic.required_by().iter().map(|i| i.name()).collect(),
        }))
    }

    /// The live ready queue, FIFO order.
    pub fn ready(&self) -> Result<impl Iterator<Item = &Arc<Item<V>>>> {
        Ok(self.guard()?.ready.iter())
    }

    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.guard()?.valid)
    }

    pub fn is_ending(&self) -> Result<bool> {
        Ok(self.guard()?.ending)
    }

    /// Releases the monitor early, without waiting for `Drop`.
    pub fn release(&mut self) {
        self.guard = None;
    }
}
