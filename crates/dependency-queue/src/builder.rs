//! A non-thread-safe fluent accumulator over [`crate::Queue::enqueue`].

use std::sync::Arc;

use crate::error::{QueueError, Result};
use crate::item::Item;
use crate::queue::Queue;

/// Accumulates an item's `name`, `value`, `provides`, and `requires`
/// before forwarding them to [`Queue::enqueue`].
///
/// Holds no validation logic beyond what `Item` and `enqueue` already
/// enforce; it exists purely to make call sites read as a pipeline.
/// Not `Send`/`Sync` — intended for one producer, one call site at a time.
/// Multiple builders over the same queue never contend except at the
/// final `enqueue` call, which is thread-safe on its own.
pub struct Builder<'q, V> {
    queue: &'q Queue<V>,
    name: Option<String>,
    value: Option<V>,
    provides: Vec<String>,
    requires: Vec<String>,
}

impl<'q, V> Builder<'q, V> {
    pub(crate) fn new(queue: &'q Queue<V>) -> Self {
        Self {
            queue,
            name: None,
            value: None,
            provides: Vec::new(),
            requires: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    pub fn provides<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(names.into_iter().map(Into::into));
        self
    }

    /// Forwards the accumulated fields to [`Queue::enqueue`]. Fails with
    /// `QueueError::InvalidState` if no name was ever set.
    pub fn build(self) -> Result<Arc<Item<V>>> {
        let name = self
            .name
            .ok_or_else(|| QueueError::InvalidState("builder has no current entry".into()))?;
        self.queue.enqueue(name, self.value, self.provides, self.requires)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueueConfig;

    #[test]
    fn build_without_name_fails() {
        let queue: Queue<i32> = Queue::new(QueueConfig::default());
        let result = queue.create_builder().value(1).build();
        assert!(matches!(result, Err(QueueError::InvalidState(_))));
    }

    #[test]
    fn build_forwards_fields_to_enqueue() {
        let queue: Queue<i32> = Queue::new(QueueConfig::default());
        let item = queue
            .create_builder()
            .name("a")
            .value(7)
            .provides(["x"])
            .requires(Vec::<String>::new())
            .build()
            .unwrap();
        assert_eq!(item.name(), "a");
        assert_eq!(item.value(), Some(&7));
        assert!(item.provides().contains(&"x".to_string()));
    }
}
