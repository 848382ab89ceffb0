//! Named work records with mutable provides/requires topic sets.

use std::fmt;
use std::sync::Mutex;

use crate::error::{QueueError, Result};

/// A single unit of work tracked by a [`crate::Queue`].
///
/// An item always provides its own name, never requires its own name, and
/// keeps its provides/requires sets disjoint: adding a topic to one side
/// removes it from the other.
pub struct Item<V> {
    name: String,
    value: Option<V>,
    topics: Mutex<TopicSets>,
}

/// The mutable provides/requires sets, insertion-ordered.
///
/// Kept small and separate from `Item` so the invariant-enforcing mutators
/// in `impl Item` have a single place to lock.
#[derive(Default)]
struct TopicSets {
    provides: Vec<String>,
    requires: Vec<String>,
}

impl TopicSets {
    fn contains_provides(&self, name: &str) -> bool {
        self.provides.iter().any(|n| n == name)
    }

    fn contains_requires(&self, name: &str) -> bool {
        self.requires.iter().any(|n| n == name)
    }
}

impl<V> Item<V> {
    /// Builds a new item. `provides` always gains `name` even if the
    /// caller didn't list it explicitly; `requires` silently drops `name`
    /// if present (an item never requires itself).
    pub(crate) fn new(
        name: String,
        value: Option<V>,
        provides: Vec<String>,
        requires: Vec<String>,
    ) -> Self {
        let mut sets = TopicSets::default();
        sets.provides.push(name.clone());
        for p in provides {
            if !sets.contains_provides(&p) {
                sets.provides.push(p);
            }
        }
        for r in requires {
            if r == name {
                continue;
            }
            sets.provides.retain(|n| n != &r);
            if !sets.contains_requires(&r) {
                sets.requires.push(r);
            }
        }
        Self {
            name,
            value,
            topics: Mutex::new(sets),
        }
    }

    /// The item's name. Always present in `provides()`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrows the item's payload, if any.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// A snapshot of the current provides set, in insertion order.
    pub fn provides(&self) -> Vec<String> {
        self.topics.lock().expect("item lock poisoned").provides.clone()
    }

    /// A snapshot of the current requires set, in insertion order.
    pub fn requires(&self) -> Vec<String> {
        self.topics.lock().expect("item lock poisoned").requires.clone()
    }

    /// True once every prerequisite has been worked off this item's
    /// requires set; items in this state belong in the ready queue.
    pub fn is_ready(&self) -> bool {
        self.topics.lock().expect("item lock poisoned").requires.is_empty()
    }

    /// Adds topic names to `provides`, removing each from `requires` first.
    pub fn add_provides<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sets = self.topics.lock().expect("item lock poisoned");
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(QueueError::InvalidArgument(
                    "topic name must not be empty".into(),
                ));
            }
            sets.requires.retain(|n| n != &name);
            if !sets.contains_provides(&name) {
                sets.provides.push(name);
            }
        }
        Ok(())
    }

    /// Adds topic names to `requires`, removing each from `provides` first.
    /// Adding the item's own name is silently discarded.
    pub fn add_requires<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sets = self.topics.lock().expect("item lock poisoned");
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(QueueError::InvalidArgument(
                    "topic name must not be empty".into(),
                ));
            }
            if name == self.name {
                continue;
            }
            sets.provides.retain(|n| n != &name);
            if !sets.contains_requires(&name) {
                sets.requires.push(name);
            }
        }
        Ok(())
    }

    /// Removes a topic name from `requires`. A no-op if absent.
    pub fn remove_requires(&self, name: &str) {
        let mut sets = self.topics.lock().expect("item lock poisoned");
        sets.requires.retain(|n| n != name);
    }
}

impl<V: fmt::Debug> fmt::Display for Item<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{} {{ {v:?} }}", self.name),
            None => write!(f, "{} {{ null }}", self.name),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Item<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("provides", &self.provides())
            .field("requires", &self.requires())
            .finish()
    }
}
