//! An insertion-ordered name → [`Topic`] map.
//!
//! Cycle detection's reported edge depends on map enumeration order (see
//! `validation.rs`), so a plain `HashMap` won't do — its iteration order is
//! unspecified and would make the cycle report a flaky implementation
//! detail instead of the stable, observable property the spec calls for.
//! This is a small hand-rolled structure in the same spirit as
//! `PredicateQueue`: a `Vec` for order plus a `HashMap` index for O(1)
//! lookup, with O(n) removal to keep the remaining entries in order.

use std::collections::HashMap;

use crate::config::NameComparer;
use crate::topic::Topic;

pub struct TopicMap<V> {
    comparer: NameComparer,
    order: Vec<(String, Topic<V>)>,
    index: HashMap<String, usize>,
}

impl<V> TopicMap<V> {
    pub fn new(comparer: NameComparer) -> Self {
        Self {
            comparer,
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn key(&self, name: &str) -> String {
        self.comparer.normalize(name)
    }

    pub fn get(&self, name: &str) -> Option<&Topic<V>> {
        self.index.get(&self.key(name)).map(|&i| &self.order[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Topic<V>> {
        let key = self.key(name);
        self.index.get(&key).map(|&i| &mut self.order[i].1)
    }

    /// Returns the existing topic for `name`, creating and appending an
    /// empty one (at the end of insertion order) if absent.
    pub fn get_or_create(&mut self, name: &str) -> &mut Topic<V> {
        let key = self.key(name);
        if let Some(&i) = self.index.get(&key) {
            return &mut self.order[i].1;
        }
        let i = self.order.len();
        self.order.push((key.clone(), Topic::new(name.to_string())));
        self.index.insert(key, i);
        &mut self.order[i].1
    }

    /// Removes a topic entirely, returning it. Reindexes subsequent
    /// entries to keep lookups correct; preserves relative order of the
    /// remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<Topic<V>> {
        let key = self.key(name);
        let i = self.index.remove(&key)?;
        let (_, topic) = self.order.remove(i);
        for (k, _) in self.order.iter().skip(i) {
            if let Some(slot) = self.index.get_mut(k) {
                *slot -= 1;
            }
        }
        Some(topic)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    /// Iterates topics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Topic<V>)> {
        self.order.iter().map(|(k, t)| (k.as_str(), t))
    }
}
