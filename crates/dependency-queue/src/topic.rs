//! Named vertices in the dependency graph.

use std::sync::Arc;

use crate::item::Item;

/// A named node in the queue's dependency graph.
///
/// A topic exists in [`crate::Queue`]'s topic map iff at least one item
/// currently provides or requires it. `Topic` itself is a passive record;
/// all mutation happens in `Queue` under the monitor lock.
pub struct Topic<V> {
    name: String,
    provided_by: Vec<Arc<Item<V>>>,
    required_by: Vec<Arc<Item<V>>>,
}

impl<V> Topic<V> {
    /// Creates an empty topic. `name` must be non-empty; enforced by the
    /// caller (`Queue`'s get-or-create path), not re-checked here.
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            provided_by: Vec::new(),
            required_by: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provided_by(&self) -> &[Arc<Item<V>>] {
        &self.provided_by
    }

    pub fn required_by(&self) -> &[Arc<Item<V>>] {
        &self.required_by
    }

    pub(crate) fn push_provider(&mut self, item: Arc<Item<V>>) {
        self.provided_by.push(item);
    }

    pub(crate) fn push_requirer(&mut self, item: Arc<Item<V>>) {
        self.required_by.push(item);
    }

    /// Removes `item` (by identity) from `provided_by`. Returns true if it
    /// was present.
    pub(crate) fn remove_provider(&mut self, item: &Arc<Item<V>>) -> bool {
        let before = self.provided_by.len();
        self.provided_by.retain(|i| !Arc::ptr_eq(i, item));
        self.provided_by.len() != before
    }

    /// Removes `item` (by identity) from `required_by`. Returns true if it
    /// was present.
    pub(crate) fn remove_requirer(&mut self, item: &Arc<Item<V>>) -> bool {
        let before = self.required_by.len();
        self.required_by.retain(|i| !Arc::ptr_eq(i, item));
        self.required_by.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.provided_by.is_empty() && self.required_by.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_topic_is_empty() {
        let t = Topic::<()>::new("t".into());
        assert!(t.is_empty());
        assert!(t.provided_by().is_empty());
        assert!(t.required_by().is_empty());
    }

    #[test]
    fn remove_provider_by_identity() {
        let mut t = Topic::<()>::new("t".into());
        let a = Arc::new(Item::new("a".into(), None, vec![], vec![]));
        let b = Arc::new(Item::new("b".into(), None, vec![], vec![]));
        t.push_provider(a.clone());
        t.push_provider(b.clone());
        assert!(t.remove_provider(&a));
        assert_eq!(t.provided_by().len(), 1);
        assert!(!t.remove_provider(&a));
    }
}
