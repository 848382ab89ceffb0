//! The queue core: owns items, topics, the ready set, and lifecycle state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::builder::Builder;
use crate::config::QueueConfig;
use crate::error::{QueueError, Result, ValidationError};
use crate::item::Item;
use crate::monitor::Monitor;
use crate::predicate_queue::PredicateQueue;
use crate::topic_map::TopicMap;
use crate::validation;
use crate::view::View;

/// Internal, monitor-guarded state. Every field here is only ever touched
/// while holding `Queue::monitor`'s lock.
pub(crate) struct QueueState<V> {
    pub(crate) topics: TopicMap<V>,
    pub(crate) ready: PredicateQueue<Arc<Item<V>>>,
    pub(crate) valid: bool,
    pub(crate) ever_validated: bool,
    pub(crate) ending: bool,
}

/// A dependency-ordered work queue.
///
/// Producers call [`Queue::enqueue`] (or build through [`Queue::create_builder`])
/// in arbitrary order; consumers call [`Queue::dequeue`]/[`Queue::dequeue_async`]
/// repeatedly, each call blocking until an item whose prerequisites are
/// all [`Queue::complete`]d becomes available. See the crate docs for the
/// full lifecycle.
pub struct Queue<V> {
    config: QueueConfig,
    monitor: Monitor<QueueState<V>>,
    disposed: AtomicBool,
}

impl<V> Queue<V> {
    /// Creates a queue with the given configuration.
    pub fn new(config: QueueConfig) -> Self {
        let comparer = config.comparer;
        Self {
            config,
            monitor: Monitor::new(QueueState {
                topics: TopicMap::new(comparer),
                ready: PredicateQueue::new(),
                valid: false,
                ever_validated: false,
                ending: false,
            }),
            disposed: AtomicBool::new(false),
        }
    }

    fn check_disposed(&self) -> Result<()> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(QueueError::Disposed);
        }
        Ok(())
    }

    /// Enqueues a new item. `provides` implicitly gains `name`; `requires`
    /// silently drops `name` if present. Clears the validity flag and
    /// pulses waiters, since a previously stuck `dequeue` may now be able
    /// to accept this item.
    pub fn enqueue<S, P, PS, R, RS>(
        &self,
        name: S,
        value: Option<V>,
        provides: P,
        requires: R,
    ) -> Result<Arc<Item<V>>>
    where
        S: Into<String>,
        P: IntoIterator<Item = PS>,
        PS: Into<String>,
        R: IntoIterator<Item = RS>,
        RS: Into<String>,
    {
        self.check_disposed()?;
        let name = name.into();
        if name.is_empty() {
            return Err(QueueError::InvalidArgument("item name must not be empty".into()));
        }
        let provides: Vec<String> = provides.into_iter().map(Into::into).collect();
        let requires: Vec<String> = requires.into_iter().map(Into::into).collect();
        for n in provides.iter().chain(requires.iter()) {
            if n.is_empty() {
                return Err(QueueError::InvalidArgument("topic name must not be empty".into()));
            }
        }

        let mut guard = self.monitor.acquire();
        if guard.ending {
            return Err(QueueError::Ending);
        }

        let item = Arc::new(Item::new(name.clone(), value, provides, requires));

        for topic_name in item.provides() {
            guard
                .topics
                .get_or_create(&topic_name)
                .push_provider(item.clone());
        }
        for topic_name in item.requires() {
            guard
                .topics
                .get_or_create(&topic_name)
                .push_requirer(item.clone());
        }

        if item.is_ready() {
            guard.ready.enqueue(item.clone());
        }
        guard.valid = false;

        tracing::debug!(
            item = %item.name(),
            provides = ?item.provides(),
            requires = ?item.requires(),
            "enqueued item"
        );

        self.monitor.pulse_all();
        Ok(item)
    }

    /// Returns a single-producer fluent builder over this queue.
    pub fn create_builder(&self) -> Builder<'_, V> {
        Builder::new(self)
    }

    /// Runs validation over the current dependency graph, returning every
    /// problem found. Sets the validity flag iff the result is empty.
    pub fn validate(&self) -> Result<Vec<ValidationError>> {
        self.check_disposed()?;
        let mut guard = self.monitor.acquire();
        let errors = validation::validate(&guard.topics);
        for error in &errors {
            tracing::warn!(%error, "validation error");
        }
        tracing::debug!(error_count = errors.len(), "validation complete");
        guard.valid = errors.is_empty();
        guard.ever_validated = true;
        Ok(errors)
    }

    /// Blocks until a ready item is available (optionally accepted by
    /// `accept`), the queue is ending, or the graph is empty.
    pub fn dequeue(&self, accept: Option<&dyn Fn(&V) -> bool>) -> Result<Option<Arc<Item<V>>>> {
        self.check_disposed()?;
        let mut guard = self.monitor.acquire();
        self.require_valid(&guard)?;

        loop {
            if self.disposed.load(Ordering::SeqCst) {
                return Err(QueueError::Disposed);
            }
            if guard.ending {
                return Ok(None);
            }
            if guard.topics.is_empty() {
                return Ok(None);
            }
            if let Some(item) = take_ready(&mut guard.ready, accept) {
                return Ok(Some(item));
            }
            guard = guard.release_until_pulse(self.config.repoll_interval);
        }
    }

    /// Async analogue of [`Self::dequeue`], suspending cooperatively
    /// between predicate re-evaluations and observing `cancel`.
    pub async fn dequeue_async(
        &self,
        accept: Option<&dyn Fn(&V) -> bool>,
        cancel: &CancellationToken,
    ) -> Result<Option<Arc<Item<V>>>> {
        self.check_disposed()?;
        let mut guard = self.monitor.acquire_async(cancel).await?;
        self.require_valid(&guard)?;

        loop {
            if self.disposed.load(Ordering::SeqCst) {
                return Err(QueueError::Disposed);
            }
            if guard.ending {
                return Ok(None);
            }
            if guard.topics.is_empty() {
                return Ok(None);
            }
            if let Some(item) = take_ready(&mut guard.ready, accept) {
                return Ok(Some(item));
            }
            guard = guard
                .release_until_pulse_async(self.config.repoll_interval, cancel)
                .await?;
        }
    }

    fn require_valid(&self, guard: &crate::monitor::MonitorGuard<'_, QueueState<V>>) -> Result<()> {
        if !guard.ever_validated {
            return Err(QueueError::InvalidState(
                "dequeue requires a prior successful call to validate()".into(),
            ));
        }
        if !guard.valid {
            return Err(QueueError::InvalidQueue);
        }
        Ok(())
    }

    /// Marks `item` as finished, retiring its provides edges. Newly
    /// unblocked dependents move to the ready queue. Tolerates items never
    /// enqueued here (their topics are simply skipped) and items not
    /// currently dequeued.
    pub fn complete(&self, item: &Arc<Item<V>>) -> Result<()> {
        self.check_disposed()?;
        let mut guard = self.monitor.acquire();
        let mut should_pulse = false;
        let mut newly_ready = Vec::new();

        for name in item.provides() {
            let Some(topic) = guard.topics.get_mut(&name) else {
                continue;
            };
            topic.remove_provider(item);
            if !topic.provided_by().is_empty() {
                continue;
            }
            let Some(removed) = guard.topics.remove(&name) else {
                continue;
            };
            if guard.topics.is_empty() {
                should_pulse = true;
            }
            for dependent in removed.required_by() {
                dependent.remove_requires(&name);
                if dependent.is_ready() {
                    guard.ready.enqueue(dependent.clone());
                    newly_ready.push(dependent.name().to_string());
                    should_pulse = true;
                }
            }
        }

        tracing::debug!(item = %item.name(), newly_ready = ?newly_ready, "completed item");

        if should_pulse {
            self.monitor.pulse_all();
        }
        Ok(())
    }

    /// Drops every item, topic, and ready entry. Validity is left
    /// unchanged (an empty graph is vacuously valid either way).
    pub fn clear(&self) -> Result<()> {
        self.check_disposed()?;
        let mut guard = self.monitor.acquire();
        guard.topics.clear();
        guard.ready.clear();
        drop(guard);
        self.monitor.pulse_all();
        Ok(())
    }

    /// Marks the queue as ending: future `enqueue`s fail, and `dequeue`
    /// returns `None` once the ready queue is drained.
    pub fn set_ending(&self) -> Result<()> {
        self.check_disposed()?;
        let mut guard = self.monitor.acquire();
        guard.ending = true;
        drop(guard);
        self.monitor.pulse_all();
        tracing::debug!("queue set to ending");
        Ok(())
    }

    /// Acquires the monitor and returns a read-only [`View`] over the
    /// topics map and ready queue. Holding the view blocks every other
    /// queue operation until it is dropped or released.
    pub fn inspect(&self) -> Result<View<'_, V>> {
        self.check_disposed()?;
        Ok(View::new(self.monitor.acquire()))
    }

    /// Async analogue of [`Self::inspect`].
    pub async fn inspect_async(&self, cancel: &CancellationToken) -> Result<View<'_, V>> {
        self.check_disposed()?;
        Ok(View::new(self.monitor.acquire_async(cancel).await?))
    }

    /// Marks the queue disposed. Every subsequent operation (including a
    /// concurrently in-flight one that hasn't yet checked the flag) may
    /// fail with [`QueueError::Disposed`]. Not safe to call concurrently
    /// with any other queue operation.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.monitor.pulse_all();
    }
}

fn take_ready<V>(
    ready: &mut PredicateQueue<Arc<Item<V>>>,
    accept: Option<&dyn Fn(&V) -> bool>,
) -> Option<Arc<Item<V>>> {
    match accept {
        None => ready.try_dequeue_where(|_| (), |_| true),
        Some(accept) => ready.try_dequeue_where(
            |item| item.value().map(|v| accept(v)).unwrap_or(false),
            |&matched| matched,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn queue() -> Queue<i32> {
        Queue::new(QueueConfig::default())
    }

    #[test]
    fn simple_chain() {
        let q = queue();
        q.enqueue("a", Some(1), Vec::<String>::new(), Vec::<String>::new())
            .unwrap();
        q.enqueue("b", Some(2), Vec::<String>::new(), vec!["a".to_string()])
            .unwrap();
        assert!(q.validate().unwrap().is_empty());

        let a = q.dequeue(None).unwrap().unwrap();
        assert_eq!(a.name(), "a");
        q.complete(&a).unwrap();

        let b = q.dequeue(None).unwrap().unwrap();
        assert_eq!(b.name(), "b");
        q.complete(&b).unwrap();

        assert!(q.dequeue(None).unwrap().is_none());
    }

    #[test]
    fn fan_in() {
        let q = queue();
        q.enqueue(
            "x",
            Some(0),
            Vec::<String>::new(),
            vec!["b".to_string(), "c".to_string()],
        )
        .unwrap();
        q.enqueue("y", Some(1), vec!["b".to_string()], Vec::<String>::new())
            .unwrap();
        q.enqueue("z", Some(2), vec!["c".to_string()], Vec::<String>::new())
            .unwrap();
        assert!(q.validate().unwrap().is_empty());

        let first = q.dequeue(None).unwrap().unwrap();
        let second = q.dequeue(None).unwrap().unwrap();
        let mut names = vec![first.name().to_string(), second.name().to_string()];
        names.sort();
        assert_eq!(names, vec!["y".to_string(), "z".to_string()]);

        q.complete(&first).unwrap();
        q.complete(&second).unwrap();

        let x = q.dequeue(None).unwrap().unwrap();
        assert_eq!(x.name(), "x");
    }

    #[test]
    fn duplicate_providers_fifo() {
        let q = queue();
        q.enqueue("a", Some(0), Vec::<String>::new(), vec!["b".to_string()])
            .unwrap();
        let b0 = q
            .enqueue("b0", Some(1), vec!["b".to_string()], Vec::<String>::new())
            .unwrap();
        let b1 = q
            .enqueue("b1", Some(2), vec!["b".to_string()], Vec::<String>::new())
            .unwrap();
        assert!(q.validate().unwrap().is_empty());

        let first = q.dequeue(None).unwrap().unwrap();
        assert_eq!(first.name(), "b0");
        let second = q.dequeue(None).unwrap().unwrap();
        assert_eq!(second.name(), "b1");

        q.complete(&b0).unwrap();
        // a is not yet ready: b still has b1 as a provider.
        assert!(q.inspect().unwrap().ready().unwrap().next().is_none());

        q.complete(&b1).unwrap();
        let a = q.dequeue(None).unwrap().unwrap();
        assert_eq!(a.name(), "a");
    }

    #[test]
    fn direct_cycle_reports_single_error() {
        let q = queue();
        q.enqueue("a", Some(0), Vec::<String>::new(), vec!["b".to_string()])
            .unwrap();
        q.enqueue("b", Some(0), Vec::<String>::new(), vec!["a".to_string()])
            .unwrap();
        let errors = q.validate().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::Cycle { requiring_item, required_topic }
                if requiring_item == "b" && required_topic == "a"
        ));
    }

    #[test]
    fn unprovided_topic_reported() {
        let q = queue();
        q.enqueue(
            "a",
            Some(0),
            Vec::<String>::new(),
            vec!["missing".to_string()],
        )
        .unwrap();
        let errors = q.validate().unwrap();
        assert_eq!(
            errors,
            vec![ValidationError::UnprovidedTopic {
                topic: "missing".into()
            }]
        );
    }

    #[test]
    fn dequeue_before_validate_is_invalid_state() {
        let q = queue();
        q.enqueue("a", Some(0), Vec::<String>::new(), Vec::<String>::new())
            .unwrap();
        assert!(matches!(
            q.dequeue(None),
            Err(QueueError::InvalidState(_))
        ));
    }

    #[test]
    fn enqueue_after_validate_invalidates() {
        let q = queue();
        q.enqueue("a", Some(0), Vec::<String>::new(), Vec::<String>::new())
            .unwrap();
        q.validate().unwrap();
        q.enqueue("b", Some(0), Vec::<String>::new(), Vec::<String>::new())
            .unwrap();
        assert!(matches!(q.dequeue(None), Err(QueueError::InvalidQueue)));
    }

    #[test]
    fn enqueue_while_ending_fails() {
        let q = queue();
        q.set_ending().unwrap();
        assert!(matches!(
            q.enqueue("a", Some(0), Vec::<String>::new(), Vec::<String>::new()),
            Err(QueueError::Ending)
        ));
    }

    #[test]
    fn dequeue_on_empty_queue_returns_none() {
        let q = queue();
        q.validate().unwrap();
        assert!(q.dequeue(None).unwrap().is_none());
    }

    #[test]
    fn operations_after_dispose_fail() {
        let q = queue();
        q.dispose();
        assert!(matches!(
            q.enqueue("a", Some(0), Vec::<String>::new(), Vec::<String>::new()),
            Err(QueueError::Disposed)
        ));
        assert!(matches!(q.validate(), Err(QueueError::Disposed)));
    }

    #[test]
    fn complete_is_idempotent_for_unknown_items() {
        let q = queue();
        q.validate().unwrap();
        let foreign = Arc::new(Item::new("ghost".into(), Some(0), vec![], vec![]));
        assert!(q.complete(&foreign).is_ok());
    }

    #[test]
    fn blocked_dequeue_wakes_on_concurrent_complete() {
        let q = Arc::new(queue());
        q.enqueue("a", Some(0), Vec::<String>::new(), Vec::<String>::new())
            .unwrap();
        q.enqueue("b", Some(1), Vec::<String>::new(), vec!["a".to_string()])
            .unwrap();
        q.validate().unwrap();

        let a = q.dequeue(None).unwrap().unwrap();

        let q2 = q.clone();
        let waiter = thread::spawn(move || q2.dequeue(None).unwrap().unwrap());

        thread::sleep(Duration::from_millis(50));
        q.complete(&a).unwrap();

        let b = waiter.join().unwrap();
        assert_eq!(b.name(), "b");
    }

    #[tokio::test]
    async fn dequeue_async_respects_cancellation() {
        let q = queue();
        q.validate().unwrap();
        q.set_ending().unwrap();
        let cancel = CancellationToken::new();
        // Ending queue returns None immediately rather than blocking, so
        // cancellation never has to be observed here; this exercises the
        // async path end-to-end.
        let result = q.dequeue_async(None, &cancel).await.unwrap();
        assert!(result.is_none());
    }
}
