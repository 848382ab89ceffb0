//! Dependency-ordered work queue.
//!
//! A reusable primitive for step runners, build schedulers, and
//! bootstrapping frameworks: producers [`Queue::enqueue`] named work
//! items declaring what topics they `provide` and what topics they
//! `require`; consumers [`Queue::dequeue`]/[`Queue::dequeue_async`] items
//! only once every prerequisite has been dequeued and
//! [`Queue::complete`]d. [`Queue::validate`] confirms the dependency graph
//! has no unprovided topics and no cycles before any dequeue is allowed.
//!
//! - **monitor**: the exclusive lock + condvar/notify pair serializing all
//!   queue mutation and implementing the wait/pulse discipline `dequeue`
//!   needs.
//! - **predicate_queue**: the FIFO ready-queue container.
//! - **item** / **topic** / **topic_map**: the dependency graph's nodes
//!   and the insertion-ordered map that holds them.
//! - **queue**: the core state machine — `enqueue`/`validate`/
//!   `dequeue`/`complete`/lifecycle transitions.
//! - **validation**: unprovided-topic and cycle-detection checks.
//! - **builder**: the fluent, single-producer accumulator over `enqueue`.
//! - **view**: the read-only, lock-scoped inspector returned by `inspect`.
//! - **config**: the name comparer and dequeue re-poll interval tunables.
//! - **error**: the `QueueError`/`ValidationError` taxonomy.
//!
//! # Example
//!
//! ```
//! use dependency_queue::{Queue, QueueConfig};
//!
//! let queue: Queue<&str> = Queue::new(QueueConfig::default());
//! queue.enqueue("fetch", Some("fetch sources"), Vec::<&str>::new(), Vec::<&str>::new()).unwrap();
//! queue
//!     .enqueue("build", Some("compile"), Vec::<&str>::new(), ["fetch"])
//!     .unwrap();
//! assert!(queue.validate().unwrap().is_empty());
//!
//! let fetch = queue.dequeue(None).unwrap().unwrap();
//! assert_eq!(fetch.name(), "fetch");
//! queue.complete(&fetch).unwrap();
//!
//! let build = queue.dequeue(None).unwrap().unwrap();
//! assert_eq!(build.name(), "build");
//! ```

mod builder;
mod config;
mod error;
mod item;
mod monitor;
mod predicate_queue;
mod queue;
mod topic;
mod topic_map;
mod validation;
mod view;

pub use builder::Builder;
pub use config::{NameComparer, QueueConfig, DEFAULT_REPOLL_INTERVAL, MIN_REPOLL_INTERVAL};
pub use error::{QueueError, Result, ValidationError};
pub use item::Item;
pub use queue::Queue;
pub use topic::Topic;
pub use view::{TopicSnapshot, View};
