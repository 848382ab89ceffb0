//! Error types for dependency queue operations.

use thiserror::Error;

/// Errors that can occur during dependency queue operations.
///
/// These are the *programmer error* / lifecycle class of failure: bad
/// arguments, calling an operation out of order, or touching a queue that
/// has already been disposed. Dependency-graph problems (cycles, missing
/// providers) are not part of this enum — `validate()` returns those as
/// data, never as a raised error.
#[derive(Error, Debug)]
pub enum QueueError {
    /// A name argument was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The queue is not in the state required for this operation
    /// (e.g. `dequeue` called before `validate`, or a builder invoked with
    /// no current entry).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// `dequeue` observed a cleared validity flag after an enqueue raced
    /// ahead of it. The caller must call `validate()` again.
    #[error("queue is not valid: call validate() again after the last enqueue")]
    InvalidQueue,

    /// The queue has had `set_ending()` called on it; no further items can
    /// be enqueued.
    #[error("queue is ending: no further items may be enqueued")]
    Ending,

    /// The queue has been disposed; no further operations are permitted.
    #[error("queue has been disposed")]
    Disposed,

    /// An inspector view was used after `release()`/drop already released
    /// its lock.
    #[error("inspector view's lock has already been released")]
    LockReleased,

    /// A blocking wait was cancelled before a result became available.
    #[error("operation was cancelled")]
    Cancelled,
}

/// Result type alias for dependency queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// A single problem found by [`crate::Queue::validate`].
///
/// Validation errors are returned as data rather than raised: they
/// describe a defect in the dependency graph itself, not a misuse of the
/// API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A topic is required by at least one item but provided by none.
    UnprovidedTopic {
        /// The name of the topic nothing provides.
        topic: String,
    },
    /// A dependency cycle was found while walking the topic graph.
    Cycle {
        /// The item whose `requires` edge closed the cycle.
        requiring_item: String,
        /// The topic that edge pointed back to.
        required_topic: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::UnprovidedTopic { topic } => {
                write!(f, "The topic '{topic}' is required but not provided.")
            }
            ValidationError::Cycle {
                requiring_item,
                required_topic,
            } => write!(
                f,
                "The item '{requiring_item}' cannot require topic '{required_topic}' \
                 because an item providing that topic already requires item \
                 '{requiring_item}'. The dependency graph does not permit cycles."
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
