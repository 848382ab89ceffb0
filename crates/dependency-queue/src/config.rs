//! Tunables for a [`crate::Queue`]: the default re-poll interval and the
//! topic name comparer.
//!
//! The crate has no persisted or process-external state, so this is the
//! entire configuration surface — there is no config file format to parse.

use std::time::Duration;

/// How topic names are compared for equality.
///
/// The default is exact byte comparison. `CaseInsensitive` folds ASCII
/// case before comparing, which is enough for the common "topics are
/// identifiers" case without pulling in a full Unicode case-folding
/// dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameComparer {
    /// Exact byte-for-byte comparison (the default).
    #[default]
    ExactByte,
    /// ASCII case-insensitive comparison.
    CaseInsensitiveAscii,
}

impl NameComparer {
    /// Normalizes a name for use as a map key under this comparer.
    ///
    /// Both topic map keys and equality checks funnel through this so the
    /// comparer is applied consistently everywhere a name is looked up.
    pub fn normalize(&self, name: &str) -> String {
        match self {
            NameComparer::ExactByte => name.to_string(),
            NameComparer::CaseInsensitiveAscii => name.to_ascii_lowercase(),
        }
    }

    /// Returns true if two names are equal under this comparer.
    pub fn eq(&self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

/// The minimum re-poll interval the queue will accept.
///
/// A zero interval would turn `dequeue`'s wait loop into a busy-wait; the
/// spec calls this out explicitly as forbidden.
pub const MIN_REPOLL_INTERVAL: Duration = Duration::from_millis(1);

/// The default re-poll interval: one second.
pub const DEFAULT_REPOLL_INTERVAL: Duration = Duration::from_secs(1);

/// Construction-time configuration for a [`crate::Queue`].
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Comparer used for topic and item names.
    pub comparer: NameComparer,
    /// How long `dequeue`/`dequeue_async` wait between predicate
    /// re-evaluations when no pulse arrives. Clamped to at least
    /// [`MIN_REPOLL_INTERVAL`].
    pub repoll_interval: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            comparer: NameComparer::default(),
            repoll_interval: DEFAULT_REPOLL_INTERVAL,
        }
    }
}

impl QueueConfig {
    /// Creates a config with the default comparer and re-poll interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name comparer.
    pub fn with_comparer(mut self, comparer: NameComparer) -> Self {
        self.comparer = comparer;
        self
    }

    /// Sets the re-poll interval, clamping it away from zero.
    pub fn with_repoll_interval(mut self, interval: Duration) -> Self {
        self.repoll_interval = interval.max(MIN_REPOLL_INTERVAL);
        self
    }
}
