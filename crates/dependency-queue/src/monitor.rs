//! An exclusive lock with condition-variable wait/pulse semantics.
//!
//! # Concurrency Patterns
//!
//! - **`std::sync::{Mutex, Condvar}`**: the blocking half. Serializes all
//!   mutation of the guarded state and lets `dequeue` release the lock
//!   while it waits for a pulse, the thing a bare `Mutex` cannot do.
//! - **`tokio::sync::Notify`**: layered alongside the same `Mutex` so
//!   `dequeue_async` can suspend cooperatively instead of parking a
//!   worker thread. Every `pulse_all` wakes both the condvar and the
//!   notify, so blocking and async waiters are woken by the same event.
//! - **`tokio_util::sync::CancellationToken`**: observed only while
//!   suspended in `release_until_pulse_async`, matching this crate's
//!   cancellation idiom elsewhere in the stack.
//!
//! Every critical section this crate takes under `Monitor` is a small,
//! bounded graph update — acquiring the lock itself never waits on
//! external I/O, so `acquire`/`acquire_async` are effectively the same
//! operation; only `release_until_pulse[_async]` actually suspends.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::error::{QueueError, Result};

pub struct Monitor<T> {
    state: Mutex<T>,
    condvar: Condvar,
    notify: Notify,
}

/// A scoped guard returned by [`Monitor::acquire`]. Releases the lock when
/// dropped.
pub struct MonitorGuard<'m, T> {
    monitor: &'m Monitor<T>,
    guard: Option<MutexGuard<'m, T>>,
}

impl<T> Monitor<T> {
    pub fn new(state: T) -> Self {
        Self {
            state: Mutex::new(state),
            condvar: Condvar::new(),
            notify: Notify::new(),
        }
    }

    /// Blocks until the lock is free.
    pub fn acquire(&self) -> MonitorGuard<'_, T> {
        let guard = self.state.lock().expect("monitor mutex poisoned");
        MonitorGuard {
            monitor: self,
            guard: Some(guard),
        }
    }

    /// Cooperative-wait variant of `acquire`. The lock itself is never
    /// held for long (see module docs), so this only checks cancellation
    /// before taking the (effectively non-blocking) lock.
    pub async fn acquire_async(&self, cancel: &CancellationToken) -> Result<MonitorGuard<'_, T>> {
        if cancel.is_cancelled() {
            return Err(QueueError::Cancelled);
        }
        Ok(self.acquire())
    }

    /// Wakes every thread/task parked in `release_until_pulse[_async]`.
    pub fn pulse_all(&self) {
        self.condvar.notify_all();
        self.notify.notify_waiters();
    }
}

impl<'m, T> MonitorGuard<'m, T> {
    /// Atomically releases the lock, blocks until `pulse_all` fires or
    /// `timeout` elapses, then reacquires the lock before returning.
    /// Spurious wakes are possible; callers must re-check their
    /// predicate after this returns.
    pub fn release_until_pulse(mut self, timeout: Duration) -> Self {
        let guard = self.guard.take().expect("guard already released");
        let (guard, _timeout_result) = self
            .monitor
            .condvar
            .wait_timeout(guard, timeout)
            .expect("monitor mutex poisoned");
        self.guard = Some(guard);
        self
    }

    /// Async analogue of [`Self::release_until_pulse`]. Drops the lock,
    /// waits on the `Notify`/timer/cancellation race, then reacquires.
    /// On cancellation the lock is not reacquired; the caller's guard is
    /// gone either way once this returns an error.
    ///
    /// Takes `self` by value and drops it before the await below so no
    /// `std::sync::MutexGuard`-bearing value is part of the state this
    /// future carries across suspension, keeping the future `Send`.
    pub async fn release_until_pulse_async(
        self,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let monitor = self.monitor;
        drop(self); // release the lock before waiting

        let notified = monitor.notify.notified();
        tokio::select! {
            _ = notified => {}
            _ = tokio::time::sleep(timeout) => {}
            _ = cancel.cancelled() => {
                return Err(QueueError::Cancelled);
            }
        }

        let guard = monitor.state.lock().expect("monitor mutex poisoned");
        Ok(Self {
            monitor,
            guard: Some(guard),
        })
    }
}

impl<'m, T> std::ops::Deref for MonitorGuard<'m, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &**self.guard.as_ref().expect("guard already released")
    }
}

impl<'m, T> std::ops::DerefMut for MonitorGuard<'m, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut **self.guard.as_mut().expect("guard already released")
    }
}
