//! Reentrant monitor serializing timer commands, ticks and event delivery.
//!
//! A thread that holds the monitor may enter it again, which lets listeners
//! call back into the timer while an event is being delivered to them.
//!
//! Built on a `Mutex` and `Condvar` rather than a reentrant lock crate
//! because the countdown worker must be able to give up waiting:
//! [`Monitor::enter_unless`] rechecks a cancel condition while blocked, so a
//! worker retired by `stop` exits instead of queueing behind it.

use std::marker::PhantomData;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Duration;

/// How often a waiter in [`Monitor::enter_unless`] rechecks its cancel condition.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct Ownership {
    /// Thread currently inside the monitor
    owner: Option<ThreadId>,
    /// Number of nested entries by `owner`
    depth: usize,
}

impl Ownership {
    fn try_claim(&mut self, me: ThreadId) -> bool {
        match self.owner {
            None => {
                self.owner = Some(me);
                self.depth = 1;
                true
            }
            Some(owner) if owner == me => {
                self.depth += 1;
                true
            }
            Some(_) => false,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Monitor {
    ownership: Mutex<Ownership>,
    released: Condvar,
}

impl Monitor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Blocks until the calling thread owns the monitor.
    pub(crate) fn enter(&self) -> MonitorGuard<'_> {
        let me = thread::current().id();
        let mut ownership = self.lock();
        while !ownership.try_claim(me) {
            ownership = self
                .released
                .wait(ownership)
                .unwrap_or_else(PoisonError::into_inner);
        }
        MonitorGuard::new(self)
    }

    /// Like [`Monitor::enter`], but gives up once `cancelled` returns true.
    pub(crate) fn enter_unless(
        &self,
        mut cancelled: impl FnMut() -> bool,
    ) -> Option<MonitorGuard<'_>> {
        let me = thread::current().id();
        let mut ownership = self.lock();
        loop {
            if ownership.try_claim(me) {
                return Some(MonitorGuard::new(self));
            }
            if cancelled() {
                return None;
            }
            ownership = self
                .released
                .wait_timeout(ownership, POLL_INTERVAL)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Returns true if the calling thread is inside the monitor.
    #[cfg(test)]
    pub(crate) fn is_held_by_current_thread(&self) -> bool {
        self.lock().owner == Some(thread::current().id())
    }

    fn lock(&self) -> MutexGuard<'_, Ownership> {
        self.ownership.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn exit(&self) {
        let mut ownership = self.lock();
        ownership.depth = ownership.depth.saturating_sub(1);
        if ownership.depth == 0 {
            ownership.owner = None;
            drop(ownership);
            self.released.notify_all();
        }
    }
}

/// Proof of ownership; leaving scope exits one level of the monitor.
///
/// Not `Send`: the guard must be dropped on the thread that entered.
#[must_use]
pub(crate) struct MonitorGuard<'a> {
    monitor: &'a Monitor,
    _not_send: PhantomData<*const ()>,
}

impl<'a> MonitorGuard<'a> {
    fn new(monitor: &'a Monitor) -> Self {
        Self {
            monitor,
            _not_send: PhantomData,
        }
    }
}

impl Drop for MonitorGuard<'_> {
    fn drop(&mut self) {
        self.monitor.exit();
    }
}
