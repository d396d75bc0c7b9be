//! Listener registry and fault-isolated event delivery.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::types::{EventKind, TimerEvent};

/// A subscribed event handler.
///
/// Listeners are identified by the allocation behind the `Arc`, so keep the
/// value returned by [`crate::engine::Timer::subscribe`] to unsubscribe later.
pub type Callback = Arc<dyn Fn(&TimerEvent) -> anyhow::Result<()> + Send + Sync>;

/// Wraps a closure as a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&TimerEvent) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn same_callback(a: &Callback, b: &Callback) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Per-kind ordered listener lists without duplicates.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: HashMap<EventKind, Vec<Callback>>,
}

impl ListenerRegistry {
    /// Registers `callback` for `kind`; returns false if it was already there.
    pub(crate) fn add(&mut self, kind: EventKind, callback: &Callback) -> bool {
        let list = self.listeners.entry(kind).or_default();
        if list.iter().any(|existing| same_callback(existing, callback)) {
            return false;
        }
        list.push(Arc::clone(callback));
        true
    }

    /// Unregisters `callback` for `kind`; returns false if it was not registered.
    pub(crate) fn remove(&mut self, kind: EventKind, callback: &Callback) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|existing| !same_callback(existing, callback));
        list.len() != before
    }

    /// Copies the listeners for `kind` so delivery can run without the registry lock.
    pub(crate) fn snapshot(&self, kind: EventKind) -> Vec<Callback> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}

/// Calls each listener in order.
///
/// An error or panic from one listener is logged and does not stop delivery
/// to the rest.
pub(crate) fn deliver(callbacks: &[Callback], event: &TimerEvent) {
    for callback in callbacks {
        match panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(event = %event.kind(), "Timer listener failed: {:#}", e);
            }
            Err(payload) => {
                tracing::warn!(
                    event = %event.kind(),
                    "Timer listener panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
