//! Timer engine: background countdown, command serialization and event
//! delivery.

mod listeners;
mod monitor;
mod timer;

pub use listeners::{callback, Callback};
pub use timer::{Timer, WeakTimer, STOP_JOIN_TIMEOUT, TICK_INTERVAL};
