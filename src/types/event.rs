//! Events emitted by the timer engine.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::Phase;

// ============================================================================
// TimerEvent
// ============================================================================

/// Events delivered to listeners subscribed on a [`crate::engine::Timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second of the current interval elapsed
    Tick {
        /// Seconds left in the interval after this tick
        remaining_seconds: u32,
    },
    /// The timer moved from one phase to another
    StateChange {
        /// Phase before the change
        from: Phase,
        /// Phase after the change
        to: Phase,
    },
    /// A work session ran to completion
    SessionComplete {
        /// Work sessions completed in the current cycle, including this one
        completed: u32,
    },
    /// A short or long break ran to completion
    BreakComplete {
        /// Which break finished
        phase: Phase,
    },
    /// Enough work sessions completed to earn a long break
    CycleComplete {
        /// Work sessions completed in the cycle that just ended
        completed: u32,
    },
}

impl TimerEvent {
    /// Returns the subscription kind this event is delivered under.
    pub fn kind(&self) -> EventKind {
        match self {
            TimerEvent::Tick { .. } => EventKind::Tick,
            TimerEvent::StateChange { .. } => EventKind::StateChange,
            TimerEvent::SessionComplete { .. } => EventKind::SessionComplete,
            TimerEvent::BreakComplete { .. } => EventKind::BreakComplete,
            TimerEvent::CycleComplete { .. } => EventKind::CycleComplete,
        }
    }
}

// ============================================================================
// EventKind
// ============================================================================

/// The kinds of events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Tick,
    StateChange,
    SessionComplete,
    BreakComplete,
    CycleComplete,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Tick,
        EventKind::StateChange,
        EventKind::SessionComplete,
        EventKind::BreakComplete,
        EventKind::CycleComplete,
    ];

    /// Returns the event name used in subscriptions and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Tick => "tick",
            EventKind::StateChange => "state_change",
            EventKind::SessionComplete => "session_complete",
            EventKind::BreakComplete => "break_complete",
            EventKind::CycleComplete => "cycle_complete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name an [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timer event '{0}' (expected one of: tick, state_change, session_complete, break_complete, cycle_complete)")]
pub struct UnknownEventError(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventError(s.to_string()))
    }
}
