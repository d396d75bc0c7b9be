//! Thread-backed Pomodoro timer.
//!
//! [`Timer`] wraps a [`TimerState`] and drives it from a background countdown
//! worker that ticks once per second while a session is running.
//!
//! Locking:
//! - every command and every tick runs inside a reentrant [`Monitor`] and
//!   delivers its events before leaving it, so once `pause` or `stop` returns
//!   no further tick for the old interval can be observed
//! - the state itself sits behind a plain mutex that is never held while a
//!   listener runs; queries only take that mutex
//! - listeners may call back into the timer from inside a callback; the
//!   events of such a nested command are delivered after the current one

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{debug, info, warn};

use super::listeners::{self, Callback, ListenerRegistry};
use super::monitor::Monitor;
use crate::types::{DurationUpdate, EventKind, Phase, SessionInfo, TimerConfig, TimerEvent, TimerState};

/// Wall-clock time between two ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How long `stop` waits for the countdown worker before detaching it.
pub const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

const WORKER_THREAD_NAME: &str = "pomodoro-countdown";

// ============================================================================
// Worker
// ============================================================================

/// Handle on a running countdown thread.
struct Worker {
    /// Dropping this wakes the worker and tells it to exit
    cancel: Sender<()>,
    /// Disconnects when the worker returns
    done: Receiver<()>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(inner: Weak<Inner>, session: u64) -> std::io::Result<Self> {
        let (cancel, cancel_rx) = bounded::<()>(0);
        let (done_tx, done) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_countdown(inner, session, cancel_rx, done_tx))?;

        debug!(session, "Countdown worker started");
        Ok(Self {
            cancel,
            done,
            handle,
        })
    }

    /// Cancels the worker and waits up to [`STOP_JOIN_TIMEOUT`] for it to exit.
    fn shutdown(self) {
        let Worker {
            cancel,
            done,
            handle,
        } = self;
        drop(cancel);

        // Stopped from one of our own listeners: the loop exits on its own.
        if handle.thread().id() == thread::current().id() {
            return;
        }

        match done.recv_timeout(STOP_JOIN_TIMEOUT) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if handle.join().is_err() {
                    warn!("Countdown worker panicked");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Countdown worker did not exit within {:?}, detaching it",
                    STOP_JOIN_TIMEOUT
                );
            }
        }
    }
}

fn run_countdown(inner: Weak<Inner>, session: u64, cancel: Receiver<()>, _done: Sender<()>) {
    loop {
        match cancel.recv_timeout(TICK_INTERVAL) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let Some(inner) = inner.upgrade() else {
            break;
        };
        if !inner.tick(session, &cancel) {
            break;
        }
    }
    debug!(session, "Countdown worker exiting");
}

fn is_cancelled(cancel: &Receiver<()>) -> bool {
    !matches!(cancel.try_recv(), Err(TryRecvError::Empty))
}

// ============================================================================
// Inner
// ============================================================================

struct Core {
    state: TimerState,
    /// Bumped whenever a worker is started or retired
    session: u64,
    /// True while `stop` is waiting for the worker outside the monitor
    stopping: bool,
    worker: Option<Worker>,
}

/// Events waiting for delivery, in emission order.
#[derive(Default)]
struct Outbox {
    queue: VecDeque<TimerEvent>,
    /// True while some frame on the monitor owner's stack is draining `queue`
    delivering: bool,
}

struct Inner {
    monitor: Monitor,
    core: Mutex<Core>,
    listeners: Mutex<ListenerRegistry>,
    outbox: Mutex<Outbox>,
}

impl Inner {
    fn lock_core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, ListenerRegistry> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers events in order; the caller must hold the monitor.
    ///
    /// Events emitted by a command a listener issues are queued behind the
    /// event being delivered, so every listener sees one sequence.
    fn emit(&self, events: &[TimerEvent]) {
        {
            let mut outbox = self.lock_outbox();
            outbox.queue.extend(events.iter().copied());
            if outbox.delivering {
                return;
            }
            outbox.delivering = true;
        }

        loop {
            let Some(event) = self.lock_outbox().queue.pop_front() else {
                break;
            };
            log_event(&event);
            let callbacks = self.lock_listeners().snapshot(event.kind());
            listeners::deliver(&callbacks, &event);
        }
        self.lock_outbox().delivering = false;
    }

    /// One worker iteration. Returns false when the worker should exit.
    ///
    /// The tick is delivered before the completion it triggers, and each
    /// completion step is delivered before the next one is applied. A step
    /// is dropped when a listener stopped or restarted the timer meanwhile,
    /// and held back while it is paused.
    fn tick(&self, session: u64, cancel: &Receiver<()>) -> bool {
        let Some(_guard) = self.monitor.enter_unless(|| is_cancelled(cancel)) else {
            return false;
        };

        let mut next = {
            let mut core = self.lock_core();
            if core.session != session || core.stopping || !core.state.is_running() {
                return false;
            }
            core.state.advance()
        };

        while let Some(event) = next {
            self.emit(&[event]);

            let mut core = self.lock_core();
            if core.session != session || core.stopping {
                return false;
            }
            next = core.state.complete_step();
        }

        let core = self.lock_core();
        core.session == session && core.state.is_running()
    }
}

fn log_event(event: &TimerEvent) {
    match event {
        TimerEvent::Tick { remaining_seconds } => debug!(remaining_seconds, "Tick"),
        TimerEvent::StateChange { from, to } => debug!(%from, %to, "Phase changed"),
        TimerEvent::SessionComplete { completed } => {
            info!(completed, "Work session complete");
        }
        TimerEvent::BreakComplete { phase } => info!(%phase, "Break complete"),
        TimerEvent::CycleComplete { completed } => {
            info!(completed, "Cycle complete, long break earned");
        }
    }
}

// ============================================================================
// Timer
// ============================================================================

/// A Pomodoro timer with a background countdown.
///
/// Cloning yields another handle to the same timer. The worker thread only
/// holds a weak reference, so dropping every handle ends the countdown.
#[derive(Clone)]
pub struct Timer {
    inner: Arc<Inner>,
}

impl Timer {
    /// Creates an idle timer using the given durations.
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                monitor: Monitor::new(),
                core: Mutex::new(Core {
                    state: TimerState::new(config),
                    session: 0,
                    stopping: false,
                    worker: None,
                }),
                listeners: Mutex::new(ListenerRegistry::default()),
                outbox: Mutex::new(Outbox::default()),
            }),
        }
    }

    /// Returns a handle that does not keep the timer alive.
    pub fn downgrade(&self) -> WeakTimer {
        WeakTimer {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts a work session and its countdown worker.
    ///
    /// Returns false if a session is already in progress (including paused)
    /// or the worker thread could not be spawned.
    pub fn start(&self) -> bool {
        let _guard = self.inner.monitor.enter();
        let events = {
            let mut core = self.inner.lock_core();
            if core.stopping {
                return false;
            }
            let Some(events) = core.state.start() else {
                return false;
            };

            core.session += 1;
            match Worker::spawn(Arc::downgrade(&self.inner), core.session) {
                // Replacing a worker left over from a finished break
                // drops its cancel sender.
                Ok(worker) => core.worker = Some(worker),
                Err(e) => {
                    warn!("Failed to spawn countdown worker: {}", e);
                    core.state.stop();
                    return false;
                }
            }
            events
        };
        self.inner.emit(&events);
        true
    }

    /// Pauses the active work session or break.
    pub fn pause(&self) -> bool {
        self.command(TimerState::pause)
    }

    /// Resumes a paused session in the phase it was paused from.
    pub fn resume(&self) -> bool {
        self.command(TimerState::resume)
    }

    /// Ends the current interval; completion is processed on the next tick.
    pub fn skip(&self) -> bool {
        self.command(|state| state.skip().then(Vec::new))
    }

    /// Stops the session, waits for the worker and returns to idle.
    ///
    /// Returns false if nothing was running or another stop is in progress.
    /// The worker is awaited for at most [`STOP_JOIN_TIMEOUT`].
    pub fn stop(&self) -> bool {
        let worker = {
            let _guard = self.inner.monitor.enter();
            let mut core = self.inner.lock_core();
            if core.stopping || !core.state.is_running() {
                return false;
            }
            core.stopping = true;
            core.session += 1;
            core.worker.take()
        };

        // The worker may need the monitor to notice the cancellation.
        if let Some(worker) = worker {
            worker.shutdown();
        }

        let _guard = self.inner.monitor.enter();
        let events = {
            let mut core = self.inner.lock_core();
            core.stopping = false;
            core.state.stop().unwrap_or_default()
        };
        self.inner.emit(&events);
        true
    }

    fn command(&self, f: impl FnOnce(&mut TimerState) -> Option<Vec<TimerEvent>>) -> bool {
        let _guard = self.inner.monitor.enter();
        let events = {
            let mut core = self.inner.lock_core();
            if core.stopping {
                return false;
            }
            match f(&mut core.state) {
                Some(events) => events,
                None => return false,
            }
        };
        self.inner.emit(&events);
        true
    }

    /// Replaces durations for future intervals. The current interval keeps
    /// its length.
    pub fn update_durations(&self, update: &DurationUpdate) {
        self.inner.lock_core().state.update_durations(update);
    }

    /// Zeroes the completed-today counter.
    pub fn reset_daily_stats(&self) {
        self.inner.lock_core().state.reset_daily_stats();
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn get_state(&self) -> Phase {
        self.inner.lock_core().state.phase()
    }

    pub fn get_remaining_time(&self) -> u32 {
        self.inner.lock_core().state.remaining_seconds()
    }

    pub fn get_elapsed_time(&self) -> u32 {
        self.inner.lock_core().state.elapsed_seconds()
    }

    /// Progress through the current interval in `[0.0, 1.0]`.
    pub fn get_progress(&self) -> f64 {
        self.inner.lock_core().state.progress()
    }

    /// Captures a consistent snapshot of every counter.
    pub fn get_session_info(&self) -> SessionInfo {
        self.inner.lock_core().state.session_info()
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock_core().state.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock_core().state.is_paused()
    }

    // ------------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------------

    /// Registers a listener. Returns false if it was already registered for `kind`.
    pub fn on(&self, kind: EventKind, callback: &Callback) -> bool {
        self.inner.lock_listeners().add(kind, callback)
    }

    /// Unregisters a listener. Unknown listeners are ignored.
    pub fn off(&self, kind: EventKind, callback: &Callback) -> bool {
        self.inner.lock_listeners().remove(kind, callback)
    }

    /// Registers a closure and returns the handle needed to unregister it.
    pub fn subscribe<F>(&self, kind: EventKind, f: F) -> Callback
    where
        F: Fn(&TimerEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let callback = listeners::callback(f);
        self.on(kind, &callback);
        callback
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.lock_listeners().count(kind)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(&TimerConfig::default())
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock_core();
        f.debug_struct("Timer")
            .field("phase", &core.state.phase())
            .field("remaining_seconds", &core.state.remaining_seconds())
            .field("session", &core.session)
            .finish_non_exhaustive()
    }
}

/// Non-owning handle to a [`Timer`], for listeners that query the timer.
#[derive(Clone, Debug)]
pub struct WeakTimer {
    inner: Weak<Inner>,
}

impl WeakTimer {
    pub fn upgrade(&self) -> Option<Timer> {
        self.inner.upgrade().map(|inner| Timer { inner })
    }
}

// ============================================================================
// Tests
// ============================================================================
