//! Console listeners wired onto the timer by the `run` command.

use std::io::{self, Write};

use super::display::Display;
use crate::engine::{callback, Timer};
use crate::types::{EventKind, TimerEvent};

/// Terminal bell.
const BELL: &str = "\x07";

/// Subscribes the status line, milestone messages and (optionally) the bell.
pub fn attach(timer: &Timer, audio_enabled: bool) {
    let weak = timer.downgrade();
    let redraw = callback(move |_| {
        if let Some(timer) = weak.upgrade() {
            Display::show_status(&timer.get_session_info());
        }
        Ok(())
    });
    timer.on(EventKind::Tick, &redraw);
    timer.on(EventKind::StateChange, &redraw);

    for kind in [
        EventKind::SessionComplete,
        EventKind::BreakComplete,
        EventKind::CycleComplete,
    ] {
        timer.subscribe(kind, |event| {
            if let Some(message) = announcement(event) {
                Display::show_message(&message);
            }
            Ok(())
        });
    }

    if audio_enabled {
        for kind in [EventKind::SessionComplete, EventKind::BreakComplete] {
            timer.subscribe(kind, |_| {
                let mut stdout = io::stdout().lock();
                stdout.write_all(BELL.as_bytes())?;
                stdout.flush()?;
                Ok(())
            });
        }
    }
}

/// Text printed when a milestone event fires.
pub fn announcement(event: &TimerEvent) -> Option<String> {
    match event {
        TimerEvent::SessionComplete { completed } => {
            Some(format!("Pomodoro #{} complete. Time for a break.", completed))
        }
        TimerEvent::BreakComplete { phase } => Some(format!(
            "{} over. Press [s] to start the next session.",
            phase.display_name().to_lowercase()
        )),
        TimerEvent::CycleComplete { completed } => Some(format!(
            "Cycle of {} pomodoros done. Enjoy the long break.",
            completed
        )),
        TimerEvent::Tick { .. } | TimerEvent::StateChange { .. } => None,
    }
}
