//! Core data types for the Pomodoro timer.
//!
//! This module defines the data structures used for:
//! - Phases and the single-threaded timer state machine
//! - Timer configuration with settings-layer validation
//! - Session snapshots handed to renderers
//! - Engine events and time helpers
//!
//! [`TimerState`] has no locking of its own; [`crate::engine`] wraps it in a
//! mutex and drives it from a worker thread.

mod event;
mod time;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

pub use event::{EventKind, TimerEvent, UnknownEventError};
pub use time::{calculate_progress, format_time, minutes_to_seconds, parse_time, seconds_to_minutes};

// ============================================================================
// Phase
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// No session in progress
    #[default]
    Idle,
    /// Currently in a work session
    Work,
    /// Currently in a short break
    ShortBreak,
    /// Currently in a long break (after a full cycle)
    LongBreak,
    /// A work session or break is suspended
    Paused,
}

impl Phase {
    /// Returns the stable machine-readable name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::Work => "WORK",
            Phase::ShortBreak => "SHORT_BREAK",
            Phase::LongBreak => "LONG_BREAK",
            Phase::Paused => "PAUSED",
        }
    }

    /// Returns the label shown to the user for this phase.
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Idle => "READY",
            Phase::Work => "FOCUS TIME",
            Phase::ShortBreak => "SHORT BREAK",
            Phase::LongBreak => "LONG BREAK",
            Phase::Paused => "PAUSED",
        }
    }

    /// Returns true if the timer is actively counting down in this phase.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Work | Phase::ShortBreak | Phase::LongBreak)
    }

    /// Returns true for short and long breaks.
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Accepted work duration range in minutes.
pub const WORK_MINUTES_RANGE: (u32, u32) = (15, 45);
/// Accepted short break range in minutes.
pub const SHORT_BREAK_MINUTES_RANGE: (u32, u32) = (3, 10);
/// Accepted long break range in minutes.
pub const LONG_BREAK_MINUTES_RANGE: (u32, u32) = (10, 30);
/// Accepted number of work sessions per cycle.
pub const POMODOROS_UNTIL_LONG_BREAK_RANGE: (u32, u32) = (2, 6);

/// Configuration for the Pomodoro timer.
///
/// Durations are in minutes; the engine converts them to seconds. Every
/// field falls back to its default when missing from a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Work duration in minutes
    #[serde(rename = "work_duration")]
    pub work_minutes: u32,
    /// Short break duration in minutes
    #[serde(rename = "short_break_duration")]
    pub short_break_minutes: u32,
    /// Long break duration in minutes
    #[serde(rename = "long_break_duration")]
    pub long_break_minutes: u32,
    /// Work sessions per cycle before a long break
    pub pomodoros_until_long_break: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            pomodoros_until_long_break: 4,
        }
    }
}

impl TimerConfig {
    /// Creates a new configuration with the specified work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified cycle length.
    pub fn with_pomodoros_until_long_break(mut self, count: u32) -> Self {
        self.pomodoros_until_long_break = count;
        self
    }

    /// Validates the configuration against the ranges offered in settings.
    ///
    /// The engine itself accepts any value; this check belongs to whoever
    /// collects settings from the user.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("work_duration", self.work_minutes, WORK_MINUTES_RANGE)?;
        check_range(
            "short_break_duration",
            self.short_break_minutes,
            SHORT_BREAK_MINUTES_RANGE,
        )?;
        check_range(
            "long_break_duration",
            self.long_break_minutes,
            LONG_BREAK_MINUTES_RANGE,
        )?;
        check_range(
            "pomodoros_until_long_break",
            self.pomodoros_until_long_break,
            POMODOROS_UNTIL_LONG_BREAK_RANGE,
        )
    }
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

// ============================================================================
// DurationUpdate
// ============================================================================

/// A partial configuration change; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationUpdate {
    /// New work duration in minutes
    pub work_minutes: Option<u32>,
    /// New short break duration in minutes
    pub short_break_minutes: Option<u32>,
    /// New long break duration in minutes
    pub long_break_minutes: Option<u32>,
    /// New cycle length
    pub pomodoros_until_long_break: Option<u32>,
}

impl DurationUpdate {
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = Some(minutes);
        self
    }

    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = Some(minutes);
        self
    }

    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = Some(minutes);
        self
    }

    pub fn with_pomodoros_until_long_break(mut self, count: u32) -> Self {
        self.pomodoros_until_long_break = Some(count);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the set fields into `config`.
    pub fn apply_to(&self, config: &mut TimerConfig) {
        if let Some(minutes) = self.work_minutes {
            config.work_minutes = minutes;
        }
        if let Some(minutes) = self.short_break_minutes {
            config.short_break_minutes = minutes;
        }
        if let Some(minutes) = self.long_break_minutes {
            config.long_break_minutes = minutes;
        }
        if let Some(count) = self.pomodoros_until_long_break {
            config.pomodoros_until_long_break = count;
        }
    }
}

impl From<&TimerConfig> for DurationUpdate {
    fn from(config: &TimerConfig) -> Self {
        Self {
            work_minutes: Some(config.work_minutes),
            short_break_minutes: Some(config.short_break_minutes),
            long_break_minutes: Some(config.long_break_minutes),
            pomodoros_until_long_break: Some(config.pomodoros_until_long_break),
        }
    }
}

// ============================================================================
// SessionInfo
// ============================================================================

/// Point-in-time snapshot of the timer, as consumed by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Current phase
    pub state: Phase,
    /// Work sessions completed in the current cycle
    pub current_pomodoro: u32,
    /// Cycle length
    pub pomodoros_until_long_break: u32,
    /// Work sessions completed since the last daily reset
    pub completed_today: u32,
    pub remaining_seconds: u32,
    pub elapsed_seconds: u32,
    pub total_seconds: u32,
    /// Fraction of the current interval already elapsed
    pub progress: f64,
}

// ============================================================================
// TimerState
// ============================================================================

/// Steps of the automatic transition at the end of an interval, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    CreditSession,
    EnterBreak,
    AnnounceCycle(u32),
    AnnounceBreak,
    EndBreak,
}

/// The timer state machine.
///
/// Commands return the events they produced (or `None` when the command is
/// not allowed in the current phase) so the caller can deliver them after
/// releasing whatever lock guards the state.
///
/// The clock is driven in two parts: [`TimerState::advance`] counts one
/// second, then [`TimerState::complete_step`] is called until it returns
/// `None`. Each completion step changes the state and yields exactly one
/// event, so the caller can deliver it before the next step runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    phase: Phase,
    /// Phase interrupted by the current pause
    pre_pause_phase: Option<Phase>,
    total_seconds: u32,
    elapsed_seconds: u32,
    work_seconds: u32,
    short_break_seconds: u32,
    long_break_seconds: u32,
    pomodoros_until_long_break: u32,
    current_pomodoro: u32,
    completed_pomodoros_today: u32,
    /// True from `start` until `stop` or the end of a break
    running: bool,
    /// Next step of an interval that has run out
    completion: Option<Completion>,
}

impl TimerState {
    /// Creates a new TimerState in the idle phase.
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            phase: Phase::Idle,
            pre_pause_phase: None,
            total_seconds: 0,
            elapsed_seconds: 0,
            work_seconds: minutes_to_seconds(config.work_minutes),
            short_break_seconds: minutes_to_seconds(config.short_break_minutes),
            long_break_seconds: minutes_to_seconds(config.long_break_minutes),
            pomodoros_until_long_break: config.pomodoros_until_long_break,
            current_pomodoro: 0,
            completed_pomodoros_today: 0,
            running: false,
            completion: None,
        }
    }

    /// Starts a work session. Only allowed while not running.
    pub fn start(&mut self) -> Option<Vec<TimerEvent>> {
        if self.running {
            return None;
        }
        self.running = true;
        self.pre_pause_phase = None;
        self.begin_interval(self.work_seconds);
        Some(self.change_phase(Phase::Work).into_iter().collect())
    }

    /// Suspends the active work session or break.
    pub fn pause(&mut self) -> Option<Vec<TimerEvent>> {
        if !self.running || !self.phase.is_active() {
            return None;
        }
        self.pre_pause_phase = Some(self.phase);
        Some(self.change_phase(Phase::Paused).into_iter().collect())
    }

    /// Restores the phase that was active before the pause.
    pub fn resume(&mut self) -> Option<Vec<TimerEvent>> {
        if !self.running || self.phase != Phase::Paused {
            return None;
        }
        let previous = self.pre_pause_phase.take()?;
        Some(self.change_phase(previous).into_iter().collect())
    }

    /// Forces the current interval to complete on the next tick.
    pub fn skip(&mut self) -> bool {
        if !self.running || !self.phase.is_active() {
            return false;
        }
        self.elapsed_seconds = self.total_seconds;
        true
    }

    /// Returns to idle and zeroes the timing counters.
    ///
    /// Cycle and daily counters are preserved.
    pub fn stop(&mut self) -> Option<Vec<TimerEvent>> {
        if !self.running {
            return None;
        }
        self.running = false;
        self.pre_pause_phase = None;
        self.begin_interval(0);
        Some(self.change_phase(Phase::Idle).into_iter().collect())
    }

    /// Advances the clock by one second.
    ///
    /// Returns the tick, or nothing while idle or paused. When the interval
    /// runs out, the completion is queued for [`TimerState::complete_step`].
    pub fn advance(&mut self) -> Option<TimerEvent> {
        if !self.running || !self.phase.is_active() {
            return None;
        }
        self.elapsed_seconds = self
            .elapsed_seconds
            .saturating_add(1)
            .min(self.total_seconds);

        let remaining_seconds = self.remaining_seconds();
        if remaining_seconds == 0 && self.completion.is_none() {
            self.completion = Some(if self.phase == Phase::Work {
                Completion::CreditSession
            } else {
                Completion::AnnounceBreak
            });
        }
        Some(TimerEvent::Tick { remaining_seconds })
    }

    /// Applies the next step of a queued completion and returns its event.
    ///
    /// Returns `None` when nothing is queued, or when the phase the step
    /// belongs to was left (for example paused) since the step was queued.
    /// A step held back by a pause runs after the next tick instead.
    pub fn complete_step(&mut self) -> Option<TimerEvent> {
        let step = self.completion?;
        let in_phase = match step {
            Completion::CreditSession | Completion::EnterBreak => self.phase == Phase::Work,
            Completion::AnnounceBreak | Completion::EndBreak => self.phase.is_break(),
            Completion::AnnounceCycle(_) => true,
        };
        if !in_phase {
            return None;
        }

        self.completion = None;
        match step {
            Completion::CreditSession => {
                self.current_pomodoro = self.current_pomodoro.saturating_add(1);
                self.completed_pomodoros_today = self.completed_pomodoros_today.saturating_add(1);
                self.completion = Some(Completion::EnterBreak);
                Some(TimerEvent::SessionComplete {
                    completed: self.current_pomodoro,
                })
            }
            Completion::EnterBreak => {
                if self.current_pomodoro >= self.pomodoros_until_long_break {
                    let completed = self.current_pomodoro;
                    self.current_pomodoro = 0;
                    let event = self.begin_break(Phase::LongBreak);
                    self.completion = Some(Completion::AnnounceCycle(completed));
                    event
                } else {
                    self.begin_break(Phase::ShortBreak)
                }
            }
            Completion::AnnounceCycle(completed) => Some(TimerEvent::CycleComplete { completed }),
            Completion::AnnounceBreak => {
                self.completion = Some(Completion::EndBreak);
                Some(TimerEvent::BreakComplete { phase: self.phase })
            }
            Completion::EndBreak => {
                // The next work session always needs an explicit start.
                self.running = false;
                self.begin_interval(0);
                self.change_phase(Phase::Idle)
            }
        }
    }

    fn begin_break(&mut self, phase: Phase) -> Option<TimerEvent> {
        let seconds = if phase == Phase::LongBreak {
            self.long_break_seconds
        } else {
            self.short_break_seconds
        };
        self.begin_interval(seconds);
        self.change_phase(phase)
    }

    fn begin_interval(&mut self, total_seconds: u32) {
        self.total_seconds = total_seconds;
        self.elapsed_seconds = 0;
        self.completion = None;
    }

    fn change_phase(&mut self, to: Phase) -> Option<TimerEvent> {
        let from = self.phase;
        self.phase = to;
        (from != to).then_some(TimerEvent::StateChange { from, to })
    }

    /// Applies new durations; the interval in progress keeps its length.
    pub fn update_durations(&mut self, update: &DurationUpdate) {
        if let Some(minutes) = update.work_minutes {
            self.work_seconds = minutes_to_seconds(minutes);
        }
        if let Some(minutes) = update.short_break_minutes {
            self.short_break_seconds = minutes_to_seconds(minutes);
        }
        if let Some(minutes) = update.long_break_minutes {
            self.long_break_seconds = minutes_to_seconds(minutes);
        }
        if let Some(count) = update.pomodoros_until_long_break {
            self.pomodoros_until_long_break = count;
            self.current_pomodoro = self.current_pomodoro.min(count);
        }
    }

    /// Zeroes the daily counter and nothing else.
    pub fn reset_daily_stats(&mut self) {
        self.completed_pomodoros_today = 0;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Phase to restore on resume; `None` unless paused.
    pub fn pre_pause_phase(&self) -> Option<Phase> {
        self.pre_pause_phase
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.total_seconds.saturating_sub(self.elapsed_seconds)
    }

    /// Progress through the current interval in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        calculate_progress(self.elapsed_seconds, self.total_seconds)
    }

    pub fn work_seconds(&self) -> u32 {
        self.work_seconds
    }

    pub fn short_break_seconds(&self) -> u32 {
        self.short_break_seconds
    }

    pub fn long_break_seconds(&self) -> u32 {
        self.long_break_seconds
    }

    pub fn pomodoros_until_long_break(&self) -> u32 {
        self.pomodoros_until_long_break
    }

    pub fn current_pomodoro(&self) -> u32 {
        self.current_pomodoro
    }

    pub fn completed_pomodoros_today(&self) -> u32 {
        self.completed_pomodoros_today
    }

    /// Returns true while a session (including a paused one) is in progress.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    /// Captures the renderer-facing snapshot.
    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            state: self.phase,
            current_pomodoro: self.current_pomodoro,
            pomodoros_until_long_break: self.pomodoros_until_long_break,
            completed_today: self.completed_pomodoros_today,
            remaining_seconds: self.remaining_seconds(),
            elapsed_seconds: self.elapsed_seconds,
            total_seconds: self.total_seconds,
            progress: self.progress(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn one_minute_config() -> TimerConfig {
        TimerConfig {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 2,
            pomodoros_until_long_break: 2,
        }
    }

    impl TimerState {
        /// One second with its completion run to the end, as the engine does
        /// when no listener intervenes.
        fn tick(&mut self) -> Vec<TimerEvent> {
            let mut events: Vec<TimerEvent> = self.advance().into_iter().collect();
            while let Some(event) = self.complete_step() {
                events.push(event);
            }
            events
        }
    }

    /// Ticks until the current interval completes, returning every event.
    fn run_out(state: &mut TimerState) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        let phase = state.phase();
        while state.phase() == phase && state.is_running() {
            events.extend(state.tick());
        }
        events
    }

    fn assert_invariants(state: &TimerState) {
        assert!(state.elapsed_seconds() <= state.total_seconds());
        assert_eq!(
            state.remaining_seconds() + state.elapsed_seconds(),
            state.total_seconds()
        );
        assert!(state.current_pomodoro() <= state.pomodoros_until_long_break());
    }

    // ------------------------------------------------------------------------
    // Phase Tests
    // ------------------------------------------------------------------------

    mod phase_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(Phase::default(), Phase::Idle);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(Phase::Idle.as_str(), "IDLE");
            assert_eq!(Phase::Work.as_str(), "WORK");
            assert_eq!(Phase::ShortBreak.as_str(), "SHORT_BREAK");
            assert_eq!(Phase::LongBreak.as_str(), "LONG_BREAK");
            assert_eq!(Phase::Paused.as_str(), "PAUSED");
        }

        #[test]
        fn test_display_name() {
            assert_eq!(Phase::Work.display_name(), "FOCUS TIME");
            assert_eq!(Phase::ShortBreak.display_name(), "SHORT BREAK");
            assert_eq!(Phase::LongBreak.display_name(), "LONG BREAK");
            assert_eq!(Phase::Idle.display_name(), "READY");
            assert_eq!(Phase::Paused.display_name(), "PAUSED");
        }

        #[test]
        fn test_is_active_and_is_break() {
            assert!(!Phase::Idle.is_active());
            assert!(Phase::Work.is_active());
            assert!(Phase::ShortBreak.is_active());
            assert!(Phase::LongBreak.is_active());
            assert!(!Phase::Paused.is_active());

            assert!(Phase::ShortBreak.is_break());
            assert!(Phase::LongBreak.is_break());
            assert!(!Phase::Work.is_break());
        }

        #[test]
        fn test_serialize_uses_machine_names() {
            let json = serde_json::to_string(&Phase::ShortBreak).unwrap();
            assert_eq!(json, "\"SHORT_BREAK\"");

            let phase: Phase = serde_json::from_str("\"LONG_BREAK\"").unwrap();
            assert_eq!(phase, Phase::LongBreak);
        }
    }

    // ------------------------------------------------------------------------
    // TimerConfig Tests
    // ------------------------------------------------------------------------

    mod timer_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = TimerConfig::default();
            assert_eq!(config.work_minutes, 25);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.long_break_minutes, 15);
            assert_eq!(config.pomodoros_until_long_break, 4);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_builder_pattern() {
            let config = TimerConfig::default()
                .with_work_minutes(30)
                .with_short_break_minutes(10)
                .with_long_break_minutes(20)
                .with_pomodoros_until_long_break(3);

            assert_eq!(config.work_minutes, 30);
            assert_eq!(config.short_break_minutes, 10);
            assert_eq!(config.long_break_minutes, 20);
            assert_eq!(config.pomodoros_until_long_break, 3);
        }

        #[test]
        fn test_validate_boundary_values() {
            let low = TimerConfig {
                work_minutes: 15,
                short_break_minutes: 3,
                long_break_minutes: 10,
                pomodoros_until_long_break: 2,
            };
            assert!(low.validate().is_ok());

            let high = TimerConfig {
                work_minutes: 45,
                short_break_minutes: 10,
                long_break_minutes: 30,
                pomodoros_until_long_break: 6,
            };
            assert!(high.validate().is_ok());
        }

        #[test]
        fn test_validate_reports_offending_field() {
            let err = TimerConfig::default()
                .with_work_minutes(46)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::OutOfRange {
                    field: "work_duration",
                    value: 46,
                    min: 15,
                    max: 45,
                }
            ));

            let err = TimerConfig::default()
                .with_short_break_minutes(2)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::OutOfRange {
                    field: "short_break_duration",
                    ..
                }
            ));

            let err = TimerConfig::default()
                .with_long_break_minutes(31)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::OutOfRange {
                    field: "long_break_duration",
                    ..
                }
            ));

            let err = TimerConfig::default()
                .with_pomodoros_until_long_break(1)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::OutOfRange {
                    field: "pomodoros_until_long_break",
                    ..
                }
            ));
        }

        #[test]
        fn test_deserialize_partial_table_uses_defaults() {
            let config: TimerConfig = toml::from_str("work_duration = 30").unwrap();
            assert_eq!(config.work_minutes, 30);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.pomodoros_until_long_break, 4);
        }

        #[test]
        fn test_serialize_uses_settings_keys() {
            let text = toml::to_string(&TimerConfig::default()).unwrap();
            assert!(text.contains("work_duration = 25"));
            assert!(text.contains("short_break_duration = 5"));
            assert!(text.contains("long_break_duration = 15"));
            assert!(text.contains("pomodoros_until_long_break = 4"));
        }
    }

    // ------------------------------------------------------------------------
    // DurationUpdate Tests
    // ------------------------------------------------------------------------

    mod duration_update_tests {
        use super::*;

        #[test]
        fn test_default_is_empty() {
            assert!(DurationUpdate::default().is_empty());
            assert!(!DurationUpdate::default().with_work_minutes(30).is_empty());
        }

        #[test]
        fn test_apply_to_only_touches_set_fields() {
            let mut config = TimerConfig::default();
            DurationUpdate::default()
                .with_short_break_minutes(7)
                .with_pomodoros_until_long_break(3)
                .apply_to(&mut config);

            assert_eq!(config.work_minutes, 25);
            assert_eq!(config.short_break_minutes, 7);
            assert_eq!(config.long_break_minutes, 15);
            assert_eq!(config.pomodoros_until_long_break, 3);
        }

        #[test]
        fn test_from_config_sets_every_field() {
            let config = one_minute_config();
            let mut target = TimerConfig::default();
            DurationUpdate::from(&config).apply_to(&mut target);
            assert_eq!(target, config);
        }
    }

    // ------------------------------------------------------------------------
    // TimerState Tests
    // ------------------------------------------------------------------------

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_new_state() {
            let state = TimerState::new(&TimerConfig::default());

            assert_eq!(state.phase(), Phase::Idle);
            assert!(!state.is_running());
            assert_eq!(state.total_seconds(), 0);
            assert_eq!(state.remaining_seconds(), 0);
            assert_eq!(state.work_seconds(), 1500);
            assert_eq!(state.short_break_seconds(), 300);
            assert_eq!(state.long_break_seconds(), 900);
            assert_eq!(state.current_pomodoro(), 0);
            assert_eq!(state.completed_pomodoros_today(), 0);
        }

        #[test]
        fn test_start() {
            let mut state = TimerState::new(&one_minute_config());

            let events = state.start().unwrap();

            assert_eq!(
                events,
                vec![TimerEvent::StateChange {
                    from: Phase::Idle,
                    to: Phase::Work
                }]
            );
            assert_eq!(state.phase(), Phase::Work);
            assert!(state.is_running());
            assert_eq!(state.total_seconds(), 60);
            assert_eq!(state.remaining_seconds(), 60);
            assert_eq!(state.elapsed_seconds(), 0);
        }

        #[test]
        fn test_start_while_running_is_rejected() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.tick();

            assert!(state.start().is_none());
            assert_eq!(state.elapsed_seconds(), 1);

            state.pause();
            assert!(state.start().is_none());
            assert_eq!(state.phase(), Phase::Paused);
        }

        #[test]
        fn test_pause_and_resume_restore_phase() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.tick();
            state.tick();

            let events = state.pause().unwrap();
            assert_eq!(
                events,
                vec![TimerEvent::StateChange {
                    from: Phase::Work,
                    to: Phase::Paused
                }]
            );
            assert_eq!(state.pre_pause_phase(), Some(Phase::Work));

            let events = state.resume().unwrap();
            assert_eq!(
                events,
                vec![TimerEvent::StateChange {
                    from: Phase::Paused,
                    to: Phase::Work
                }]
            );
            assert_eq!(state.phase(), Phase::Work);
            assert_eq!(state.pre_pause_phase(), None);
            assert_eq!(state.elapsed_seconds(), 2);
        }

        #[test]
        fn test_pause_during_break_resumes_break() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.skip();
            state.tick();
            assert_eq!(state.phase(), Phase::ShortBreak);

            state.pause().unwrap();
            state.resume().unwrap();
            assert_eq!(state.phase(), Phase::ShortBreak);
        }

        #[test]
        fn test_rejected_commands_from_idle() {
            let mut state = TimerState::new(&one_minute_config());

            assert!(state.pause().is_none());
            assert!(state.resume().is_none());
            assert!(!state.skip());
            assert!(state.stop().is_none());
            assert_eq!(state.phase(), Phase::Idle);
        }

        #[test]
        fn test_double_pause_and_resume_without_pause() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();

            assert!(state.resume().is_none());
            assert!(state.pause().is_some());
            assert!(state.pause().is_none());
            assert!(!state.skip());
            assert_eq!(state.phase(), Phase::Paused);
        }

        #[test]
        fn test_tick_counts_one_second() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();

            let events = state.tick();

            assert_eq!(
                events,
                vec![TimerEvent::Tick {
                    remaining_seconds: 59
                }]
            );
            assert_eq!(state.elapsed_seconds(), 1);
            assert_invariants(&state);
        }

        #[test]
        fn test_tick_while_paused_or_idle_does_nothing() {
            let mut state = TimerState::new(&one_minute_config());
            assert!(state.tick().is_empty());

            state.start();
            state.pause();
            assert!(state.tick().is_empty());
            assert!(state.tick().is_empty());
            assert_eq!(state.elapsed_seconds(), 0);
        }

        #[test]
        fn test_skip_completes_on_next_tick() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();

            assert!(state.skip());
            assert_eq!(state.elapsed_seconds(), 60);
            assert_eq!(state.remaining_seconds(), 0);
            assert_eq!(state.phase(), Phase::Work);
            assert_invariants(&state);

            let events = state.tick();
            assert_eq!(
                events,
                vec![
                    TimerEvent::Tick {
                        remaining_seconds: 0
                    },
                    TimerEvent::SessionComplete { completed: 1 },
                    TimerEvent::StateChange {
                        from: Phase::Work,
                        to: Phase::ShortBreak
                    },
                ]
            );
            assert_eq!(state.phase(), Phase::ShortBreak);
            assert_eq!(state.total_seconds(), 60);
            assert_eq!(state.elapsed_seconds(), 0);
            assert_eq!(state.current_pomodoro(), 1);
            assert_eq!(state.completed_pomodoros_today(), 1);
        }

        #[test]
        fn test_work_runs_out_into_short_break() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();

            let events = run_out(&mut state);

            let ticks = events
                .iter()
                .filter(|e| matches!(e, TimerEvent::Tick { .. }))
                .count();
            assert_eq!(ticks, 60);
            assert_eq!(state.phase(), Phase::ShortBreak);
        }

        #[test]
        fn test_break_completion_returns_to_idle() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.skip();
            state.tick();

            state.skip();
            let events = state.tick();

            assert_eq!(
                events,
                vec![
                    TimerEvent::Tick {
                        remaining_seconds: 0
                    },
                    TimerEvent::BreakComplete {
                        phase: Phase::ShortBreak
                    },
                    TimerEvent::StateChange {
                        from: Phase::ShortBreak,
                        to: Phase::Idle
                    },
                ]
            );
            assert_eq!(state.phase(), Phase::Idle);
            assert!(!state.is_running());
            assert_eq!(state.total_seconds(), 0);
            assert_eq!(state.current_pomodoro(), 1);
        }

        #[test]
        fn test_cycle_completion_triggers_long_break() {
            let mut state = TimerState::new(&one_minute_config());

            // First pomodoro and its short break
            state.start();
            state.skip();
            state.tick();
            state.skip();
            state.tick();

            // Second pomodoro completes the cycle
            state.start();
            state.skip();
            let events = state.tick();

            assert_eq!(
                events,
                vec![
                    TimerEvent::Tick {
                        remaining_seconds: 0
                    },
                    TimerEvent::SessionComplete { completed: 2 },
                    TimerEvent::StateChange {
                        from: Phase::Work,
                        to: Phase::LongBreak
                    },
                    TimerEvent::CycleComplete { completed: 2 },
                ]
            );
            assert_eq!(state.phase(), Phase::LongBreak);
            assert_eq!(state.total_seconds(), 120);
            assert_eq!(state.current_pomodoro(), 0);
            assert_eq!(state.completed_pomodoros_today(), 2);

            state.skip();
            let events = state.tick();
            assert!(events.contains(&TimerEvent::BreakComplete {
                phase: Phase::LongBreak
            }));
            assert_eq!(state.phase(), Phase::Idle);
            assert_eq!(state.current_pomodoro(), 0);
        }

        #[test]
        fn test_completion_waits_for_its_tick_to_be_delivered() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.skip();

            assert_eq!(
                state.advance(),
                Some(TimerEvent::Tick {
                    remaining_seconds: 0
                })
            );
            assert_eq!(state.phase(), Phase::Work);
            assert_eq!(state.current_pomodoro(), 0);

            assert_eq!(
                state.complete_step(),
                Some(TimerEvent::SessionComplete { completed: 1 })
            );
            assert_eq!(state.phase(), Phase::Work);
            assert_eq!(
                state.complete_step(),
                Some(TimerEvent::StateChange {
                    from: Phase::Work,
                    to: Phase::ShortBreak
                })
            );
            assert_eq!(state.complete_step(), None);
        }

        #[test]
        fn test_pause_after_final_tick_holds_completion() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.skip();
            state.advance();

            state.pause().unwrap();
            assert_eq!(state.complete_step(), None);
            assert_eq!(state.current_pomodoro(), 0);

            state.resume().unwrap();
            let events = state.tick();

            assert_eq!(
                events,
                vec![
                    TimerEvent::Tick {
                        remaining_seconds: 0
                    },
                    TimerEvent::SessionComplete { completed: 1 },
                    TimerEvent::StateChange {
                        from: Phase::Work,
                        to: Phase::ShortBreak
                    },
                ]
            );
        }

        #[test]
        fn test_pause_between_steps_does_not_credit_twice() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.skip();
            state.advance();
            state.complete_step();

            state.pause().unwrap();
            assert_eq!(state.complete_step(), None);
            state.resume().unwrap();
            state.tick();

            assert_eq!(state.phase(), Phase::ShortBreak);
            assert_eq!(state.current_pomodoro(), 1);
            assert_eq!(state.completed_pomodoros_today(), 1);
        }

        #[test]
        fn test_stop_between_steps_drops_completion() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.skip();
            state.tick();
            state.skip();
            state.advance();
            assert!(matches!(
                state.complete_step(),
                Some(TimerEvent::BreakComplete { .. })
            ));

            state.stop().unwrap();
            state.start().unwrap();

            assert_eq!(state.complete_step(), None);
            assert_eq!(state.phase(), Phase::Work);
        }

        #[test]
        fn test_invariants_hold_across_full_cycles() {
            let config = TimerConfig {
                work_minutes: 1,
                short_break_minutes: 1,
                long_break_minutes: 1,
                pomodoros_until_long_break: 3,
            };
            let mut state = TimerState::new(&config);
            let mut cycles = 0;

            for _ in 0..6 {
                state.start().unwrap();
                while state.is_running() {
                    for event in state.tick() {
                        if matches!(event, TimerEvent::CycleComplete { .. }) {
                            cycles += 1;
                        }
                    }
                    assert_invariants(&state);
                }
            }

            assert_eq!(cycles, 2);
            assert_eq!(state.completed_pomodoros_today(), 6);
            assert_eq!(state.current_pomodoro(), 0);
        }

        #[test]
        fn test_stop_zeroes_timing_but_keeps_counters() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.skip();
            state.tick();
            state.tick();

            let events = state.stop().unwrap();

            assert_eq!(
                events,
                vec![TimerEvent::StateChange {
                    from: Phase::ShortBreak,
                    to: Phase::Idle
                }]
            );
            assert_eq!(state.phase(), Phase::Idle);
            assert_eq!(state.total_seconds(), 0);
            assert_eq!(state.elapsed_seconds(), 0);
            assert_eq!(state.remaining_seconds(), 0);
            assert_eq!(state.current_pomodoro(), 1);
            assert_eq!(state.completed_pomodoros_today(), 1);
            assert!(state.stop().is_none());
        }

        #[test]
        fn test_stop_from_paused_forgets_pre_pause_phase() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.pause();

            state.stop().unwrap();

            assert_eq!(state.phase(), Phase::Idle);
            assert_eq!(state.pre_pause_phase(), None);
        }

        #[test]
        fn test_update_durations_keeps_current_interval() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.tick();

            state.update_durations(
                &DurationUpdate::default()
                    .with_work_minutes(2)
                    .with_short_break_minutes(3)
                    .with_long_break_minutes(4),
            );

            assert_eq!(state.total_seconds(), 60);
            assert_eq!(state.remaining_seconds(), 59);
            assert_eq!(state.work_seconds(), 120);
            assert_eq!(state.short_break_seconds(), 180);
            assert_eq!(state.long_break_seconds(), 240);

            state.skip();
            state.tick();
            assert_eq!(state.total_seconds(), 180);
        }

        #[test]
        fn test_lowering_cycle_length_clamps_current_pomodoro() {
            let config = one_minute_config().with_pomodoros_until_long_break(4);
            let mut state = TimerState::new(&config);
            for _ in 0..3 {
                state.start();
                state.skip();
                state.tick();
                state.stop();
            }
            assert_eq!(state.current_pomodoro(), 3);

            state.update_durations(&DurationUpdate::default().with_pomodoros_until_long_break(2));

            assert_eq!(state.current_pomodoro(), 2);
            assert_invariants(&state);
        }

        #[test]
        fn test_reset_daily_stats_only_touches_daily_counter() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            state.skip();
            state.tick();
            let before = state.clone();

            state.reset_daily_stats();

            assert_eq!(state.completed_pomodoros_today(), 0);
            assert_eq!(state.current_pomodoro(), before.current_pomodoro());
            assert_eq!(state.phase(), before.phase());
            assert_eq!(state.elapsed_seconds(), before.elapsed_seconds());
        }

        #[test]
        fn test_zero_length_interval_completes_on_first_tick() {
            let config = TimerConfig {
                work_minutes: 0,
                short_break_minutes: 0,
                long_break_minutes: 0,
                pomodoros_until_long_break: 0,
            };
            let mut state = TimerState::new(&config);
            state.start();
            assert_eq!(state.progress(), 0.0);

            let events = state.tick();

            assert!(events.contains(&TimerEvent::CycleComplete { completed: 1 }));
            assert_eq!(state.phase(), Phase::LongBreak);
            assert_invariants(&state);
        }

        #[test]
        fn test_session_info_snapshot() {
            let mut state = TimerState::new(&one_minute_config());
            state.start();
            for _ in 0..15 {
                state.tick();
            }

            let info = state.session_info();

            assert_eq!(info.state, Phase::Work);
            assert_eq!(info.current_pomodoro, 0);
            assert_eq!(info.pomodoros_until_long_break, 2);
            assert_eq!(info.completed_today, 0);
            assert_eq!(info.remaining_seconds, 45);
            assert_eq!(info.elapsed_seconds, 15);
            assert_eq!(info.total_seconds, 60);
            assert_eq!(info.progress, 0.25);
        }

        #[test]
        fn test_session_info_serialize() {
            let state = TimerState::new(&one_minute_config());
            let json = serde_json::to_string(&state.session_info()).unwrap();

            assert!(json.contains("\"state\":\"IDLE\""));
            assert!(json.contains("\"completed_today\":0"));
            assert!(json.contains("\"progress\":0.0"));
        }
    }
}
