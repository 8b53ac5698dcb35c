use std::fmt;
use std::time::Duration;

use crate::{format_duration, Clock, SystemClock, TimerCore, TimerState};

/// Snapshot of elapsed time taken by [`Stopwatch::record_lap`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lap {
    /// 1-based position in the lap list.
    pub number: usize,
    /// Total elapsed time when the lap was recorded.
    pub elapsed: Duration,
    /// Time since the previous lap, or since zero for the first one.
    pub split: Duration,
}

impl fmt::Display for Lap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lap {} — {}", self.number, format_duration(self.elapsed))
    }
}

/// Session stopwatch: a [`TimerCore`] driven by a [`Clock`], plus its laps.
#[derive(Debug)]
pub struct Stopwatch<C = SystemClock> {
    timer: TimerCore,
    laps: Vec<Lap>,
    clock: C,
}

impl Stopwatch<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for Stopwatch<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Stopwatch<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            timer: TimerCore::new(),
            laps: Vec::new(),
            clock,
        }
    }

    pub fn start(&mut self) {
        let now = self.clock.now();
        self.timer.start(now);
    }

    pub fn pause(&mut self) {
        let now = self.clock.now();
        self.timer.pause(now);
    }

    /// Start if stopped, pause if running. Returns the new state.
    pub fn toggle(&mut self) -> TimerState {
        match self.timer.state {
            TimerState::Stopped => self.start(),
            TimerState::Running => self.pause(),
        }
        self.timer.state
    }

    pub fn reset(&mut self) {
        self.timer.reset();
        self.laps.clear();
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed(self.clock.now())
    }

    /// Appends the current elapsed time as a new lap. Works in any state;
    /// while paused it records the frozen value.
    pub fn record_lap(&mut self) -> Lap {
        let elapsed = self.elapsed();
        let previous = self.laps.last().map_or(Duration::ZERO, |lap| lap.elapsed);
        let lap = Lap {
            number: self.laps.len() + 1,
            elapsed,
            split: elapsed.saturating_sub(previous),
        };
        self.laps.push(lap);
        lap
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn last_lap(&self) -> Option<&Lap> {
        self.laps.last()
    }

    pub fn state(&self) -> TimerState {
        self.timer.state
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// The clock driving this stopwatch, for callers timing things against it.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
