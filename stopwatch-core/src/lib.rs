//! Pure timing logic library with no platform dependencies.
//! Time is handed in by the caller or read from a [`Clock`], so everything
//! here is testable on host.

mod clock;
mod shared;
mod stopwatch;

use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use shared::SharedStopwatch;
pub use stopwatch::{Lap, Stopwatch};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Stopped,
    Running,
}

/// Accumulating start/pause state machine.
///
/// `now` is a monotonic offset from some fixed origin; only differences
/// between readings matter.
#[derive(Clone, Debug)]
pub struct TimerCore {
    pub state: TimerState,
    accumulated: Duration,
    segment_start: Duration,
}

impl Default for TimerCore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerCore {
    pub fn new() -> Self {
        Self {
            state: TimerState::Stopped,
            accumulated: Duration::ZERO,
            segment_start: Duration::ZERO,
        }
    }

    pub fn start(&mut self, now: Duration) {
        if self.state == TimerState::Running {
            return;
        }
        self.segment_start = now;
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self, now: Duration) {
        if self.state != TimerState::Running {
            return;
        }
        self.accumulated += now.saturating_sub(self.segment_start);
        self.state = TimerState::Stopped;
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.segment_start = Duration::ZERO;
        self.state = TimerState::Stopped;
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        match self.state {
            TimerState::Running => self.accumulated + now.saturating_sub(self.segment_start),
            TimerState::Stopped => self.accumulated,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }
}

/// Whole milliseconds in `d`, truncated.
pub fn elapsed_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Format milliseconds as "MM:SS.hh", or "HH:MM:SS.hh" once an hour has passed.
///
/// Hundredths are truncated, not rounded. Hours are neither wrapped nor
/// clamped: past 99 the field just gets wider.
pub fn format_clock(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1000) % 60;
    let hundredths = (ms % 1000) / 10;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, hundredths)
    } else {
        format!("{:02}:{:02}.{:02}", minutes, seconds, hundredths)
    }
}

pub fn format_duration(d: Duration) -> String {
    format_clock(elapsed_ms(d))
}
