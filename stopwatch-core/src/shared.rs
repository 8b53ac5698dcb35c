use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::{Clock, Lap, Stopwatch, SystemClock, TimerState};

/// Cloneable handle to one [`Stopwatch`]; every operation takes the lock,
/// so read-then-write sequences from different threads never interleave.
#[derive(Debug)]
pub struct SharedStopwatch<C = SystemClock> {
    inner: Arc<Mutex<Stopwatch<C>>>,
}

impl<C> Clone for SharedStopwatch<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> SharedStopwatch<C> {
    pub fn new(stopwatch: Stopwatch<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(stopwatch)),
        }
    }

    // Operations are total, so a panic elsewhere cannot leave the state invalid.
    fn lock(&self) -> MutexGuard<'_, Stopwatch<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self) {
        self.lock().start();
    }

    pub fn pause(&self) {
        self.lock().pause();
    }

    pub fn toggle(&self) -> TimerState {
        self.lock().toggle()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed()
    }

    pub fn record_lap(&self) -> Lap {
        self.lock().record_lap()
    }

    pub fn laps(&self) -> Vec<Lap> {
        self.lock().laps().to_vec()
    }

    pub fn state(&self) -> TimerState {
        self.lock().state()
    }
}
