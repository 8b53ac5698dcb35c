use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Everything the main loop reacts to, funnelled through one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Redraw,
    Pump,
    InputFailed(String),
}

impl AppEvent {
    /// Maps a terminal event, dropping the ones the app ignores.
    /// Only key presses count; release and repeat would double up on Windows.
    fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Key(_) => None,
            Event::Resize(_, _) | Event::FocusGained => Some(AppEvent::Redraw),
            _ => None,
        }
    }
}

/// Background thread forwarding terminal input to the main loop.
pub struct InputReader {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputReader {
    pub fn spawn(tx: Sender<AppEvent>, poll_timeout: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = std::thread::spawn(move || input_thread(tx, poll_timeout, flag));
        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("input thread panicked");
            }
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn input_thread(tx: Sender<AppEvent>, poll_timeout: Duration, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::SeqCst) {
        let next = event::poll(poll_timeout).and_then(|ready| {
            if ready {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        });
        let forwarded = match next {
            Ok(Some(e)) => match AppEvent::from_terminal(e) {
                Some(app_event) => tx.send(app_event),
                None => Ok(()),
            },
            Ok(None) => Ok(()),
            Err(e) => {
                log::error!("terminal input failed: {}", e);
                let _ = tx.send(AppEvent::InputFailed(e.to_string()));
                return;
            }
        };
        if forwarded.is_err() {
            // Main loop is gone
            return;
        }
    }
}
