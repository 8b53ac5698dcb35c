use std::time::Duration;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stopwatch_core::{elapsed_ms, format_clock, format_duration, Clock, Stopwatch, TimerState};

use crate::clipboard::Clipboard;
use crate::events::AppEvent;
use crate::pump::Pump;

const COPY_STATUS_TTL: Duration = Duration::from_millis(1200);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CopyStatus {
    Copied,
    Failed,
}

impl CopyStatus {
    pub fn label(self) -> &'static str {
        match self {
            CopyStatus::Copied => "Copied!",
            CopyStatus::Failed => "Failed",
        }
    }
}

pub struct StopwatchApp<C: Clock> {
    pub stopwatch: Stopwatch<C>,
    pump: Pump,
    tick: Duration,
    clipboard: Box<dyn Clipboard>,
    // Status and the clock reading it expires at
    copy_status: Option<(CopyStatus, Duration)>,

    pub lap_scroll_offset: usize,
    pub help_visible: bool,
    pub confirm_exit: bool,
    should_quit: bool,
}

impl<C: Clock> StopwatchApp<C> {
    pub fn new(
        stopwatch: Stopwatch<C>,
        pump: Pump,
        tick: Duration,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            stopwatch,
            pump,
            tick,
            clipboard,
            copy_status: None,
            lap_scroll_offset: 0,
            help_visible: false,
            confirm_exit: false,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Result of the last copy, while it is still worth showing.
    pub fn copy_status(&self) -> Option<CopyStatus> {
        let now = self.stopwatch.clock().now();
        self.copy_status
            .filter(|&(_, until)| now < until)
            .map(|(status, _)| status)
    }

    #[cfg(test)]
    pub fn pump_running(&self) -> bool {
        self.pump.is_running()
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Pump => self.handle_pump(),
            AppEvent::Redraw | AppEvent::InputFailed(_) => {}
        }
    }

    fn handle_pump(&mut self) {
        if self.copy_status.is_some() && self.copy_status().is_none() {
            self.copy_status = None;
        }
        // A tick can still be in flight after a pause
        self.settle_pump();
    }

    /// Stops refreshing once nothing on screen can change by itself.
    fn settle_pump(&mut self) {
        if !self.stopwatch.is_running() && self.copy_status.is_none() {
            self.pump.stop();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        // Help screen: any key dismisses it
        if self.help_visible {
            self.help_visible = false;
            return;
        }

        if self.confirm_exit {
            match key.code {
                KeyCode::Char('y') => self.quit(),
                KeyCode::Char('n') | KeyCode::Esc => self.confirm_exit = false,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::F(2) => self.toggle(),
            KeyCode::Char('l') => self.record_lap(),
            KeyCode::Char('r') | KeyCode::F(3) => self.reset(),
            KeyCode::Char('c') => self.copy_time(),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.lap_scroll_offset + 1 < self.stopwatch.laps().len() {
                    self.lap_scroll_offset += 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.lap_scroll_offset = self.lap_scroll_offset.saturating_sub(1);
            }
            KeyCode::Char('?') | KeyCode::F(1) => self.help_visible = true,
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::F(4) => {
                if self.stopwatch.is_running() {
                    self.confirm_exit = true;
                } else {
                    self.quit();
                }
            }
            _ => {}
        }
    }

    fn toggle(&mut self) {
        match self.stopwatch.toggle() {
            TimerState::Running => {
                log::info!("start at {}", format_duration(self.stopwatch.elapsed()));
                self.pump.start(self.tick);
            }
            TimerState::Stopped => {
                log::info!("pause at {}", format_duration(self.stopwatch.elapsed()));
                self.settle_pump();
            }
        }
    }

    fn record_lap(&mut self) {
        let lap = self.stopwatch.record_lap();
        // Keep the newest lap in view
        self.lap_scroll_offset = 0;
        log::info!("{}", lap);
    }

    fn reset(&mut self) {
        self.stopwatch.reset();
        self.settle_pump();
        self.lap_scroll_offset = 0;
        log::info!("reset");
    }

    fn copy_time(&mut self) {
        let text = format_clock(elapsed_ms(self.stopwatch.elapsed()));
        let status = match self.clipboard.set_text(&text) {
            Ok(()) => {
                log::info!("copied {}", text);
                CopyStatus::Copied
            }
            Err(e) => {
                log::error!("copy failed: {:#}", e);
                CopyStatus::Failed
            }
        };
        let until = self.stopwatch.clock().now() + COPY_STATUS_TTL;
        self.copy_status = Some((status, until));
        // Keep ticking so the status clears even while paused
        self.pump.start(self.tick);
    }

    fn quit(&mut self) {
        if self.stopwatch.is_running() {
            self.stopwatch.pause();
        }
        self.pump.stop();
        self.confirm_exit = false;
        self.should_quit = true;
        log::info!("quit at {}", format_duration(self.stopwatch.elapsed()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use pretty_assertions::assert_eq;
    use stopwatch_core::ManualClock;

    use super::*;
    use crate::clipboard::testing::{FailingClipboard, RecordingClipboard};

    fn app_with(clock: &ManualClock, clipboard: Box<dyn Clipboard>) -> StopwatchApp<ManualClock> {
        let (tx, _rx) = mpsc::channel();
        StopwatchApp::new(
            Stopwatch::with_clock(clock.clone()),
            Pump::spawn(tx),
            Duration::from_millis(25),
            clipboard,
        )
    }

    fn fixture() -> (ManualClock, StopwatchApp<ManualClock>) {
        let clock = ManualClock::new();
        let app = app_with(&clock, Box::new(RecordingClipboard::default()));
        (clock, app)
    }

    fn press(app: &mut StopwatchApp<ManualClock>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_enter_toggles_and_drives_pump() {
        let (clock, mut app) = fixture();

        press(&mut app, KeyCode::Enter);
        assert!(app.stopwatch.is_running());
        assert!(app.pump_running());

        clock.advance(Duration::from_millis(1500));
        press(&mut app, KeyCode::Char(' '));

        assert!(!app.stopwatch.is_running());
        assert!(!app.pump_running());
        assert_eq!(app.stopwatch.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn test_lap_in_any_state() {
        let (clock, mut app) = fixture();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::F(2));
        clock.advance(Duration::from_millis(400));
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char('l'));

        let actual: Vec<_> = app.stopwatch.laps().iter().map(|l| l.elapsed).collect();
        let expected = vec![
            Duration::ZERO,
            Duration::from_millis(400),
            Duration::from_millis(400),
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_reset_while_running() {
        let (clock, mut app) = fixture();
        press(&mut app, KeyCode::Enter);
        clock.advance(Duration::from_secs(3));
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('r'));

        assert_eq!(app.stopwatch.elapsed(), Duration::ZERO);
        assert!(app.stopwatch.laps().is_empty());
        assert!(!app.stopwatch.is_running());
        assert!(!app.pump_running());
    }

    #[test]
    fn test_quit_when_stopped() {
        let (_, mut app) = fixture();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_quit_while_running_asks_first() {
        let (_, mut app) = fixture();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.confirm_exit);
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Char('n'));
        assert!(!app.confirm_exit);
        assert!(app.stopwatch.is_running());

        press(&mut app, KeyCode::F(4));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit());
        assert!(!app.stopwatch.is_running());
        assert!(!app.pump_running());
    }

    #[test]
    fn test_ctrl_c_quits_immediately() {
        let (_, mut app) = fixture();
        press(&mut app, KeyCode::Enter);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (_, mut app) = fixture();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.help_visible);

        press(&mut app, KeyCode::Enter);
        assert!(!app.help_visible);
        assert!(!app.stopwatch.is_running());
    }

    #[test]
    fn test_lap_scroll_bounds() {
        let (_, mut app) = fixture();
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('l'));
        }
        for _ in 0..5 {
            press(&mut app, KeyCode::Up);
        }
        assert_eq!(app.lap_scroll_offset, 2);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.lap_scroll_offset, 1);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.lap_scroll_offset, 0);
    }

    #[test]
    fn test_stale_pump_tick_stops_pump() {
        let (_, mut app) = fixture();
        press(&mut app, KeyCode::Enter);
        app.handle_event(AppEvent::Pump);
        assert!(app.pump_running());

        app.stopwatch.pause();
        app.handle_event(AppEvent::Pump);
        assert!(!app.pump_running());
    }

    #[test]
    fn test_copy_time_copies_displayed_clock() {
        let clock = ManualClock::new();
        let clipboard = RecordingClipboard::default();
        let mut app = app_with(&clock, Box::new(clipboard.clone()));
        press(&mut app, KeyCode::Enter);
        clock.advance(Duration::from_millis(61_234));
        press(&mut app, KeyCode::Char('c'));

        let actual = clipboard.copied.lock().unwrap().clone();
        let expected = vec!["01:01.23".to_string()];
        assert_eq!(actual, expected);
        assert_eq!(app.copy_status(), Some(CopyStatus::Copied));
        assert!(app.stopwatch.is_running());
    }

    #[test]
    fn test_copy_status_expires() {
        let (clock, mut app) = fixture();
        press(&mut app, KeyCode::Char('c'));
        clock.advance(Duration::from_millis(1199));
        assert_eq!(app.copy_status(), Some(CopyStatus::Copied));

        clock.advance(Duration::from_millis(1));
        assert_eq!(app.copy_status(), None);
    }

    #[test]
    fn test_copy_while_paused_pumps_until_status_clears() {
        let (clock, mut app) = fixture();
        press(&mut app, KeyCode::Char('c'));
        assert!(app.pump_running());

        app.handle_event(AppEvent::Pump);
        assert!(app.pump_running());

        clock.advance(COPY_STATUS_TTL);
        app.handle_event(AppEvent::Pump);
        assert!(!app.pump_running());
    }

    #[test]
    fn test_pause_keeps_pump_for_pending_copy_status() {
        let (clock, mut app) = fixture();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);
        assert!(app.pump_running());

        clock.advance(COPY_STATUS_TTL);
        app.handle_event(AppEvent::Pump);
        assert!(!app.pump_running());
    }

    #[test]
    fn test_copy_failure_reported() {
        let clock = ManualClock::new();
        let mut app = app_with(&clock, Box::new(FailingClipboard));
        press(&mut app, KeyCode::Char('c'));

        assert_eq!(app.copy_status(), Some(CopyStatus::Failed));
    }

    #[test]
    fn test_ctrl_c_is_not_copy() {
        let clock = ManualClock::new();
        let clipboard = RecordingClipboard::default();
        let mut app = app_with(&clock, Box::new(clipboard.clone()));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

        assert!(clipboard.copied.lock().unwrap().is_empty());
        assert!(app.should_quit());
    }
}
