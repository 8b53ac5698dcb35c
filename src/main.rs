mod app;
mod clipboard;
mod config;
mod events;
mod logging;
mod pump;
mod ui;

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ratatui::DefaultTerminal;
use stopwatch_core::{Clock, Stopwatch};

use crate::app::StopwatchApp;
use crate::clipboard::SystemClipboard;
use crate::config::Cli;
use crate::events::{AppEvent, InputReader};
use crate::pump::Pump;

const INPUT_POLL: Duration = Duration::from_millis(50);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(config) = cli.logging_config() {
        logging::init_logging(config)?;
    }
    log::info!("stopwatch starting, refresh every {} ms", cli.tick_ms);

    let (main_conn, events) = mpsc::channel();
    let mut app = StopwatchApp::new(
        Stopwatch::new(),
        Pump::spawn(main_conn.clone()),
        cli.tick(),
        Box::new(SystemClipboard::default()),
    );

    let mut terminal = ratatui::try_init().context("can't initialize terminal")?;
    let input = InputReader::spawn(main_conn, INPUT_POLL);
    let result = run(&mut terminal, &mut app, &events);
    ratatui::restore();
    input.stop();

    if let Err(e) = &result {
        log::error!("stopwatch failed: {:#}", e);
    }
    result
}

fn run<C: Clock>(
    terminal: &mut DefaultTerminal,
    app: &mut StopwatchApp<C>,
    events: &Receiver<AppEvent>,
) -> anyhow::Result<()> {
    terminal.draw(|f| ui::draw(f, app)).context("can't draw")?;

    while let Ok(event) = events.recv() {
        apply_pending(app, event, events)?;
        if app.should_quit() {
            break;
        }
        terminal.draw(|f| ui::draw(f, app)).context("can't draw")?;
    }
    Ok(())
}

/// Applies `first` and everything already queued behind it, so one draw
/// covers a backlog of pump ticks instead of one draw each.
fn apply_pending<C: Clock>(
    app: &mut StopwatchApp<C>,
    first: AppEvent,
    events: &Receiver<AppEvent>,
) -> anyhow::Result<()> {
    let mut next = Some(first);
    while let Some(event) = next {
        if let AppEvent::InputFailed(reason) = &event {
            anyhow::bail!("terminal input failed: {}", reason);
        }
        app.handle_event(event);
        if app.should_quit() {
            break;
        }
        next = events.try_recv().ok();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use stopwatch_core::ManualClock;

    use super::*;
    use crate::clipboard::testing::RecordingClipboard;

    fn fixture() -> StopwatchApp<ManualClock> {
        let (pump_tx, _pump_rx) = mpsc::channel();
        StopwatchApp::new(
            Stopwatch::with_clock(ManualClock::new()),
            Pump::spawn(pump_tx),
            Duration::from_millis(25),
            Box::new(RecordingClipboard::default()),
        )
    }

    fn key(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_backlog_applied_before_next_draw() {
        let mut app = fixture();
        let (tx, rx) = mpsc::channel();
        for _ in 0..5 {
            tx.send(AppEvent::Pump).unwrap();
        }
        tx.send(key('l')).unwrap();
        for _ in 0..3 {
            tx.send(AppEvent::Pump).unwrap();
        }

        apply_pending(&mut app, AppEvent::Pump, &rx).unwrap();

        assert_eq!(app.stopwatch.laps().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_quit_leaves_rest_of_queue() {
        let mut app = fixture();
        let (tx, rx) = mpsc::channel();
        tx.send(key('l')).unwrap();

        apply_pending(&mut app, key('q'), &rx).unwrap();

        assert!(app.should_quit());
        assert!(app.stopwatch.laps().is_empty());
        assert_eq!(rx.try_recv(), Ok(key('l')));
    }

    #[test]
    fn test_input_failure_propagates() {
        let mut app = fixture();
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::InputFailed("tty closed".to_string())).unwrap();

        let actual = apply_pending(&mut app, AppEvent::Pump, &rx).unwrap_err();

        assert_eq!(actual.to_string(), "terminal input failed: tty closed");
    }
}
