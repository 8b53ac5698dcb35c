use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::events::AppEvent;

const FALLBACK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
enum PumpOp {
    Start(Duration),
    Stop,
    Quit,
}

/// Periodic refresh source. While started it posts [`AppEvent::Pump`] to the
/// main loop every interval; while stopped it blocks and costs nothing.
pub struct Pump {
    conn: Sender<PumpOp>,
    running: bool,
    handle: Option<JoinHandle<()>>,
}

impl Pump {
    pub fn spawn(main_conn: Sender<AppEvent>) -> Self {
        let (conn, ops) = mpsc::channel();
        let handle = std::thread::spawn(move || pump_thread(ops, main_conn));
        Self {
            conn,
            running: false,
            handle: Some(handle),
        }
    }

    pub fn start(&mut self, interval: Duration) {
        if !self.running {
            self.running = true;
            log::debug!("pump start, every {:?}", interval);
            self.conn.send(PumpOp::Start(interval)).ok();
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::debug!("pump stop");
            self.conn.send(PumpOp::Stop).ok();
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.conn.send(PumpOp::Quit).ok();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("pump thread panicked");
            }
        }
    }
}

fn pump_thread(ops: Receiver<PumpOp>, main_conn: Sender<AppEvent>) {
    let mut interval: Option<Duration> = None;
    loop {
        // Wait for the next tick while running, block for a control op while stopped
        let op = match interval {
            Some(every) => match ops.recv_timeout(every) {
                Ok(op) => op,
                Err(RecvTimeoutError::Timeout) => {
                    if main_conn.send(AppEvent::Pump).is_err() {
                        break;
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match ops.recv() {
                Ok(op) => op,
                Err(_) => break,
            },
        };

        match op {
            PumpOp::Start(every) => {
                interval = Some(if every.is_zero() { FALLBACK_INTERVAL } else { every });
            }
            PumpOp::Stop => interval = None,
            PumpOp::Quit => break,
        }
    }
}
