use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::logging::LoggingConfig;

pub const DEFAULT_TICK_MS: u64 = 25;

#[derive(Parser, Debug, Clone)]
#[command(name = "stopwatch", version, about = "Terminal stopwatch with lap recording")]
pub struct Cli {
    /// Display refresh interval in milliseconds while the stopwatch runs
    #[arg(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub tick_ms: u64,

    /// Write logs to this file. Without it nothing is logged, since the
    /// terminal belongs to the UI.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter in env_logger syntax (falls back to RUST_LOG, then "info")
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn logging_config(&self) -> Option<LoggingConfig> {
        self.log_file.clone().map(|file| LoggingConfig {
            file,
            env_filter: self.log_filter.clone(),
        })
    }
}
