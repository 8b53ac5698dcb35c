use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Context;

/// Where and how much to log.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "stopwatch=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub file: PathBuf,
    pub env_filter: Option<String>,
}

/// Installs the global logger, appending to `config.file`.
///
/// Call once, early in `main`, before the terminal is taken over.
pub fn init_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("can't open log file {}", config.file.display()))?;

    let mut builder = env_logger::Builder::new();
    if let Some(filter) = config.env_filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialized")?;

    log::debug!("logging to {}", config.file.display());
    Ok(())
}
