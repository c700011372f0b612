//! Process-wide logging on top of the `log` facade.

use anyhow::{Context, Result};

use crate::config::LoggingConfig;

/// Build the `fern` dispatcher described by the logging configuration.
///
/// Lines go to stdout and, when `file` is set, are appended to that file.
pub fn build_dispatch(config: &LoggingConfig) -> Result<fern::Dispatch> {
    let level = config.level_filter()?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // sqlx logs every statement at info
        .level_for("sqlx", log::LevelFilter::Warn)
        .chain(std::io::stdout());

    if let Some(path) = &config.file {
        let file = fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    Ok(dispatch)
}

/// Install the logger for the whole process. Call once at startup.
pub fn init(config: &LoggingConfig) -> Result<()> {
    build_dispatch(config)?.apply().context("Logger already initialized")?;
    Ok(())
}
