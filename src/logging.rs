//! Tracing setup.
//!
//! CLI subcommands log to stderr. The TUI owns the terminal, so it logs to a
//! file instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::error::{AppError, EXIT_IO};

/// Where log records go.
#[derive(Debug, Clone, Copy)]
pub enum LogSink<'a> {
    Stderr,
    File(&'a Path),
}

/// Parse a level name, falling back to `default` for empty or unknown values.
pub fn parse_level(value: Option<&str>, default: Level) -> Level {
    value
        .and_then(|v| Level::from_str(v.trim()).ok())
        .unwrap_or(default)
}

/// Install the global subscriber. Calling it twice keeps the first one.
pub fn init(level: Level, sink: LogSink<'_>) -> Result<(), AppError> {
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);

    let result = match sink {
        LogSink::Stderr => tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish()),
        LogSink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::new(EXIT_IO, format!("Failed to open log file '{}': {e}", path.display())))?;
            tracing::subscriber::set_global_default(
                builder.with_ansi(false).with_writer(Mutex::new(file)).finish(),
            )
        }
    };

    match result {
        Ok(()) => Ok(()),
        // Already installed (e.g. repeated init in tests): keep the existing subscriber.
        Err(_) if tracing::dispatcher::has_been_set() => Ok(()),
        Err(e) => Err(AppError::new(EXIT_IO, format!("Failed to install logger: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level(Some("debug"), Level::INFO), Level::DEBUG);
        assert_eq!(parse_level(Some(" WARN "), Level::INFO), Level::WARN);
        assert_eq!(parse_level(Some("loud"), Level::INFO), Level::INFO);
        assert_eq!(parse_level(None, Level::WARN), Level::WARN);
    }

    #[test]
    fn second_init_keeps_existing_subscriber() {
        assert!(init(Level::INFO, LogSink::Stderr).is_ok());
        assert!(init(Level::DEBUG, LogSink::Stderr).is_ok());
        assert!(tracing::dispatcher::has_been_set());
    }
}
