//! Leveled log sinks.
//!
//! The pipeline never writes to the console directly. Instead it logs through a [`Logger`],
//! which pairs an injected [`LogSink`] with a minimum [`LogLevel`]. Messages below the
//! configured level are dropped before they reach the sink.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Severity of a log message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose per-item progress.
    Debug,
    /// Per-block and per-run milestones.
    #[default]
    Info,
    /// Non-fatal anomalies.
    Warn,
}

impl LogLevel {
    /// Upper-case tag used in rendered lines (`DEBUG`, `INFO`, `WARN`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
        }
    }

    /// Lower-case directive accepted by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Destination for leveled log messages.
///
/// Implementors can print, forward to `tracing`, or record messages for tests.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Writes `[LEVEL] message` lines to stderr.
#[derive(Debug, Default)]
pub struct StdErrSink;

impl LogSink for StdErrSink {
    fn log(&self, level: LogLevel, message: &str) {
        eprintln!("[{level}] {message}");
    }
}

/// Forwards messages to the `tracing` macros under the `block_pipeline` target.
///
/// Filtering then happens twice: once by the [`Logger`] level and once by whatever
/// subscriber is installed.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "block_pipeline", "{message}"),
            LogLevel::Info => tracing::info!(target: "block_pipeline", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "block_pipeline", "{message}"),
        }
    }
}

/// A sink that fans out every message to a list of sinks.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl CompositeSink {
    /// Create a new composite sink from a list of sinks.
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

impl fmt::Debug for CompositeSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeSink")
            .field("sinks_len", &self.sinks.len())
            .finish()
    }
}

impl LogSink for CompositeSink {
    fn log(&self, level: LogLevel, message: &str) {
        for s in &self.sinks {
            s.log(level, message);
        }
    }
}

/// A cloneable logging handle: a sink plus the minimum level that reaches it.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    level: LogLevel,
}

impl Logger {
    /// Create a logger that forwards messages at or above `level` to `sink`.
    pub fn new(sink: Arc<dyn LogSink>, level: LogLevel) -> Self {
        Self { sink, level }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullSink), LogLevel::Warn)
    }

    /// The configured minimum level.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a message at `level` would reach the sink.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if self.enabled(level) {
            self.sink.log(level, message);
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("level", &self.level).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{CompositeSink, LogLevel, LogSink, Logger};

    #[derive(Default)]
    struct Recording(Mutex<Vec<(LogLevel, String)>>);

    impl LogSink for Recording {
        fn log(&self, level: LogLevel, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn debug_is_suppressed_at_info_level() {
        let rec = Arc::new(Recording::default());
        let logger = Logger::new(rec.clone(), LogLevel::Info);

        logger.debug("hidden");
        logger.info("shown");
        logger.warn("also shown");

        let got = rec.0.lock().unwrap().clone();
        assert_eq!(
            got,
            vec![
                (LogLevel::Info, "shown".to_string()),
                (LogLevel::Warn, "also shown".to_string()),
            ]
        );
    }

    #[test]
    fn debug_level_passes_everything() {
        let rec = Arc::new(Recording::default());
        let logger = Logger::new(rec.clone(), LogLevel::Debug);
        logger.debug("d");
        logger.info("i");
        assert_eq!(rec.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn composite_fans_out_to_all_sinks() {
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        let composite = CompositeSink::new(vec![a.clone(), b.clone()]);
        composite.log(LogLevel::Warn, "x");
        assert_eq!(a.0.lock().unwrap().len(), 1);
        assert_eq!(b.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("info".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("Warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("trace".parse::<LogLevel>().is_err());
    }

    #[test]
    fn filter_directive_round_trips_through_from_str() {
        for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warn] {
            assert_eq!(level.as_filter(), level.as_str().to_ascii_lowercase());
            assert_eq!(level.as_filter().parse::<LogLevel>(), Ok(level));
        }
    }
}
