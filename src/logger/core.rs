//! Logging primitives for the taxon scraper.
//!
//! A minimal `Logger` trait plus two implementations: `NoopLogger` for tests
//! and `ConsoleLogger`, which writes one JSON object per line. The scraper
//! writes its JSON results to stdout, so the console logger defaults to stderr.
//!
//! Implementors of `Logger` must be `Send + Sync + 'static` so they can sit
//! behind the global facade in `logger::mod`.

use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Returns a short string representation suitable for logs.
impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Minimal logger interface used throughout the project.
///
/// The core requirement is a single `log` method; the level helpers are
/// implemented in terms of it so tests can provide a tiny implementation.
pub trait Logger: Send + Sync + 'static {
    /// Emit a log record at the given level.
    fn log(&self, level: LogLevel, message: &str);

    /// Flush any buffered records.
    fn flush(&self) {}

    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// No-op logger used by default in tests and when logging is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str) {
        // intentionally do nothing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

/// JSON-lines logger for the terminal.
///
/// Each record is a compact object with a timestamp, level and message:
/// `{"ts":"...","level":"INFO","msg":"..."}`. Records below `min_level` are
/// dropped.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    min_level: LogLevel,
    stream: LogStream,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel, stream: LogStream) -> Self {
        Self { min_level, stream }
    }

    pub fn stderr(min_level: LogLevel) -> Self {
        Self::new(min_level, LogStream::Stderr)
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Render one record as a JSON line (without the newline).
    pub fn format_record(level: LogLevel, message: &str) -> String {
        let ts = chrono::Utc::now().to_rfc3339();
        serde_json::json!({
            "ts": ts,
            "level": level.as_str(),
            "msg": message,
        })
        .to_string()
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::stderr(LogLevel::Info)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let line = Self::format_record(level, message);
        // A closed pipe must not take the scraper down.
        let _ = match self.stream {
            LogStream::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
            LogStream::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
        };
    }

    fn flush(&self) {
        let _ = match self.stream {
            LogStream::Stdout => std::io::stdout().flush(),
            LogStream::Stderr => std::io::stderr().flush(),
        };
    }
}
