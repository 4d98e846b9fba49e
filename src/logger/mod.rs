//! Top-level logger exports and a small global facade.
//!
//! - `Logger`: trait defining the logging surface
//! - `LogLevel`: enum of levels
//! - `NoopLogger`: no-op implementation
//! - `ConsoleLogger`: JSON-lines logger with a minimum level
//!
//! ```rust,no_run
//! use taxon_scraper::logger::{self, ConsoleLogger, LogLevel};
//! logger::init_logger(ConsoleLogger::stderr(LogLevel::Info));
//! logger::info("app started");
//! ```

pub mod core;

pub use self::core::{ConsoleLogger, LogLevel, LogStream, Logger, NoopLogger};

use std::sync::RwLock;

/// Process-wide logger used by the convenience facade below.
///
/// Installed loggers are leaked to get a `'static` reference; the lock only
/// guards swapping, so replacing the logger (as tests do) leaks the old one.
static GLOBAL_LOGGER: RwLock<Option<&'static dyn Logger>> = RwLock::new(None);

/// Install `logger` as the global logger. Call once early in `main`.
pub fn init_logger<L: Logger>(logger: L) {
    let leaked: &'static dyn Logger = Box::leak(Box::new(logger));
    match GLOBAL_LOGGER.write() {
        Ok(mut guard) => *guard = Some(leaked),
        Err(poisoned) => *poisoned.into_inner() = Some(leaked),
    }
}

/// Log using the global logger if set, otherwise no-op.
pub fn log(level: LogLevel, message: &str) {
    let current = match GLOBAL_LOGGER.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    };
    if let Some(logger) = current {
        logger.log(level, message);
    }
}

/// Flush the global logger, if any.
pub fn flush() {
    if let Ok(guard) = GLOBAL_LOGGER.read() {
        if let Some(logger) = *guard {
            logger.flush();
        }
    }
}

pub fn info(msg: &str) {
    log(LogLevel::Info, msg);
}

pub fn debug(msg: &str) {
    log(LogLevel::Debug, msg);
}

pub fn warn(msg: &str) {
    log(LogLevel::Warn, msg);
}

pub fn error(msg: &str) {
    log(LogLevel::Error, msg);
}
