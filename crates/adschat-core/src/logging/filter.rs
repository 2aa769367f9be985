//! Level-filtering logger wrapper

use std::sync::Arc;

use super::file_logger::LogLevel;
use super::traits::Logger;

/// Forwards messages at or above `min_level` to an inner logger
pub struct FilterLogger {
    inner: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl FilterLogger {
    pub fn new(inner: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { inner, min_level }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Logger for FilterLogger {
    fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            self.inner.debug(message);
        }
    }

    fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            self.inner.info(message);
        }
    }

    fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warn) {
            self.inner.warn(message);
        }
    }

    fn error(&self, message: &str) {
        if self.enabled(LogLevel::Error) {
            self.inner.error(message);
        }
    }
}
