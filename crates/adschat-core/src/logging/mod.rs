//! Logging abstractions for runtime-agnostic logging

mod traits;
mod noop;
mod console;
mod filter;
pub mod file_logger;

pub use traits::Logger;
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use filter::FilterLogger;

// Re-export file logger functions for convenience
pub use file_logger::{log, debug, warn, error, is_enabled, log_file_path, LogLevel};
