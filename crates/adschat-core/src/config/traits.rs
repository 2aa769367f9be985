//! Configuration provider trait

use super::settings::ConfigFile;

/// Source of a partial settings overlay
///
/// Implementations:
/// - `FileConfigProvider`: YAML file (~/.config/adschat/config.yaml)
/// - `MemoryConfigProvider`: In-memory for testing
pub trait ConfigProvider: Send + Sync {
    /// Human-readable description of where the settings come from
    fn describe(&self) -> String;

    /// Load the overlay; a missing source yields an empty overlay
    fn load(&self) -> ConfigResult<ConfigFile>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
