//! File-based configuration provider (YAML)
//!
//! Default location is the user-level `~/.config/adschat/config.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use super::settings::ConfigFile;
use super::traits::{ConfigError, ConfigProvider, ConfigResult};

/// File-based configuration provider
///
/// # Example
///
/// ```no_run
/// use adschat_core::config::{ConfigProvider, FileConfigProvider};
///
/// let overlay = FileConfigProvider::user().load().unwrap();
/// println!("model override: {:?}", overlay.model);
/// ```
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    /// Create a provider for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a user-level config provider (~/.config/adschat/config.yaml)
    pub fn user() -> Self {
        // XDG config directory on Linux, Application Support on macOS
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        Self::new(config_dir.join("adschat").join("config.yaml"))
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl ConfigProvider for FileConfigProvider {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> ConfigResult<ConfigFile> {
        if !self.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.describe(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: self.describe(),
            message: e.to_string(),
        })
    }
}
