//! In-memory configuration provider

use parking_lot::RwLock;

use super::settings::ConfigFile;
use super::traits::{ConfigProvider, ConfigResult};

/// In-memory configuration provider for testing
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    overlay: RwLock<ConfigFile>,
}

impl MemoryConfigProvider {
    pub fn new(overlay: ConfigFile) -> Self {
        Self {
            overlay: RwLock::new(overlay),
        }
    }

    /// Replace the overlay (useful for testing)
    pub fn set(&self, overlay: ConfigFile) {
        *self.overlay.write() = overlay;
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> ConfigResult<ConfigFile> {
        Ok(self.overlay.read().clone())
    }
}
