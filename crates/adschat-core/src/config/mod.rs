//! Configuration
//!
//! Settings are layered from built-in defaults, config providers, the
//! environment and explicit overrides:
//! - `FileConfigProvider`: YAML file (~/.config/adschat/config.yaml)
//! - `MemoryConfigProvider`: In-memory for testing
//! - `SettingsResolver`: merges the layers into [`Settings`]

mod traits;
mod settings;
mod memory;
mod file;
mod resolver;

pub use traits::{ConfigProvider, ConfigError, ConfigResult};
pub use settings::{
    Settings, ToolServerSettings, ConfigFile, ToolServerFile,
    DEFAULT_MODEL, DEFAULT_API_BASE, DEFAULT_SYSTEM_PROMPT, DEFAULT_HISTORY_LIMIT,
};
pub use memory::MemoryConfigProvider;
pub use file::FileConfigProvider;
pub use resolver::{SettingsResolver, SettingsOverrides, BASE_URL_ENV, MODEL_ENV};
