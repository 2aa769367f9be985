//! Layered settings resolution
//!
//! Source priority (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config providers, in the order they were added
//! 3. Environment (`ZAI_BASE_URL`, `ADSCHAT_MODEL`)
//! 4. Explicit overrides (CLI flags)

use std::path::PathBuf;
use std::sync::Arc;

use super::settings::Settings;
use super::traits::{ConfigError, ConfigProvider, ConfigResult};

/// Environment variable overriding the completion endpoint base URL
pub const BASE_URL_ENV: &str = "ZAI_BASE_URL";
/// Environment variable overriding the model
pub const MODEL_ENV: &str = "ADSCHAT_MODEL";

/// Highest-priority values, typically from command-line flags
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub tool_command: Option<String>,
    pub tool_script: Option<PathBuf>,
}

/// Resolves [`Settings`] from defaults, providers, environment and overrides
pub struct SettingsResolver {
    providers: Vec<Arc<dyn ConfigProvider>>,
    env: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsResolver {
    /// Resolver reading the process environment
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Add a config provider; later providers win
    pub fn with_provider(mut self, provider: Arc<dyn ConfigProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Replace the environment lookup (useful for testing)
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(env);
        self
    }

    /// Descriptions of the configured providers, in priority order
    pub fn sources(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.describe()).collect()
    }

    pub fn resolve(&self, overrides: &SettingsOverrides) -> ConfigResult<Settings> {
        let mut settings = Settings::default();

        for provider in &self.providers {
            provider.load()?.apply_to(&mut settings);
        }

        let env_value = |key: &str| (self.env)(key).filter(|v| !v.trim().is_empty());
        if let Some(base) = env_value(BASE_URL_ENV) {
            settings.api_base = base;
        }
        if let Some(model) = env_value(MODEL_ENV) {
            settings.model = model;
        }

        if let Some(model) = &overrides.model {
            settings.model = model.clone();
        }
        if let Some(base) = &overrides.api_base {
            settings.api_base = base.clone();
        }
        if let Some(command) = &overrides.tool_command {
            settings.tool_server.command = command.clone();
        }
        if let Some(script) = &overrides.tool_script {
            settings.tool_server.script = Some(script.clone());
        }

        validate(&settings)?;
        Ok(settings)
    }
}

fn validate(settings: &Settings) -> ConfigResult<()> {
    if settings.model.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "model",
            message: "must not be empty".to_string(),
        });
    }
    if !(settings.api_base.starts_with("http://") || settings.api_base.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            field: "api_base",
            message: format!("expected an http(s) URL, got {:?}", settings.api_base),
        });
    }
    if !(0.0..=2.0).contains(&settings.temperature) {
        return Err(ConfigError::Invalid {
            field: "temperature",
            message: format!("{} is outside 0.0..=2.0", settings.temperature),
        });
    }
    if settings.max_tokens == 0 {
        return Err(ConfigError::Invalid {
            field: "max_tokens",
            message: "must be positive".to_string(),
        });
    }
    if settings.request_timeout_secs == 0 || settings.tool_timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            field: "timeout",
            message: "timeouts must be at least one second".to_string(),
        });
    }
    if settings.tool_server.command.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "tool_server.command",
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, MemoryConfigProvider};
    use std::collections::HashMap;

    fn no_env() -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        |_| None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_configured() {
        let settings = SettingsResolver::new()
            .with_env(no_env())
            .resolve(&SettingsOverrides::default())
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_priority_order() {
        let file = Arc::new(MemoryConfigProvider::new(ConfigFile {
            model: Some("from-file".to_string()),
            api_base: Some("https://file.example/v1".to_string()),
            max_tokens: Some(100),
            ..Default::default()
        }));

        let resolver = SettingsResolver::new()
            .with_provider(file)
            .with_env(env_of(&[("ZAI_BASE_URL", "https://env.example/v4")]));

        let settings = resolver
            .resolve(&SettingsOverrides {
                model: Some("from-flag".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(settings.model, "from-flag");
        assert_eq!(settings.api_base, "https://env.example/v4");
        assert_eq!(settings.max_tokens, 100);
    }

    #[test]
    fn test_later_provider_wins() {
        let first = Arc::new(MemoryConfigProvider::new(ConfigFile {
            model: Some("first".to_string()),
            ..Default::default()
        }));
        let second = Arc::new(MemoryConfigProvider::new(ConfigFile {
            model: Some("second".to_string()),
            ..Default::default()
        }));

        let settings = SettingsResolver::new()
            .with_provider(first)
            .with_provider(second)
            .with_env(no_env())
            .resolve(&SettingsOverrides::default())
            .unwrap();
        assert_eq!(settings.model, "second");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let settings = SettingsResolver::new()
            .with_env(env_of(&[("ADSCHAT_MODEL", "  ")]))
            .resolve(&SettingsOverrides::default())
            .unwrap();
        assert_eq!(settings.model, "glm-4.7");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = SettingsResolver::new()
            .with_env(no_env())
            .resolve(&SettingsOverrides {
                api_base: Some("api.z.ai".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "api_base", .. }));
    }

    #[test]
    fn test_tool_overrides() {
        let settings = SettingsResolver::new()
            .with_env(no_env())
            .resolve(&SettingsOverrides {
                tool_command: Some("/usr/local/bin/python3".to_string()),
                tool_script: Some(PathBuf::from("/srv/ads/server.py")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.tool_server.command, "/usr/local/bin/python3");
        assert_eq!(settings.tool_server.script, Some(PathBuf::from("/srv/ads/server.py")));
    }
}
