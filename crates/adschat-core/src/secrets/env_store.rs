//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;

/// Mapping from provider names to the environment variables that hold their keys
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("zai", vec!["ZAI_API_KEY"]);
    m.insert("glm", vec!["ZAI_API_KEY"]);
    m.insert("bigmodel", vec!["BIGMODEL_API_KEY", "ZAI_API_KEY"]);
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m
});

/// Secret store that reads from environment variables
///
/// Lookup order for a key:
/// 1. the key itself as a variable name
/// 2. the provider alias table (`zai` → `ZAI_API_KEY`)
/// 3. `<KEY>_API_KEY`
///
/// Empty values count as unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    /// Environment variables consulted for a provider name
    pub fn env_vars_for(provider: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP
            .get(provider.to_lowercase().as_str())
            .map(|v| v.as_slice())
    }

    fn read(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = Self::read(key) {
            return Some(value);
        }

        if let Some(vars) = Self::env_vars_for(key) {
            if let Some(value) = vars.iter().find_map(|var| Self::read(var)) {
                return Some(value);
            }
        }

        Self::read(&format!("{}_API_KEY", key.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_store_get_direct() {
        env::set_var("ADSCHAT_TEST_SECRET_12345", "test_value");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("ADSCHAT_TEST_SECRET_12345"), Some("test_value".to_string()));

        env::remove_var("ADSCHAT_TEST_SECRET_12345");
    }

    #[test]
    fn test_env_store_suffix_lookup() {
        env::set_var("ADSCHATSUFFIX_API_KEY", "sk-suffix");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("adschatsuffix"), Some("sk-suffix".to_string()));

        env::remove_var("ADSCHATSUFFIX_API_KEY");
    }

    #[test]
    fn test_env_store_empty_is_unset() {
        env::set_var("ADSCHAT_TEST_EMPTY", "");
        let store = EnvSecretStore::new();
        assert!(!store.has("ADSCHAT_TEST_EMPTY"));
        env::remove_var("ADSCHAT_TEST_EMPTY");
    }

    #[test]
    fn test_provider_aliases() {
        assert_eq!(EnvSecretStore::env_vars_for("ZAI"), Some(&["ZAI_API_KEY"][..]));
        assert_eq!(EnvSecretStore::env_vars_for("unknown_provider_xyz"), None);
    }

    #[test]
    fn test_env_store_get_not_found() {
        let store = EnvSecretStore::new();
        assert_eq!(store.get("nonexistent_provider_xyz"), None);
    }
}
