//! Chained secret store with fallback behavior

use std::sync::Arc;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};
use super::env_store::EnvSecretStore;
use super::memory_store::MemorySecretStore;

/// Tries each store in order and returns the first match
pub struct ChainSecretStore {
    stores: Vec<Arc<dyn SecretStore>>,
}

impl ChainSecretStore {
    pub fn new(stores: Vec<Arc<dyn SecretStore>>) -> Self {
        Self { stores }
    }

    /// Explicit value first (when given), then the environment
    pub fn explicit_then_env(provider: &str, explicit: Option<&str>) -> Self {
        let mut stores: Vec<Arc<dyn SecretStore>> = Vec::new();
        if let Some(value) = explicit {
            stores.push(Arc::new(MemorySecretStore::new().with(provider, value)));
        }
        stores.push(Arc::new(EnvSecretStore::new()));
        Self::new(stores)
    }

    /// Name of the first store holding `key`
    pub fn source_of(&self, key: &str) -> Option<&str> {
        self.stores.iter().find(|s| s.has(key)).map(|s| s.name())
    }

    /// Resolve the API key for `provider`, or fail with `CredentialMissing`
    pub fn require_api_key(&self, provider: &str) -> SecretStoreResult<String> {
        self.get(provider).ok_or_else(|| {
            let env_var = EnvSecretStore::env_vars_for(provider)
                .and_then(|vars| vars.first().copied())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}_API_KEY", provider.to_uppercase()));
            SecretStoreError::CredentialMissing { env_var }
        })
    }
}

impl SecretStore for ChainSecretStore {
    fn name(&self) -> &str {
        "chain"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.stores.iter().find_map(|store| store.get(key))
    }
}

impl std::fmt::Debug for ChainSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stores.iter().map(|s| s.name()).collect();
        f.debug_struct("ChainSecretStore")
            .field("stores", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_store_priority() {
        let first = Arc::new(MemorySecretStore::new().with("zai", "from_first"));
        let second = Arc::new(MemorySecretStore::new().with("zai", "from_second"));

        let chain = ChainSecretStore::new(vec![first, second]);
        assert_eq!(chain.get("zai"), Some("from_first".to_string()));
    }

    #[test]
    fn test_chain_store_fallback() {
        let first = Arc::new(MemorySecretStore::new());
        let second = Arc::new(MemorySecretStore::new().with("zai", "from_second"));

        let chain = ChainSecretStore::new(vec![first, second]);
        assert_eq!(chain.get("zai"), Some("from_second".to_string()));
        assert_eq!(chain.source_of("zai"), Some("memory"));
    }

    #[test]
    fn test_explicit_key_wins() {
        let chain = ChainSecretStore::explicit_then_env("zai", Some("sk-explicit"));
        assert_eq!(chain.require_api_key("zai"), Ok("sk-explicit".to_string()));
    }

    #[test]
    fn test_missing_credential() {
        let chain = ChainSecretStore::new(vec![Arc::new(MemorySecretStore::new())]);
        let err = chain.require_api_key("zai").unwrap_err();
        assert!(err.to_string().starts_with("ZAI_API_KEY not set"));
    }
}
