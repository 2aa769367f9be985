//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::SecretStore;

/// Secrets supplied at runtime, e.g. an `--api-key` flag or a test fixture
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a secret
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.secrets
            .read()
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_insert_and_get() {
        let store = MemorySecretStore::new();
        assert!(store.is_empty());

        store.insert("zai", "sk-one");
        store.insert("zai", "sk-two");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("zai"), Some("sk-two".to_string()));
        assert!(!store.has("openai"));
    }

    #[test]
    fn test_empty_value_is_missing() {
        let store = MemorySecretStore::new().with("zai", "");
        assert_eq!(store.get("zai"), None);
    }
}
