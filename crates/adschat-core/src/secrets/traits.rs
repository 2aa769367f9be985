//! Core traits and types for credential lookup

use thiserror::Error;

/// Errors that can occur while resolving a credential
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretStoreError {
    /// No store in the chain holds the credential
    #[error("{env_var} not set. Set it as environment variable or pass it as parameter.")]
    CredentialMissing { env_var: String },
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Read-only source of secrets
///
/// Implementations:
/// - `EnvSecretStore`: environment variables, with provider-name aliases
/// - `MemorySecretStore`: values supplied at runtime (e.g. `--api-key`)
/// - `ChainSecretStore`: first match across several stores
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve a secret by key
    ///
    /// The key can be a provider name (`"zai"`) or a variable name
    /// (`"ZAI_API_KEY"`); stores map between the two as they see fit.
    fn get(&self, key: &str) -> Option<String>;

    /// Check if a secret exists
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
