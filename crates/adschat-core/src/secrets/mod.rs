//! Credential lookup
//!
//! The API key for the completion endpoint comes from an explicit value
//! (the `--api-key` flag) or the environment, first match wins.

mod traits;
mod env_store;
mod memory_store;
mod chain_store;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
pub use chain_store::ChainSecretStore;
