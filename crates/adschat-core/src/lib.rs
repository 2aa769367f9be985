//! AdsChat Core
//!
//! A chat client that lets an LLM answer questions about Google Ads accounts
//! by calling read-only reporting tools. Each user turn is one exchange: a
//! completion request with the tool catalogue, at most one round of tool
//! calls against the reporting server, and a follow-up completion that turns
//! the tool output into an answer.
//!
//! ```rust,ignore
//! use adschat_core::{Orchestrator, Settings, ConsoleLogger};
//!
//! let settings = Settings::default();
//! let orchestrator = Orchestrator::from_settings(&settings, api_key, Arc::new(ConsoleLogger::new()))?;
//!
//! let outcome = orchestrator
//!     .exchange(orchestrator.new_conversation(), "How did my campaigns do last week?")
//!     .await;
//! println!("{}", outcome.reply);
//! ```

pub mod types;
pub mod secrets;
pub mod logging;
pub mod config;
pub mod providers;
pub mod rpc;
pub mod tools;
pub mod chat;

// Re-export commonly used types
pub use types::{ChatMessage, Conversation, MessageRole, Tool, ToolCall, ToolResult};

pub use secrets::{
    SecretStore, SecretStoreError, SecretStoreResult,
    EnvSecretStore, MemorySecretStore, ChainSecretStore,
};

pub use logging::{Logger, NoOpLogger, ConsoleLogger, FilterLogger, LogLevel};

pub use config::{
    ConfigProvider, ConfigError, ConfigResult, FileConfigProvider, MemoryConfigProvider,
    Settings, SettingsOverrides, SettingsResolver,
};

pub use providers::{
    ChatCompletionsClient, ChatCompletionsConfig, CompletionClient, CompletionResult,
    MockCompletionClient, ProviderError, ProviderResult,
};

pub use rpc::{
    MockReply, MockToolTransport, RpcError, RpcResult, StdioServerConfig, StdioToolTransport,
    ToolTransport,
};

pub use tools::{ToolExecError, ToolExecutor, ToolRegistry};

pub use chat::{ExchangeError, ExchangeOutcome, ExchangeState, Orchestrator};
