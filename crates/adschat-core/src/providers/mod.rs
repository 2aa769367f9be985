//! Completion client implementations
//!
//! `ChatCompletionsClient` talks to any OpenAI-compatible
//! `/chat/completions` endpoint (Z.ai's GLM API by default) over reqwest.
//! `MockCompletionClient` replays scripted results for tests.

mod traits;
mod error;
mod chat_completions;
mod mock;

pub use traits::{CompletionClient, CompletionResult};
pub use error::{ProviderError, ProviderResult};
pub use chat_completions::{ChatCompletionsClient, ChatCompletionsConfig};
pub use mock::{MockCompletionClient, RecordedRequest};
