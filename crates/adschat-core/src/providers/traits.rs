//! Completion client trait definition

use async_trait::async_trait;

use crate::types::{ChatMessage, Tool, ToolCall};
use super::error::ProviderResult;

/// Outcome of one completion call
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    /// The model produced a direct answer
    Text { content: String },
    /// The model wants tools run before it can answer
    ToolCalls {
        calls: Vec<ToolCall>,
        /// Text the model sent alongside the calls, if any
        content: Option<String>,
    },
}

impl CompletionResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::ToolCalls {
            calls,
            content: None,
        }
    }

    pub fn is_tool_calls(&self) -> bool {
        matches!(self, Self::ToolCalls { .. })
    }
}

/// Chat-completion backend
///
/// Each call is exactly one request to the backend: no retry, no streaming.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Backend name used in diagnostics (e.g., "Z.ai")
    fn name(&self) -> &str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Run one completion over `messages`, offering `tools` when given
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> ProviderResult<CompletionResult>;
}
