//! Tool execution
//!
//! Turns a model tool call into exactly one transport invocation and always
//! produces text. Failures become readable error strings so the model can see
//! what went wrong and the exchange keeps going.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::registry::ToolRegistry;
use crate::logging::Logger;
use crate::rpc::{RpcError, ToolTransport};
use crate::types::{ToolCall, ToolResult};

/// Why a tool call produced no result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolExecError {
    #[error("Error: tool server not found at {location}")]
    ProcessNotFound { location: String },

    #[error("Error: invalid reply from tool server: {0}")]
    Protocol(String),

    /// Message from the tool itself, surfaced verbatim
    #[error("Tool server error: {0}")]
    Application(String),

    #[error("Error: unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Error: invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Error: tool {tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },
}

pub type ToolExecResult<T> = Result<T, ToolExecError>;

impl ToolExecError {
    fn from_rpc(tool: &str, err: RpcError) -> Self {
        match err {
            RpcError::ProcessNotFound { location } => Self::ProcessNotFound { location },
            RpcError::Protocol(msg) => Self::Protocol(msg),
            RpcError::Application(msg) => Self::Application(msg),
            RpcError::Timeout { seconds } => Self::Timeout {
                tool: tool.to_string(),
                seconds,
            },
            RpcError::Io(e) => Self::Protocol(format!("I/O error: {}", e)),
        }
    }
}

/// Runs tool calls against a transport, one at a time
pub struct ToolExecutor {
    transport: Arc<dyn ToolTransport>,
    registry: ToolRegistry,
    logger: Arc<dyn Logger>,
}

impl ToolExecutor {
    pub fn new(
        transport: Arc<dyn ToolTransport>,
        registry: ToolRegistry,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            transport,
            registry,
            logger,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one tool, keeping the failure typed
    pub async fn try_execute(&self, name: &str, arguments: &Value) -> ToolExecResult<String> {
        if !self.registry.contains(name) {
            return Err(ToolExecError::UnknownTool(name.to_string()));
        }
        match arguments {
            Value::Object(_) => {}
            Value::String(raw) => {
                return Err(ToolExecError::InvalidArguments {
                    tool: name.to_string(),
                    reason: format!("not valid JSON: {}", raw),
                })
            }
            other => {
                return Err(ToolExecError::InvalidArguments {
                    tool: name.to_string(),
                    reason: format!("expected an object, got {}", other),
                })
            }
        }

        self.transport
            .invoke(name, arguments)
            .await
            .map_err(|e| ToolExecError::from_rpc(name, e))
    }

    /// Run one tool; errors come back as text
    pub async fn execute(&self, name: &str, arguments: &Value) -> String {
        match self.try_execute(name, arguments).await {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }
    }

    /// Run the tool a model call asks for and tag the result with its id
    pub async fn execute_call(&self, call: &ToolCall) -> ToolResult {
        crate::log_info!(self.logger, "[ToolExecutor] Calling tool: {}", call.name);

        match self.try_execute(&call.name, &call.arguments).await {
            Ok(text) => ToolResult::success(&call.id, text),
            Err(e) => {
                crate::log_warn!(self.logger, "[ToolExecutor] {} failed: {}", call.name, e);
                ToolResult::error(&call.id, e.to_string())
            }
        }
    }

    /// Run every call in order; results line up with `calls`
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute_call(call).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::rpc::{MockReply, MockToolTransport};
    use serde_json::json;

    fn executor(transport: MockToolTransport) -> (ToolExecutor, Arc<MockToolTransport>) {
        let transport = Arc::new(transport);
        let exec = ToolExecutor::new(
            transport.clone(),
            ToolRegistry::google_ads(),
            Arc::new(NoOpLogger),
        );
        (exec, transport)
    }

    #[tokio::test]
    async fn test_success_passes_text_through() {
        let (exec, _) = executor(
            MockToolTransport::new().with_reply("get_account_currency", MockReply::Text("USD".into())),
        );
        let out = exec
            .execute("get_account_currency", &json!({"customer_id": "1234567890"}))
            .await;
        assert_eq!(out, "USD");
    }

    #[tokio::test]
    async fn test_idempotent_against_deterministic_tool() {
        let (exec, transport) = executor(
            MockToolTransport::new().with_reply("list_accounts", MockReply::Text("[\"123\"]".into())),
        );
        let first = exec.execute("list_accounts", &json!({})).await;
        let second = exec.execute("list_accounts", &json!({})).await;
        assert_eq!(first, second);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_not_dispatched() {
        let (exec, transport) = executor(MockToolTransport::new().with_fallback(MockReply::Text("x".into())));
        let out = exec.execute("delete_campaign", &json!({})).await;
        assert!(out.contains("unknown tool 'delete_campaign'"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_arguments_not_dispatched() {
        let (exec, transport) = executor(MockToolTransport::new().with_fallback(MockReply::Text("x".into())));
        let err = exec
            .try_execute("run_gaql", &Value::String("{broken".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolExecError::InvalidArguments { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_classes_render_as_text() {
        let (exec, _) = executor(
            MockToolTransport::new()
                .with_reply("list_accounts", MockReply::NotFound)
                .with_reply("run_gaql", MockReply::Raw("Traceback (most recent call last):".into()))
                .with_reply("get_ad_creatives", MockReply::Error("PERMISSION_DENIED".into())),
        );

        let not_found = exec.execute("list_accounts", &json!({})).await;
        assert!(not_found.starts_with("Error: tool server not found"));

        let protocol = exec
            .try_execute("run_gaql", &json!({"customer_id": "1", "query": "SELECT"}))
            .await
            .unwrap_err();
        assert!(matches!(protocol, ToolExecError::Protocol(_)));

        let app = exec
            .execute("get_ad_creatives", &json!({"customer_id": "1"}))
            .await;
        assert!(app.contains("PERMISSION_DENIED"));
    }

    #[tokio::test]
    async fn test_execute_all_preserves_order_and_ids() {
        let (exec, transport) = executor(
            MockToolTransport::new()
                .with_reply("list_accounts", MockReply::Text("[]".into()))
                .with_reply("get_account_currency", MockReply::Text("EUR".into())),
        );
        let calls = vec![
            ToolCall::new("b", "get_account_currency", json!({"customer_id": "1"})),
            ToolCall::new("a", "list_accounts", json!({})),
        ];

        let results = exec.execute_all(&calls).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0], ToolResult::success("b", "EUR"));
        assert_eq!(results[1], ToolResult::success("a", "[]"));
        let order: Vec<String> = transport.calls().into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["get_account_currency", "list_accounts"]);
    }
}
