//! Chat-completions client over plain HTTPS
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol that Z.ai's GLM
//! endpoint exposes. One POST per call; the response is classified into text,
//! tool calls, or an empty reply.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::logging::{self, Logger};
use crate::types::{ChatMessage, Tool, ToolCall};

use super::error::{ProviderError, ProviderResult};
use super::traits::{CompletionClient, CompletionResult};

/// Connection and sampling settings for [`ChatCompletionsClient`]
#[derive(Clone)]
pub struct ChatCompletionsConfig {
    /// Backend name used in diagnostics
    pub provider: String,
    /// Model identifier as used by the API
    pub model: String,
    /// Bearer token
    pub api_key: String,
    /// Base URL; `/chat/completions` is appended
    pub api_base: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ChatCompletionsConfig {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: "Z.ai".to_string(),
            model: model.into(),
            api_key: api_key.into(),
            api_base: crate::config::DEFAULT_API_BASE.to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_provider_name(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

// The API key stays out of Debug output
impl std::fmt::Debug for ChatCompletionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    /// Decoded one entry at a time so a malformed call does not sink the rest
    #[serde(default)]
    tool_calls: Option<Vec<Value>>,
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint
pub struct ChatCompletionsClient {
    config: ChatCompletionsConfig,
    http: reqwest::Client,
    logger: Arc<dyn Logger>,
}

impl ChatCompletionsClient {
    /// Create a client; fails when the API key is empty
    pub fn new(config: ChatCompletionsConfig, logger: Arc<dyn Logger>) -> ProviderResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey {
                provider: config.provider.clone(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ProviderError::Http {
                provider: config.provider.clone(),
                source,
            })?;

        Ok(Self {
            config,
            http,
            logger,
        })
    }

    pub fn config(&self) -> &ChatCompletionsConfig {
        &self.config
    }

    /// Request payload: `{model, messages, tools?, temperature, max_tokens}`
    pub fn build_request_body(&self, messages: &[ChatMessage], tools: Option<&[Tool]>) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            let specs: Vec<Value> = tools.iter().map(Tool::to_function_spec).collect();
            body["tools"] = Value::Array(specs);
        }

        body
    }

    /// Classify a decoded response body
    pub fn parse_response(&self, body: &str) -> ProviderResult<CompletionResult> {
        let provider = &self.config.provider;
        let response: CompletionResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::invalid_response(provider, e.to_string()))?;

        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::empty_response(provider, "no choices"))?
            .message
            .ok_or_else(|| ProviderError::empty_response(provider, "choice without message"))?;

        let calls = self.decode_tool_calls(message.tool_calls.unwrap_or_default());
        if !calls.is_empty() {
            return Ok(CompletionResult::ToolCalls {
                calls,
                content: message.content.filter(|c| !c.is_empty()),
            });
        }
        match message.content {
            Some(content) if !content.is_empty() => Ok(CompletionResult::Text { content }),
            _ => Err(ProviderError::empty_response(provider, "message has no content")),
        }
    }

    /// Decode each `tool_calls` entry on its own
    ///
    /// An entry that fails to decode but still has an id becomes a call whose
    /// arguments hold the decode error, so the executor answers it with an
    /// error result and every id gets its reply. Entries without an id cannot
    /// be answered and are dropped.
    fn decode_tool_calls(&self, entries: Vec<Value>) -> Vec<ToolCall> {
        let mut calls = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = entry.get("id").and_then(Value::as_str).map(str::to_string);
            let name = entry
                .pointer("/function/name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            match serde_json::from_value::<ToolCall>(entry) {
                Ok(call) if !call.id.is_empty() => calls.push(call),
                Ok(call) => self.logger.warn(&format!(
                    "[ChatCompletions] Dropping tool call {} without an id",
                    call.name
                )),
                Err(e) => match id.filter(|id| !id.is_empty()) {
                    Some(id) => {
                        self.logger.warn(&format!(
                            "[ChatCompletions] Malformed tool call {}: {}",
                            id, e
                        ));
                        calls.push(ToolCall::new(
                            id,
                            name,
                            Value::String(format!("malformed tool call: {}", e)),
                        ));
                    }
                    None => self.logger.warn(&format!(
                        "[ChatCompletions] Dropping malformed tool call without an id: {}",
                        e
                    )),
                },
            }
        }
        calls
    }

    fn classify_send_error(&self, source: reqwest::Error) -> ProviderError {
        if source.is_timeout() {
            ProviderError::Timeout {
                provider: self.config.provider.clone(),
                seconds: self.config.timeout.as_secs(),
            }
        } else {
            ProviderError::Http {
                provider: self.config.provider.clone(),
                source,
            }
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.config.provider
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> ProviderResult<CompletionResult> {
        let url = self.config.endpoint();
        let body = self.build_request_body(messages, tools);

        self.logger.debug(&format!(
            "[ChatCompletions] POST {} model={} messages={} tools={}",
            url,
            self.config.model,
            messages.len(),
            tools.map_or(0, |t| t.len())
        ));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        logging::debug(
            "providers::chat_completions",
            &format!("status={} body_len={}", status.as_u16(), text.len()),
        );

        if !status.is_success() {
            self.logger.warn(&format!(
                "[ChatCompletions] {} returned HTTP {}",
                self.config.provider,
                status.as_u16()
            ));
            return Err(ProviderError::transport(&self.config.provider, status.as_u16(), text));
        }

        let result = self.parse_response(&text)?;
        if let CompletionResult::ToolCalls { calls, .. } = &result {
            self.logger.info(&format!(
                "[ChatCompletions] Model requested {} tool call(s)",
                calls.len()
            ));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    fn client() -> ChatCompletionsClient {
        ChatCompletionsClient::new(
            ChatCompletionsConfig::new("glm-4.7", "sk-test"),
            Arc::new(NoOpLogger),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_api_key() {
        let result = ChatCompletionsClient::new(
            ChatCompletionsConfig::new("glm-4.7", "  "),
            Arc::new(NoOpLogger),
        );
        assert!(matches!(result, Err(ProviderError::MissingApiKey { .. })));
    }

    #[test]
    fn test_endpoint_joins_path() {
        let config = ChatCompletionsConfig::new("m", "k").with_api_base("https://api.z.ai/api/paas/v4/");
        assert_eq!(config.endpoint(), "https://api.z.ai/api/paas/v4/chat/completions");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ChatCompletionsConfig::new("m", "sk-secret");
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[test]
    fn test_request_body_with_tools() {
        let tools = vec![Tool::new("list_accounts", "List accounts")];
        let body = client().build_request_body(&[ChatMessage::user("hi")], Some(&tools));

        assert_eq!(body["model"], "glm-4.7");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["tools"][0]["function"]["name"], "list_accounts");
    }

    #[test]
    fn test_request_body_without_tools() {
        let body = client().build_request_body(&[ChatMessage::user("hi")], None);
        assert!(body.get("tools").is_none());

        let body = client().build_request_body(&[ChatMessage::user("hi")], Some(&[]));
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_text() {
        let result = client()
            .parse_response(r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#)
            .unwrap();
        assert_eq!(result, CompletionResult::text("Hello"));
    }

    #[test]
    fn test_parse_tool_calls_win_over_content() {
        let result = client()
            .parse_response(
                r#"{"choices":[{"message":{"content":"Let me check.","tool_calls":[
                    {"id":"call_1","type":"function","function":{"name":"list_accounts","arguments":"{}"}}
                ]}}]}"#,
            )
            .unwrap();

        match result {
            CompletionResult::ToolCalls { calls, content } => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "list_accounts");
                assert_eq!(content.as_deref(), Some("Let me check."));
            }
            other => panic!("expected tool calls, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_tool_call_kept_alongside_good_ones() {
        let result = client()
            .parse_response(
                r#"{"choices":[{"message":{"content":null,"tool_calls":[
                    {"id":"call_1","type":"function","function":{"name":"list_accounts","arguments":"{}"}},
                    {"id":"call_2","type":"function","function":{"arguments":"{}"}},
                    {"type":"function","function":{"arguments":"{}"}}
                ]}}]}"#,
            )
            .unwrap();

        let calls = match result {
            CompletionResult::ToolCalls { calls, .. } => calls,
            other => panic!("expected tool calls, got {:?}", other),
        };
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ToolCall::new("call_1", "list_accounts", serde_json::json!({})));
        assert_eq!(calls[1].id, "call_2");
        assert!(calls[1].name.is_empty());
        assert!(calls[1]
            .arguments
            .as_str()
            .is_some_and(|a| a.starts_with("malformed tool call")));
    }

    #[test]
    fn test_parse_empty_variants() {
        let c = client();
        for body in [
            r#"{"choices":[]}"#,
            r#"{}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"","tool_calls":[]}}]}"#,
        ] {
            assert!(
                matches!(c.parse_response(body), Err(ProviderError::EmptyResponse { .. })),
                "body {} should be empty",
                body
            );
        }
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            client().parse_response("<html>bad gateway</html>"),
            Err(ProviderError::InvalidResponse { .. })
        ));
    }
}
