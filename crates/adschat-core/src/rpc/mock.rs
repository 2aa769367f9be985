//! In-memory tool transport for tests

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::transport::{parse_tool_reply, RpcError, RpcResult, ToolTransport};

/// Canned reply for one tool
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful text result
    Text(String),
    /// Raw stdout, run through the same reply parser as the stdio transport
    Raw(String),
    /// Application-level failure
    Error(String),
    /// Endpoint missing
    NotFound,
}

/// Transport that answers from a table of canned replies
pub struct MockToolTransport {
    replies: HashMap<String, MockReply>,
    fallback: Option<MockReply>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockToolTransport {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply to `name` with `reply`
    pub fn with_reply(mut self, name: impl Into<String>, reply: MockReply) -> Self {
        self.replies.insert(name.into(), reply);
        self
    }

    /// Reply used for tools without an entry
    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    /// `(name, arguments)` of every invocation, oldest first
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockToolTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolTransport for MockToolTransport {
    fn describe(&self) -> String {
        "mock".to_string()
    }

    async fn invoke(&self, name: &str, arguments: &Value) -> RpcResult<String> {
        self.calls.lock().push((name.to_string(), arguments.clone()));

        match self.replies.get(name).or(self.fallback.as_ref()) {
            Some(MockReply::Text(text)) => Ok(text.clone()),
            Some(MockReply::Raw(raw)) => parse_tool_reply(raw),
            Some(MockReply::Error(message)) => Err(RpcError::Application(message.clone())),
            Some(MockReply::NotFound) | None => Err(RpcError::ProcessNotFound {
                location: "mock".to_string(),
            }),
        }
    }
}
