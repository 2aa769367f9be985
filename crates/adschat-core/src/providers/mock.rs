//! Mock completion client for testing
//!
//! Replays a scripted list of outcomes without network access and records
//! every request so tests can assert on what was sent.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{ProviderError, ProviderResult};
use super::traits::{CompletionClient, CompletionResult};
use crate::logging::{Logger, NoOpLogger};
use crate::types::{ChatMessage, Tool};

/// One request seen by [`MockCompletionClient`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    /// `None` when the caller did not offer tools
    pub tools: Option<Vec<Tool>>,
}

impl RecordedRequest {
    pub fn offered_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Scripted LLM backend
pub struct MockCompletionClient {
    script: Mutex<VecDeque<ProviderResult<CompletionResult>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    logger: Arc<dyn Logger>,
}

impl MockCompletionClient {
    /// Create a client that answers with `responses` in order
    pub fn new(responses: Vec<ProviderResult<CompletionResult>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Create a client that always fails the first call with a transport error
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::new(vec![Err(ProviderError::transport("Mock", status, body))])
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Queue another response
    pub fn push_response(&self, response: ProviderResult<CompletionResult>) {
        self.script.lock().push_back(response);
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &str {
        "Mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> ProviderResult<CompletionResult> {
        self.requests.lock().push(RecordedRequest {
            messages: messages.to_vec(),
            tools: tools.map(<[Tool]>::to_vec),
        });
        crate::log_debug!(
            self.logger,
            "[MockCompletionClient] request #{} with {} message(s)",
            self.call_count(),
            messages.len()
        );

        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::empty_response("Mock", "script exhausted")))
    }
}
