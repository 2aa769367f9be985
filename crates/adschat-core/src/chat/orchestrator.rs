//! One user turn: completion, at most one tool round, final answer

use std::sync::Arc;

use crate::config::Settings;
use crate::logging::{self, Logger};
use crate::providers::{ChatCompletionsClient, CompletionClient, CompletionResult, ProviderResult};
use crate::rpc::{StdioToolTransport, ToolTransport};
use crate::tools::{ToolExecutor, ToolRegistry};
use crate::types::{ChatMessage, Conversation, ToolResult};

use super::error::{ExchangeError, ExchangeResult};

/// Where an exchange currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// First completion sent, tools offered
    AwaitingTools,
    /// Running the calls the model asked for
    ExecutingTools,
    Done,
}

impl std::fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingTools => write!(f, "awaiting-tools"),
            Self::ExecutingTools => write!(f, "executing-tools"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Result of [`Orchestrator::exchange`]
#[derive(Debug)]
pub struct ExchangeOutcome {
    /// The conversation with everything this exchange appended
    pub conversation: Conversation,
    /// Final answer, or a diagnostic when `error` is set
    pub reply: String,
    pub error: Option<ExchangeError>,
    /// Results of the tool round, in call order (empty when no tools ran)
    pub tool_results: Vec<ToolResult>,
}

impl ExchangeOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Drives a conversation through one exchange
///
/// Holds no per-conversation state, so one orchestrator can serve any number
/// of conversations.
pub struct Orchestrator {
    client: Arc<dyn CompletionClient>,
    executor: ToolExecutor,
    system_prompt: Option<String>,
    follow_up_tools: bool,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn CompletionClient>, executor: ToolExecutor, logger: Arc<dyn Logger>) -> Self {
        Self {
            client,
            executor,
            system_prompt: None,
            follow_up_tools: false,
            logger,
        }
    }

    /// Wire the HTTP client and stdio tool transport from resolved settings
    pub fn from_settings(
        settings: &Settings,
        api_key: impl Into<String>,
        logger: Arc<dyn Logger>,
    ) -> ProviderResult<Self> {
        let client = ChatCompletionsClient::new(settings.completion_config(api_key), Arc::clone(&logger))?;
        let transport: Arc<dyn ToolTransport> =
            Arc::new(StdioToolTransport::new(settings.tool_server_config()));
        let executor = ToolExecutor::new(transport, ToolRegistry::google_ads(), Arc::clone(&logger));

        Ok(Self::new(Arc::new(client), executor, logger)
            .with_system_prompt(settings.system_prompt.clone())
            .with_follow_up_tools(settings.send_tools_on_follow_up))
    }

    /// System prompt placed at the head of new conversations
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = (!prompt.trim().is_empty()).then_some(prompt);
        self
    }

    /// Offer the tool catalogue on the follow-up completion as well
    pub fn with_follow_up_tools(mut self, enabled: bool) -> Self {
        self.follow_up_tools = enabled;
        self
    }

    pub fn client(&self) -> &dyn CompletionClient {
        self.client.as_ref()
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.executor.registry()
    }

    /// Start a conversation, with the system prompt if one is configured
    pub fn new_conversation(&self) -> Conversation {
        match &self.system_prompt {
            Some(prompt) => Conversation::with_system_prompt(prompt.clone()),
            None => Conversation::new(),
        }
    }

    /// Run one exchange for `user_text`
    ///
    /// Never fails: completion problems end the exchange with a diagnostic in
    /// `reply` and the typed cause in `error`. Messages are only ever appended
    /// to `conversation`.
    pub async fn exchange(&self, mut conversation: Conversation, user_text: &str) -> ExchangeOutcome {
        conversation.push(ChatMessage::user(user_text));
        let mut tool_results = Vec::new();

        let result = self.run(&mut conversation, &mut tool_results).await;
        match result {
            Ok(reply) => ExchangeOutcome {
                conversation,
                reply,
                error: None,
                tool_results,
            },
            Err(error) => {
                crate::log_error!(self.logger, "[Orchestrator] Exchange failed: {}", error);
                ExchangeOutcome {
                    conversation,
                    reply: error.reply_text(),
                    error: Some(error),
                    tool_results,
                }
            }
        }
    }

    async fn run(&self, conversation: &mut Conversation, tool_results: &mut Vec<ToolResult>) -> ExchangeResult<String> {
        let tools = self.executor.registry().definitions();
        let mut state = ExchangeState::AwaitingTools;
        self.trace(state, conversation);

        let first = self.client.complete(conversation.messages(), Some(tools)).await?;
        let (calls, content) = match first {
            CompletionResult::Text { content } => {
                conversation.push(ChatMessage::assistant(content.clone()));
                self.trace(ExchangeState::Done, conversation);
                return Ok(content);
            }
            CompletionResult::ToolCalls { calls, content } => (calls, content),
        };

        state = ExchangeState::ExecutingTools;
        self.trace(state, conversation);
        self.logger.info(&format!(
            "[Orchestrator] Model requested {} tool(s): {}",
            calls.len(),
            calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
        ));

        conversation.push(ChatMessage::assistant_tool_calls(content, calls.clone()));
        let results = self.executor.execute_all(&calls).await;
        conversation.extend(results.iter().cloned().map(ChatMessage::from));
        *tool_results = results;

        let follow_up_tools = self.follow_up_tools.then_some(tools);
        let second = self.client.complete(conversation.messages(), follow_up_tools).await?;

        state = ExchangeState::Done;
        self.trace(state, conversation);
        match second {
            CompletionResult::Text { content } => {
                conversation.push(ChatMessage::assistant(content.clone()));
                Ok(content)
            }
            CompletionResult::ToolCalls { calls, content } => {
                // The extra calls are never answered, so only the text is kept
                let content = content.unwrap_or_default();
                if !content.is_empty() {
                    conversation.push(ChatMessage::assistant(content.clone()));
                }
                Err(ExchangeError::ProtocolViolation {
                    count: calls.len(),
                    content,
                })
            }
        }
    }

    fn trace(&self, state: ExchangeState, conversation: &Conversation) {
        logging::debug(
            "chat::orchestrator",
            &format!("state={} messages={}", state, conversation.len()),
        );
    }
}
