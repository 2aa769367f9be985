//! Conversation history owned by the caller

use serde::{Deserialize, Serialize};

use super::message::{ChatMessage, MessageRole};

/// Ordered message history for one chat session
///
/// Exchanges only ever append. The caller decides how much history to keep
/// between exchanges via [`Conversation::retain_last`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation that starts with a system prompt
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(prompt)],
        }
    }

    /// Append a message
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Append several messages in order
    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.extend(messages);
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Whether the conversation opens with a system message
    pub fn has_system_prompt(&self) -> bool {
        self.messages
            .first()
            .is_some_and(|m| m.role == MessageRole::System)
    }

    /// Keep the leading system message (if any) plus the last `limit` other messages
    ///
    /// A cut that lands inside a tool round drops the remaining fragment of
    /// that round, so every kept `tool` message still follows the assistant
    /// message that requested it.
    pub fn retain_last(&mut self, limit: usize) {
        let head = usize::from(self.has_system_prompt());
        let body_len = self.messages.len() - head;
        if body_len <= limit {
            return;
        }

        let mut start = head + (body_len - limit);
        while start < self.messages.len() {
            let msg = &self.messages[start];
            let orphaned_tool = msg.role == MessageRole::Tool;
            let unanswered_calls = msg.has_tool_calls() && !self.results_follow(start);
            if orphaned_tool || unanswered_calls {
                start += 1;
            } else {
                break;
            }
        }
        self.messages.drain(head..start);
    }

    /// Whether every call of the assistant message at `index` is answered after it
    fn results_follow(&self, index: usize) -> bool {
        let answered: Vec<&str> = self.messages[index + 1..]
            .iter()
            .take_while(|m| m.role == MessageRole::Tool)
            .filter_map(|m| m.tool_call_id.as_deref())
            .collect();
        self.messages[index]
            .tool_call_ids()
            .all(|id| answered.contains(&id))
    }

    /// Check that every `tool` message answers a call from an earlier assistant message
    pub fn is_consistent(&self) -> bool {
        let mut requested: Vec<&str> = Vec::new();
        for msg in &self.messages {
            match msg.role {
                MessageRole::Assistant => requested.extend(msg.tool_call_ids()),
                MessageRole::Tool => match msg.tool_call_id.as_deref() {
                    Some(id) if requested.contains(&id) => {}
                    _ => return false,
                },
                _ => {}
            }
        }
        true
    }
}

impl From<Vec<ChatMessage>> for Conversation {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;
    use serde_json::json;

    fn tool_round(id: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::assistant_tool_calls(
                None,
                vec![ToolCall::new(id, "list_accounts", json!({}))],
            ),
            ChatMessage::tool(id, "[]"),
        ]
    }

    #[test]
    fn test_retain_keeps_system_prompt() {
        let mut conv = Conversation::with_system_prompt("be brief");
        for i in 0..30 {
            conv.push(ChatMessage::user(format!("q{}", i)));
        }

        conv.retain_last(20);

        assert_eq!(conv.len(), 21);
        assert!(conv.has_system_prompt());
        assert_eq!(conv.messages()[1].text(), Some("q10"));
    }

    #[test]
    fn test_retain_noop_under_limit() {
        let mut conv = Conversation::new();
        conv.push(ChatMessage::user("hi"));
        conv.retain_last(20);
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn test_retain_drops_orphaned_tool_messages() {
        let mut conv = Conversation::new();
        conv.push(ChatMessage::user("list my accounts"));
        conv.extend(tool_round("call_1"));
        conv.push(ChatMessage::assistant("You have no accounts."));

        // Cutting to 2 would start on the tool message
        conv.retain_last(2);

        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].text(), Some("You have no accounts."));
        assert!(conv.is_consistent());
    }

    #[test]
    fn test_retain_keeps_complete_round() {
        let mut conv = Conversation::new();
        conv.push(ChatMessage::user("old"));
        conv.push(ChatMessage::user("list my accounts"));
        conv.extend(tool_round("call_1"));
        conv.push(ChatMessage::assistant("none"));

        conv.retain_last(4);

        assert_eq!(conv.len(), 4);
        assert!(conv.messages()[1].has_tool_calls());
        assert!(conv.is_consistent());
    }

    #[test]
    fn test_consistency_check() {
        let mut conv = Conversation::new();
        conv.push(ChatMessage::tool("call_x", "stray"));
        assert!(!conv.is_consistent());

        let mut conv = Conversation::new();
        conv.extend(tool_round("call_1"));
        assert!(conv.is_consistent());
    }
}
