//! Core types for tool-calling conversations
//!
//! This module contains the shared types used by the completion client,
//! the tool executor and the orchestrator.

mod message;
mod tool;
mod conversation;

pub use message::{ChatMessage, MessageRole};
pub use tool::{Tool, ToolCall, ToolResult};
pub use conversation::Conversation;
