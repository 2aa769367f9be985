//! Conversation orchestration
//!
//! ```text
//! user text -> complete(tools) -> Text ---------------------------> reply
//!                              -> ToolCalls -> execute_all -> complete -> reply
//! ```
//!
//! At most one tool round runs per exchange. A second request for tools is
//! reported as [`ExchangeError::ProtocolViolation`], never followed.

mod error;
mod orchestrator;

pub use error::{ExchangeError, ExchangeResult};
pub use orchestrator::{ExchangeOutcome, ExchangeState, Orchestrator};
