//! Tool transport
//!
//! The reporting tools live in a separate server process that speaks
//! JSON-RPC 2.0 over stdio. One call is one process:
//!
//! ```text
//! stdin  -> {"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":..,"arguments":..}}\n
//! stdout <- {"jsonrpc":"2.0","id":1,"result":{"content":[{"type":"text","text":..}]}}
//! ```
//!
//! Callers depend on the [`ToolTransport`] trait only; [`MockToolTransport`]
//! stands in for the process in tests.

mod transport;
mod stdio;
mod mock;

pub use transport::{parse_tool_reply, tool_call_request, RpcError, RpcResult, ToolTransport};
pub use stdio::{StdioServerConfig, StdioToolTransport};
pub use mock::{MockReply, MockToolTransport};
