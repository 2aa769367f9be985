//! Tool transport capability and its error type

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while invoking a tool over a transport
#[derive(Error, Debug)]
pub enum RpcError {
    /// The tool endpoint could not be started or reached
    #[error("Tool server not found at {location}")]
    ProcessNotFound { location: String },

    /// The reply did not follow the JSON-RPC shape
    #[error("Invalid reply from tool server: {0}")]
    Protocol(String),

    /// The tool ran and reported a failure
    #[error("Tool server error: {0}")]
    Application(String),

    #[error("Tool call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RpcResult<T> = Result<T, RpcError>;

/// Something that can run a named tool and hand back its text result
///
/// The orchestrator only ever sees this interface, so tests can swap the
/// spawned process for an in-memory fake.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Short description of the endpoint for diagnostics
    fn describe(&self) -> String;

    /// Invoke `name` with `arguments` and return the tool's text output
    async fn invoke(&self, name: &str, arguments: &Value) -> RpcResult<String>;
}

/// Build the `tools/call` request envelope
pub fn tool_call_request(id: u64, name: &str, arguments: &Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {
            "name": name,
            "arguments": arguments,
        }
    })
}

/// Extract the text result from a raw reply
///
/// Accepts `{"result": {"content": [{"text": ...}, ...]}}` (parts joined with
/// newlines) or `{"error": ...}`. If the whole output is not JSON, the last
/// non-empty line is tried, since some servers print a banner first.
pub fn parse_tool_reply(raw: &str) -> RpcResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RpcError::Protocol("No response from tool server".to_string()));
    }

    let reply: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => trimmed
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| serde_json::from_str(line.trim()).ok())
            .ok_or_else(|| RpcError::Protocol(format!("reply is not JSON ({})", e)))?,
    };

    if let Some(error) = reply.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            Value::Object(obj) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
            other => other.to_string(),
        };
        return Err(RpcError::Application(message));
    }

    let result = reply
        .get("result")
        .ok_or_else(|| RpcError::Protocol("reply has neither result nor error".to_string()))?;

    let texts: Vec<&str> = result
        .get("content")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if texts.is_empty() {
        return Err(RpcError::Protocol("result has no text content".to_string()));
    }

    let text = texts.join("\n");
    if result.get("isError").and_then(Value::as_bool).unwrap_or(false) {
        return Err(RpcError::Application(text));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope() {
        let req = tool_call_request(7, "get_account_currency", &json!({"customer_id": "1234567890"}));
        assert_eq!(req["jsonrpc"], "2.0");
        assert_eq!(req["id"], 7);
        assert_eq!(req["method"], "tools/call");
        assert_eq!(req["params"]["name"], "get_account_currency");
        assert_eq!(req["params"]["arguments"]["customer_id"], "1234567890");
    }

    #[test]
    fn test_parse_text_result() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"result":{"content":[{"type":"text","text":"USD"}]}}"#;
        assert_eq!(parse_tool_reply(raw).unwrap(), "USD");
    }

    #[test]
    fn test_parse_joins_parts() {
        let raw = r#"{"result":{"content":[{"type":"text","text":"a"},{"type":"image"},{"type":"text","text":"b"}]}}"#;
        assert_eq!(parse_tool_reply(raw).unwrap(), "a\nb");
    }

    #[test]
    fn test_parse_after_banner() {
        let raw = "Starting Google Ads server...\n{\"result\":{\"content\":[{\"text\":\"[]\"}]}}\n";
        assert_eq!(parse_tool_reply(raw).unwrap(), "[]");
    }

    #[test]
    fn test_parse_error_field() {
        let raw = r#"{"error":{"code":-32000,"message":"customer not found"}}"#;
        match parse_tool_reply(raw) {
            Err(RpcError::Application(msg)) => assert_eq!(msg, "customer not found"),
            other => panic!("unexpected: {:?}", other),
        }

        assert!(matches!(
            parse_tool_reply(r#"{"error":"boom"}"#),
            Err(RpcError::Application(m)) if m == "boom"
        ));
    }

    #[test]
    fn test_parse_is_error_result() {
        let raw = r#"{"result":{"isError":true,"content":[{"text":"quota exceeded"}]}}"#;
        assert!(matches!(parse_tool_reply(raw), Err(RpcError::Application(m)) if m == "quota exceeded"));
    }

    #[test]
    fn test_parse_protocol_failures() {
        for raw in ["", "   \n", "not json at all", r#"{"id":1}"#, r#"{"result":{"content":[]}}"#] {
            assert!(
                matches!(parse_tool_reply(raw), Err(RpcError::Protocol(_))),
                "{:?} should be a protocol error",
                raw
            );
        }
    }
}
