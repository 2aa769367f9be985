//! Single-shot JSON-RPC over a spawned process
//!
//! Each call spawns the tool server, writes one line-delimited `tools/call`
//! request to its stdin, closes stdin, and reads stdout to the end. The
//! process never outlives the call.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::transport::{parse_tool_reply, tool_call_request, RpcError, RpcResult, ToolTransport};
use crate::logging;

/// How to launch the tool server
#[derive(Debug, Clone, PartialEq)]
pub struct StdioServerConfig {
    /// Program to run
    pub command: String,
    /// Script passed as the first argument, checked for existence before spawning
    pub script: Option<PathBuf>,
    pub args: Vec<String>,
    /// Added to the inherited environment
    pub env: HashMap<String, String>,
    /// Upper bound for one call, spawn to exit
    pub timeout: Duration,
}

impl StdioServerConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            script: None,
            args: Vec::new(),
            env: HashMap::new(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Human-readable command line
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.command.clone()];
        if let Some(script) = &self.script {
            parts.push(script.display().to_string());
        }
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Tool transport that spawns one process per call
pub struct StdioToolTransport {
    config: StdioServerConfig,
    request_id: AtomicU64,
}

impl StdioToolTransport {
    pub fn new(config: StdioServerConfig) -> Self {
        Self {
            config,
            request_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &StdioServerConfig {
        &self.config
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.command);
        if let Some(script) = &self.config.script {
            cmd.arg(script);
        }
        cmd.args(&self.config.args)
            .envs(&self.config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn round_trip(&self, request: &[u8]) -> RpcResult<std::process::Output> {
        let mut child = self.build_command().spawn().map_err(|e| {
            logging::error("rpc::stdio", &format!("Spawn failed: {}", e));
            if e.kind() == std::io::ErrorKind::NotFound {
                RpcError::ProcessNotFound {
                    location: self.config.command.clone(),
                }
            } else {
                RpcError::Io(e)
            }
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A server that exits without reading stdin still gets its stdout parsed
            match stdin.write_all(request).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    logging::warn("rpc::stdio", "Tool server closed stdin early");
                }
                Err(e) => return Err(RpcError::Io(e)),
            }
            drop(stdin);
        }

        Ok(child.wait_with_output().await?)
    }
}

#[async_trait]
impl ToolTransport for StdioToolTransport {
    fn describe(&self) -> String {
        self.config.command_line()
    }

    async fn invoke(&self, name: &str, arguments: &Value) -> RpcResult<String> {
        if let Some(script) = &self.config.script {
            if !script.exists() {
                return Err(RpcError::ProcessNotFound {
                    location: script.display().to_string(),
                });
            }
        }

        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let mut line = serde_json::to_vec(&tool_call_request(id, name, arguments))
            .map_err(|e| RpcError::Protocol(e.to_string()))?;
        line.push(b'\n');

        logging::debug(
            "rpc::stdio",
            &format!("tools/call id={} name={} via {}", id, name, self.describe()),
        );

        let output = tokio::time::timeout(self.config.timeout, self.round_trip(&line))
            .await
            .map_err(|_| {
                logging::error("rpc::stdio", &format!("Tool call {} timed out", name));
                RpcError::Timeout {
                    seconds: self.config.timeout.as_secs(),
                }
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        logging::debug(
            "rpc::stdio",
            &format!(
                "id={} exit={:?} stdout_len={} stderr_len={}",
                id,
                output.status.code(),
                stdout.len(),
                output.stderr.len()
            ),
        );

        if stdout.trim().is_empty() && !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last = stderr.lines().last().unwrap_or_default().trim();
            return Err(RpcError::Protocol(format!(
                "No response from tool server (stderr: {})",
                last
            )));
        }

        parse_tool_reply(&stdout)
    }
}
