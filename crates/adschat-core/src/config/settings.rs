//! Resolved settings and the partial overlay read from config sources

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::providers::ChatCompletionsConfig;
use crate::rpc::StdioServerConfig;

pub const DEFAULT_MODEL: &str = "glm-4.7";
pub const DEFAULT_API_BASE: &str = "https://api.z.ai/api/paas/v4";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const DEFAULT_TOOL_COMMAND: &str = "python3";
pub const DEFAULT_TOOL_SCRIPT: &str = "google_ads_server.py";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant for Google Ads analysis. \
You have access to tools that can retrieve Google Ads data. \
When the user asks about their Google Ads campaigns, ads, or performance, \
use the appropriate tools to get the data, then analyze and present it \
in a clear, actionable way. Always explain what data you're retrieving \
and provide insights about the results.";

/// How to launch the reporting tool process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolServerSettings {
    /// Program to run (an interpreter when `script` is set)
    pub command: String,
    /// Script handed to `command` as its first argument
    pub script: Option<PathBuf>,
    /// Extra arguments after the script
    pub args: Vec<String>,
    /// Extra environment for the process, on top of the inherited one
    pub env: HashMap<String, String>,
}

impl Default for ToolServerSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_TOOL_COMMAND.to_string(),
            script: Some(PathBuf::from(DEFAULT_TOOL_SCRIPT)),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }
}

/// Fully resolved client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub tool_timeout_secs: u64,
    /// Messages kept between exchanges (system prompt not counted)
    pub history_limit: usize,
    pub system_prompt: String,
    /// Resend the tool catalogue on the follow-up completion
    pub send_tools_on_follow_up: bool,
    pub tool_server: ToolServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            send_tools_on_follow_up: false,
            tool_server: ToolServerSettings::default(),
        }
    }
}

impl Settings {
    /// Connection settings for the chat-completions client
    pub fn completion_config(&self, api_key: impl Into<String>) -> ChatCompletionsConfig {
        ChatCompletionsConfig::new(&self.model, api_key)
            .with_api_base(&self.api_base)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    /// Launch settings for the stdio tool transport
    pub fn tool_server_config(&self) -> StdioServerConfig {
        let server = &self.tool_server;
        let mut config = StdioServerConfig::new(&server.command)
            .with_args(server.args.clone())
            .with_timeout(Duration::from_secs(self.tool_timeout_secs));
        if let Some(script) = &server.script {
            config = config.with_script(script);
        }
        for (key, value) in &server.env {
            config = config.with_env(key, value);
        }
        config
    }
}

/// Partial tool server settings as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolServerFile {
    pub command: Option<String>,
    pub script: Option<PathBuf>,
    pub args: Option<Vec<String>>,
    pub env: Option<HashMap<String, String>>,
}

/// Configuration file structure; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub tool_timeout_secs: Option<u64>,
    pub history_limit: Option<usize>,
    pub system_prompt: Option<String>,
    pub send_tools_on_follow_up: Option<bool>,
    pub tool_server: Option<ToolServerFile>,
}

impl ConfigFile {
    /// Apply every field that is set onto `settings`
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = &self.model {
            settings.model = v.clone();
        }
        if let Some(v) = &self.api_base {
            settings.api_base = v.clone();
        }
        if let Some(v) = self.temperature {
            settings.temperature = v;
        }
        if let Some(v) = self.max_tokens {
            settings.max_tokens = v;
        }
        if let Some(v) = self.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
        if let Some(v) = self.tool_timeout_secs {
            settings.tool_timeout_secs = v;
        }
        if let Some(v) = self.history_limit {
            settings.history_limit = v;
        }
        if let Some(v) = &self.system_prompt {
            settings.system_prompt = v.clone();
        }
        if let Some(v) = self.send_tools_on_follow_up {
            settings.send_tools_on_follow_up = v;
        }
        if let Some(server) = &self.tool_server {
            if let Some(v) = &server.command {
                settings.tool_server.command = v.clone();
            }
            if let Some(v) = &server.script {
                settings.tool_server.script = Some(v.clone());
            }
            if let Some(v) = &server.args {
                settings.tool_server.args = v.clone();
            }
            if let Some(v) = &server.env {
                settings.tool_server.env.extend(v.clone());
            }
        }
    }
}
