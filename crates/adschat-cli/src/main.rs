//! AdsChat CLI
//!
//! Ask questions about Google Ads accounts in plain language. With
//! `--message` a single exchange runs and the answer is printed; without it
//! an interactive session reads questions from stdin.

mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use adschat_core::config::{FileConfigProvider, Settings, SettingsOverrides, SettingsResolver};
use adschat_core::logging::{self, ConsoleLogger, FilterLogger, LogLevel, Logger};
use adschat_core::secrets::ChainSecretStore;
use adschat_core::tools::definitions;
use adschat_core::Orchestrator;

/// Credential key looked up in the secret chain
const PROVIDER: &str = "zai";

#[derive(Parser, Debug)]
#[command(name = "adschat", version, about = "Chat with your Google Ads data through a GLM model")]
struct Cli {
    /// API key (falls back to ZAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// Single message to send; starts an interactive session when omitted
    #[arg(short, long)]
    message: Option<String>,

    /// Base URL of the chat-completions API (falls back to ZAI_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Program that runs the reporting tool server
    #[arg(long)]
    tool_command: Option<String>,

    /// Tool server script passed to the tool command
    #[arg(long)]
    tool_script: Option<PathBuf>,

    /// Print the tool catalogue and exit
    #[arg(long)]
    list_tools: bool,

    /// Log debug output to stderr (tool activity is logged either way)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_tools {
        print_tools();
        return Ok(());
    }

    let logger: Arc<dyn Logger> = Arc::new(FilterLogger::new(
        Arc::new(ConsoleLogger::new()),
        if cli.verbose { LogLevel::Debug } else { LogLevel::Info },
    ));

    if logging::is_enabled() {
        logger.info(&format!("Debug log: {}", logging::log_file_path().display()));
    }

    let settings = resolve_settings(&cli)?;
    logger.debug(&format!(
        "Using model {} at {} (tools via {})",
        settings.model,
        settings.api_base,
        settings.tool_server_config().command_line()
    ));

    let secrets = ChainSecretStore::explicit_then_env(PROVIDER, cli.api_key.as_deref());
    let api_key = secrets.require_api_key(PROVIDER)?;
    logger.debug(&format!(
        "API key from {} store",
        secrets.source_of(PROVIDER).unwrap_or("unknown")
    ));

    let orchestrator = Orchestrator::from_settings(&settings, api_key, Arc::clone(&logger))
        .context("failed to create chat client")?;

    match cli.message {
        Some(message) => session::run_single(&orchestrator, &message).await,
        None => session::run_interactive(&orchestrator, settings.history_limit).await,
    }
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let provider = match &cli.config {
        Some(path) => {
            let provider = FileConfigProvider::new(path);
            if !provider.exists() {
                bail!("config file not found: {}", path.display());
            }
            provider
        }
        None => FileConfigProvider::user(),
    };

    let overrides = SettingsOverrides {
        model: cli.model.clone(),
        api_base: cli.base_url.clone(),
        tool_command: cli.tool_command.clone(),
        tool_script: cli.tool_script.clone(),
    };

    let resolver = SettingsResolver::new().with_provider(Arc::new(provider));
    resolver
        .resolve(&overrides)
        .with_context(|| format!("failed to load settings (config: {})", resolver.sources().join(", ")))
}

fn print_tools() {
    for tool in definitions() {
        let required = tool.required_parameters();
        if required.is_empty() {
            println!("{:<24} {}", tool.name, tool.description);
        } else {
            println!(
                "{:<24} {} (requires: {})",
                tool.name,
                tool.description,
                required.join(", ")
            );
        }
    }
}
