//! Single-message and interactive chat sessions

use std::io::ErrorKind;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use adschat_core::{Conversation, Orchestrator};

/// Run one exchange and print the reply
pub async fn run_single(orchestrator: &Orchestrator, message: &str) -> Result<()> {
    let outcome = orchestrator
        .exchange(orchestrator.new_conversation(), message)
        .await;
    println!("{}", outcome.reply);
    Ok(())
}

/// Read questions from stdin until `quit`, `exit`, `q` or end of input
///
/// Failed exchanges print their diagnostic and the session carries on.
pub async fn run_interactive(orchestrator: &Orchestrator, history_limit: usize) -> Result<()> {
    eprintln!(
        "AdsChat ({} via {}). Type 'quit' to exit.\n",
        orchestrator.client().model(),
        orchestrator.client().name()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut conversation = orchestrator.new_conversation();

    loop {
        eprint!("You: ");
        let line = match lines.next_line().await {
            Ok(Some(l)) => l.trim().to_string(),
            Ok(None) => break,
            // The undecodable line is consumed, so the next read starts clean
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                eprintln!("Error: {}", e);
                continue;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        };

        if line.is_empty() {
            continue;
        }
        if is_exit_command(&line) {
            eprintln!("Goodbye!");
            break;
        }

        let outcome = orchestrator.exchange(conversation, &line).await;
        println!("\nAssistant: {}\n", outcome.reply);

        conversation = outcome.conversation;
        trim_history(&mut conversation, history_limit);
    }

    Ok(())
}

fn is_exit_command(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "quit" | "exit" | "q")
}

fn trim_history(conversation: &mut Conversation, limit: usize) {
    conversation.retain_last(limit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use adschat_core::ChatMessage;

    #[test]
    fn test_exit_commands() {
        for cmd in ["quit", "exit", "q", "QUIT", "Exit"] {
            assert!(is_exit_command(cmd), "{} should exit", cmd);
        }
        assert!(!is_exit_command("quit please"));
        assert!(!is_exit_command("show campaigns"));
    }

    #[test]
    fn test_trim_history_keeps_system_prompt() {
        let mut conv = Conversation::with_system_prompt("prompt");
        for i in 0..25 {
            conv.push(ChatMessage::user(format!("m{}", i)));
        }
        trim_history(&mut conv, 20);
        assert_eq!(conv.len(), 21);
        assert!(conv.has_system_prompt());
    }
}
