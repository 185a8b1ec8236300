//! REPL command parsing
//!
//! Commands are bare words, not slash-prefixed: `exit`/`quit` terminate,
//! `search <query>` runs the web search, `clear` resets the transcript,
//! `save [path]` exports it, `help` lists commands. Anything else is an
//! ordinary chat turn.

use colored::*;

/// Parsed REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ordinary chat turn
    Chat { text: String },

    /// Web search, results summarized by the model
    Search { query: String },

    /// Reset the transcript
    Clear,

    /// Export the transcript as plain text; default filename when no path
    Save { path: Option<String> },

    /// List available commands
    Help,

    /// Terminate the session
    Exit,
}

/// Parse one input line into a command
///
/// Keywords are matched case-insensitively, as in `search Rust borrow
/// checker` or `EXIT`. A bare `search` with no query falls through to chat
/// so the model can ask what to look for.
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();

    match lowered.as_str() {
        "exit" | "quit" => return Command::Exit,
        "clear" => return Command::Clear,
        "help" => return Command::Help,
        "save" => return Command::Save { path: None },
        _ => {}
    }

    if let Some(rest) = strip_keyword(trimmed, &lowered, "search ") {
        if !rest.trim().is_empty() {
            return Command::Search {
                query: rest.trim().to_string(),
            };
        }
    }

    if let Some(rest) = strip_keyword(trimmed, &lowered, "save ") {
        if !rest.trim().is_empty() {
            return Command::Save {
                path: Some(rest.trim().to_string()),
            };
        }
    }

    Command::Chat {
        text: trimmed.to_string(),
    }
}

/// Case-insensitive keyword prefix, returning the original-cased remainder
fn strip_keyword<'a>(original: &'a str, lowered: &str, keyword: &str) -> Option<&'a str> {
    if lowered.starts_with(keyword) {
        Some(&original[keyword.len()..])
    } else {
        None
    }
}

/// Print the command reference
pub fn show_help() {
    println!("\n{}", "Available Commands:".bold().green());
    println!("{}", "=".repeat(60).green());

    let commands = vec![
        ("search <query>", "Search the web and summarize the results"),
        ("save [path]", "Save the transcript to a .txt file"),
        ("clear", "Clear the chat history"),
        ("help", "Show this help message"),
        ("exit, quit", "Leave the chat"),
    ];

    for (cmd, desc) in commands {
        println!("  {:<20} {}", cmd.green(), desc);
    }

    println!("\n  Anything else is sent to the model as a chat message.\n");
}
