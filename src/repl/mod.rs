//! Interactive chat REPL
//!
//! Ties line input, command parsing, the streaming relay, and the search
//! provider into one read-eval-print loop. All turns, including search
//! summarizations, run serially through the relay's single-in-flight
//! discipline.

pub mod commands;
pub mod display;
pub mod input;

use crate::errors::{ChatError, Result};
use crate::ollama::OllamaClient;
use crate::relay::{ChatRelay, TurnOutcome};
use crate::search::{self, SearchProvider};
use std::path::PathBuf;

pub use commands::Command;
pub use display::{DisplayManager, TerminalSink};
pub use input::{InputHandler, ReadOutcome};

/// REPL session coordinator
pub struct ReplSession {
    input: InputHandler,
    display: DisplayManager,
    relay: ChatRelay<OllamaClient>,
    provider: Box<dyn SearchProvider>,
    search_limit: usize,
    quiet: bool,
}

impl ReplSession {
    pub fn new(
        client: OllamaClient,
        provider: Box<dyn SearchProvider>,
        search_limit: usize,
        history_file: Option<PathBuf>,
        quiet: bool,
    ) -> Result<Self> {
        let input = match history_file {
            Some(path) => InputHandler::with_history(path)?,
            None => InputHandler::new()?,
        };

        Ok(ReplSession {
            input,
            display: DisplayManager::new(quiet),
            relay: ChatRelay::new(client),
            provider,
            search_limit,
            quiet,
        })
    }

    /// Run the loop until `exit`, `quit`, or Ctrl-D
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.input.read_line()? {
                ReadOutcome::Line(line) => {
                    if !self.handle_input(&line).await? {
                        break;
                    }
                }
                ReadOutcome::Interrupted => {
                    self.display.show_interrupt_hint();
                }
                ReadOutcome::Eof => break,
            }
        }

        self.display.show_goodbye();
        self.input.save_history()?;
        Ok(())
    }

    /// Handle one input line; returns false when the session should end
    pub async fn handle_input(&mut self, line: &str) -> Result<bool> {
        if line.trim().is_empty() {
            return Ok(true);
        }

        match commands::parse(line) {
            Command::Exit => Ok(false),
            Command::Help => {
                commands::show_help();
                Ok(true)
            }
            Command::Clear => {
                match self.relay.clear() {
                    Ok(()) => {
                        self.display.clear_screen()?;
                        self.display.show_cleared();
                    }
                    Err(e) => self.display.show_error(&e.to_string()),
                }
                Ok(true)
            }
            Command::Save { path } => {
                self.save_transcript(path);
                Ok(true)
            }
            Command::Search { query } => {
                self.display
                    .show_search_notice(self.provider.name(), &query);
                let block =
                    search::fetch_formatted(self.provider.as_ref(), &query, self.search_limit)
                        .await;
                let prompt = search::summarize_prompt(&query, &block);
                self.run_turn(&prompt).await;
                Ok(true)
            }
            Command::Chat { text } => {
                self.run_turn(&text).await;
                Ok(true)
            }
        }
    }

    /// Drive one relay turn, rendering through the terminal sink
    async fn run_turn(&self, text: &str) {
        let sink = TerminalSink::new(self.quiet);
        match self.relay.submit(text, &sink).await {
            // Success and failure are both already rendered by the sink;
            // a failed turn leaves the relay usable for the next one.
            Ok(TurnOutcome::Completed { .. })
            | Ok(TurnOutcome::Failed { .. })
            | Ok(TurnOutcome::Ignored) => {}
            Err(ChatError::TurnInFlight) => {
                self.display
                    .show_error("A reply is still streaming; wait for it to finish.");
            }
            Err(e) => self.display.show_error(&e.to_string()),
        }
    }

    fn save_transcript(&self, path: Option<String>) {
        let path = path.unwrap_or_else(default_export_name);
        match std::fs::write(&path, self.relay.export_plain_text()) {
            Ok(()) => self.display.show_saved(&path),
            Err(e) => self.display.show_error(&format!("Failed to save: {}", e)),
        }
    }

    /// Show welcome banner
    pub fn show_welcome(&self, version: &str, model: &str) {
        self.display
            .show_banner(version, model, self.provider.name());
    }

    /// Number of committed transcript messages
    pub fn transcript_len(&self) -> usize {
        self.relay.transcript_len()
    }

    pub fn relay(&self) -> &ChatRelay<OllamaClient> {
        &self.relay
    }
}

/// Default export filename, `omi_chat_<unix-ts>.txt`
fn default_export_name() -> String {
    format!("omi_chat_{}.txt", chrono::Utc::now().timestamp())
}
