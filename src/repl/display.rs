//! Terminal output for the chat REPL
//!
//! Streams reply fragments straight to stdout as they arrive, with a
//! spinner shown between submission and the first fragment.

use crate::relay::{EventSink, RelayEvent};
use async_trait::async_trait;
use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Display manager for REPL output
pub struct DisplayManager {
    quiet: bool,
}

impl DisplayManager {
    pub fn new(quiet: bool) -> Self {
        DisplayManager { quiet }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str, search_backend: &str) {
        if self.quiet {
            return;
        }
        let width = 64;
        println!("\n{}", "=".repeat(width).green());
        println!("{}", format!("  OMI {} - Local Ollama Chat", version).bold().green());
        println!(
            "{}",
            format!("  Model: {} | Search: {} | Mode: REPL", model, search_backend).dimmed()
        );
        println!("{}\n", "=".repeat(width).green());
        println!(
            "Type a message, {} to browse the web, or {} to quit\n",
            "search <topic>".green(),
            "exit".green()
        );
    }

    /// Hint printed when Ctrl-C is caught
    pub fn show_interrupt_hint(&self) {
        println!("\n{}", "Use 'exit' to quit.".yellow());
    }

    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Notice printed before a search call goes out
    pub fn show_search_notice(&self, backend: &str, query: &str) {
        println!(
            "\n{}",
            format!("System: Searching {} for '{}'...", backend, query).dimmed()
        );
    }

    pub fn show_saved(&self, path: &str) {
        println!("{}", format!("Transcript saved to {}", path).green());
    }

    pub fn show_cleared(&self) {
        println!("{}", "Chat history cleared.".yellow());
    }

    pub fn show_goodbye(&self) {
        println!("{}", "Goodbye!".green());
    }

    /// Clear the terminal, skipped in quiet mode
    pub fn clear_screen(&self) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

/// Event sink rendering one turn onto the terminal
///
/// The REPL runs relay and presentation on the same task, so fragments are
/// printed directly instead of being marshaled over a channel.
pub struct TerminalSink {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl TerminalSink {
    pub fn new(quiet: bool) -> Self {
        TerminalSink {
            spinner: Mutex::new(None),
            quiet,
        }
    }

    fn start_spinner(&self) {
        if self.quiet {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("OMI is thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.lock_spinner() = Some(pb);
    }

    fn stop_spinner(&self) {
        if let Some(pb) = self.lock_spinner().take() {
            pb.finish_and_clear();
        }
    }

    fn lock_spinner(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.spinner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn print_reply_header(&self) {
        if !self.quiet {
            print!("{} ", "OMI:".green().bold());
        }
    }

    fn stream_fragment(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }
}

#[async_trait]
impl EventSink for TerminalSink {
    async fn emit(&self, event: RelayEvent) {
        match event {
            RelayEvent::UserCommitted { .. } => {
                // The user just typed it; no echo needed.
            }
            RelayEvent::AwaitingReply => {
                self.start_spinner();
            }
            RelayEvent::Fragment { text } => {
                if self.lock_spinner().is_some() {
                    self.stop_spinner();
                    self.print_reply_header();
                }
                self.stream_fragment(&text);
            }
            RelayEvent::TurnComplete { .. } => {
                // Reply may have been empty; make sure the spinner is gone
                // and the prompt starts on a fresh line.
                self.stop_spinner();
                println!();
            }
            RelayEvent::TurnFailed { diagnostic } => {
                self.stop_spinner();
                println!("{}", diagnostic.red());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelayEvent;

    #[test]
    fn test_display_manager_modes() {
        assert!(!DisplayManager::new(false).is_quiet());
        assert!(DisplayManager::new(true).is_quiet());
    }

    #[test]
    fn test_quiet_clear_screen_is_noop() {
        assert!(DisplayManager::new(true).clear_screen().is_ok());
    }

    #[tokio::test]
    async fn test_sink_spinner_lifecycle() {
        let sink = TerminalSink::new(false);

        sink.emit(RelayEvent::AwaitingReply).await;
        assert!(sink.lock_spinner().is_some());

        sink.emit(RelayEvent::Fragment {
            text: String::new(),
        })
        .await;
        assert!(sink.lock_spinner().is_none());
    }

    #[tokio::test]
    async fn test_sink_spinner_cleared_on_failure() {
        let sink = TerminalSink::new(false);

        sink.emit(RelayEvent::AwaitingReply).await;
        sink.emit(RelayEvent::TurnFailed {
            diagnostic: "[Error: test]".to_string(),
        })
        .await;
        assert!(sink.lock_spinner().is_none());
    }

    #[tokio::test]
    async fn test_quiet_sink_never_spins() {
        let sink = TerminalSink::new(true);
        sink.emit(RelayEvent::AwaitingReply).await;
        assert!(sink.lock_spinner().is_none());
    }
}
