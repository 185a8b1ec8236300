//! Line input for the REPL using rustyline
//!
//! Provides line editing with persistent history. Ctrl-C surfaces as
//! `ReadOutcome::Interrupted` so the loop can print a hint and continue
//! instead of terminating, matching the REPL's interrupt policy.

use crate::errors::{ChatError, Result};
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// What one read attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line of input (possibly empty)
    Line(String),

    /// Ctrl-C; the loop continues
    Interrupted,

    /// Ctrl-D; the loop exits
    Eof,
}

/// Input handler managing the readline interface and command history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| ChatError::Generic(format!("Failed to initialize readline: {}", e)))?;

        Ok(InputHandler {
            editor,
            history_path: None,
            prompt: "(omi) > ".to_string(),
        })
    }

    /// Create an input handler with persistent history
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut handler = Self::new()?;
        if history_file.exists() {
            let _ = handler.editor.load_history(&history_file);
        }
        handler.history_path = Some(history_file);
        Ok(handler)
    }

    /// Read one line from the user
    pub fn read_line(&mut self) -> Result<ReadOutcome> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed);
                }
                Ok(ReadOutcome::Line(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(ChatError::Generic(format!("Readline error: {}", err))),
        }
    }

    /// Save history to disk, called on graceful shutdown
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.editor
                .save_history(path)
                .map_err(|e| ChatError::Generic(format!("Failed to save history: {}", e)))?;
        }
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}
