//! Command-line argument parsing
//!
//! Flags override the corresponding configuration values; subcommands
//! cover model listing and configuration display. With no subcommand and
//! no prompt, the interactive REPL starts.

use crate::cli::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// omichat - Chat with a local Ollama model from the terminal
#[derive(Parser, Debug)]
#[command(name = "omichat")]
#[command(version)]
#[command(about = "Chat with a local Ollama model, stream replies live, and search the web", long_about = None)]
pub struct Args {
    /// One-shot prompt: run a single turn, print the reply, and exit
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Ollama model to chat with
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama host
    #[arg(long)]
    pub host: Option<String>,

    /// Ollama port
    #[arg(long)]
    pub port: Option<u16>,

    /// Search backend: duckduckgo or searx
    #[arg(long, value_name = "BACKEND")]
    pub search: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Suppress banner, spinner, and reply header (useful for piping)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List locally available Ollama models
    Models,

    /// Display the effective configuration
    Config,
}

impl Args {
    /// Layer flag overrides onto the loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref model) = self.model {
            config.ollama.model = model.clone();
        }
        if let Some(ref host) = self.host {
            config.ollama.host = host.clone();
        }
        if let Some(port) = self.port {
            config.ollama.port = port;
        }
        if let Some(ref backend) = self.search {
            config.search.backend = backend.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_config_untouched() {
        let args = Args::parse_from(["omichat"]);
        let mut config = Config::default();
        let before = config.ollama_url();
        args.apply_to(&mut config);
        assert_eq!(config.ollama_url(), before);
        assert!(args.prompt.is_none());
        assert!(!args.quiet);
    }

    #[test]
    fn test_flag_overrides() {
        let args = Args::parse_from([
            "omichat", "--model", "llama3.2:3b", "--host", "10.0.0.5", "--port", "11500",
            "--search", "searx",
        ]);
        let mut config = Config::default();
        args.apply_to(&mut config);

        assert_eq!(config.ollama.model, "llama3.2:3b");
        assert_eq!(config.ollama_url(), "http://10.0.0.5:11500");
        assert_eq!(config.search.backend, "searx");
    }

    #[test]
    fn test_one_shot_prompt() {
        let args = Args::parse_from(["omichat", "why is the sky blue?"]);
        assert_eq!(args.prompt.as_deref(), Some("why is the sky blue?"));
    }

    #[test]
    fn test_models_subcommand() {
        let args = Args::parse_from(["omichat", "models"]);
        assert!(matches!(args.command, Some(Commands::Models)));
    }

    #[test]
    fn test_config_subcommand() {
        let args = Args::parse_from(["omichat", "config"]);
        assert!(matches!(args.command, Some(Commands::Config)));
    }

    #[test]
    fn test_quiet_flag() {
        let args = Args::parse_from(["omichat", "-q", "hello"]);
        assert!(args.quiet);
    }
}
