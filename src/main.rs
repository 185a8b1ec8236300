//! omichat - Main CLI entry point

use anyhow::Result;
use clap::Parser;
use colored::*;
use omichat::cli::{Args, Commands, Config};
use omichat::ollama::OllamaClient;
use omichat::relay::{ChatRelay, TurnOutcome};
use omichat::repl::{ReplSession, TerminalSink};
use omichat::search;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.clone())?;
    args.apply_to(&mut config);
    config.validate()?;

    let client = OllamaClient::with_config(&config.ollama_url(), &config.ollama.model)?;

    match args.command {
        Some(Commands::Models) => {
            run_models(&client).await?;
        }
        Some(Commands::Config) => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        None => {
            if !client.health_check().await {
                eprintln!(
                    "{} {}",
                    "Error:".red().bold(),
                    format!(
                        "Ollama is not reachable at {}. Start it with: ollama serve",
                        config.ollama_url()
                    )
                    .red()
                );
                std::process::exit(1);
            }

            match args.prompt {
                Some(ref prompt) => run_one_shot(client, prompt, args.quiet).await?,
                None => run_repl(client, &config, args.quiet).await?,
            }
        }
    }

    Ok(())
}

/// List locally available models
async fn run_models(client: &OllamaClient) -> Result<()> {
    let models = client.list_models().await?;
    if models.is_empty() {
        println!("No local models found. Pull one with: ollama pull <model>");
    } else {
        for model in models {
            println!("{}", model);
        }
    }
    Ok(())
}

/// Single streamed turn, then exit; nonzero status on a failed turn
async fn run_one_shot(client: OllamaClient, prompt: &str, quiet: bool) -> Result<()> {
    let relay = ChatRelay::new(client);
    let sink = TerminalSink::new(quiet);

    match relay.submit(prompt, &sink).await? {
        TurnOutcome::Completed { .. } | TurnOutcome::Ignored => Ok(()),
        TurnOutcome::Failed { .. } => std::process::exit(1),
    }
}

/// Interactive REPL session
async fn run_repl(client: OllamaClient, config: &Config, quiet: bool) -> Result<()> {
    let provider = search::make_provider(&config.search.backend, &config.search.searx_url)?;

    let mut session = ReplSession::new(
        client,
        provider,
        config.search.max_results,
        config.history_path(),
        quiet,
    )?;

    session.show_welcome(env!("CARGO_PKG_VERSION"), &config.ollama.model);
    session.run().await?;
    Ok(())
}
