//! Colloquy - Multi-Agent Group Chat Orchestration
//!
//! Main entry point for the CLI application.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colloquy::agent::cancellation;
use colloquy::cli::{render_header, render_outcome, render_topics, render_transcript};
use colloquy::llm::OpenAiClient;
use colloquy::{logging, pipeline, Config};

/// Colloquy - a planner, researcher, writer and critic produce content together
#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topic to write about
    #[arg(long, short = 't', default_value = "Python asyncio basics")]
    topic: String,

    /// Content type (technical_blog, tutorial, documentation, email)
    #[arg(long, short = 'c')]
    content_type: Option<String>,

    /// Round ceiling for the session
    #[arg(long, short = 'r')]
    max_rounds: Option<usize>,

    /// Model used by every agent
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// List knowledge base topics and content types, then exit
    #[arg(long)]
    list_topics: bool,

    /// Print the effective configuration, then exit
    #[arg(long)]
    show_config: bool,

    /// Write a default config file, then exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Build configuration; problems are reported once logging is up
    let (mut config, load_warnings) = Config::load_with_warnings();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.llm.model = model.clone();
    }

    if let Some(rounds) = args.max_rounds {
        config.session.max_rounds = rounds;
    }

    if let Some(ref content_type) = args.content_type {
        config.session.content_type = content_type.clone();
    }

    if args.debug {
        config.logging.level = "debug".to_string();
    }

    if args.list_topics {
        print!("{}", render_topics());
        return Ok(ExitCode::SUCCESS);
    }

    logging::init_logging(&config.logging, args.debug);
    for warning in &load_warnings {
        tracing::warn!("{warning}");
    }

    if args.init_config {
        if Config::config_exists() {
            eprintln!(
                "Config file already exists at {}",
                Config::config_file().display()
            );
            return Ok(ExitCode::FAILURE);
        }
        let path = Config::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    if args.show_config {
        println!("# {}", Config::config_file().display());
        print!("{}", config.redacted().to_toml());
        return Ok(ExitCode::SUCCESS);
    }

    config.validate()?;

    if config.llm.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; requests will be sent without credentials");
    }

    let provider = Arc::new(
        OpenAiClient::from_config(&config.llm).context("Failed to create the model client")?,
    );

    let topic = args.topic.trim();
    let content_type = config.session.content_type.clone();
    println!("{}", render_header(&config, topic, &content_type));

    let (handle, token) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling session");
            handle.cancel();
        }
    });

    let outcome =
        pipeline::run_content_pipeline(&config, provider, topic, &content_type, token).await?;

    println!("{}", render_transcript(&outcome.history));
    println!("{}", render_outcome(&outcome));

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
