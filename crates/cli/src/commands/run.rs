//! `stepwright run` — send one request through the step loop.

use std::sync::Arc;
use stepwright_agent::AgentLoop;
use stepwright_config::AppConfig;
use stepwright_core::error::Error;
use stepwright_core::event::EventBus;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::render;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Local backends don't need a key
    if !config.has_key_for(&config.default_provider)
        && config.api_url.is_none()
        && config.default_provider != "ollama"
    {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    STEPWRIGHT_API_KEY=sk-...");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!("    OPENROUTER_API_KEY=sk-or-v1-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let request = match message {
        Some(message) => message,
        None => ask("What would you like to do? ").await?,
    };

    if request.trim().is_empty() {
        println!("No prompt provided. Exiting.");
        return Ok(());
    }

    let provider = super::default_provider(&config)?;
    let tools = Arc::new(super::build_registry(&config, provider.clone()));

    let event_bus = Arc::new(EventBus::default());
    let renderer = tokio::spawn(render::render_events(event_bus.subscribe()));

    let agent = AgentLoop::new(provider, &config.default_model, tools, Arc::clone(&event_bus))
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens)
        .with_max_turns(config.agent.turn_limit())
        .with_json_mode(config.agent.json_mode);

    let result = agent.run(&request).await;

    // Close the bus so the renderer drains and exits
    drop(agent);
    drop(event_bus);
    if let Err(e) = renderer.await {
        tracing::warn!(error = %e, "Event renderer task failed");
    }

    match result {
        Ok(report) => {
            tracing::debug!(turns = report.turns, messages = report.transcript.len(), "Run finished");
            println!("{}", render::answer_line(&report.answer));
        }
        Err(Error::Protocol(e)) => {
            println!("Error parsing JSON from model: {}", e.raw());
        }
        Err(e) => return Err(e.into()),
    }

    println!("Done...");
    Ok(())
}

/// Print `question` and read one line from stdin. EOF reads as empty.
async fn ask(question: &str) -> std::io::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    Ok(lines.next_line().await?.unwrap_or_default())
}
