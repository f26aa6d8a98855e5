//! `stepwright tools` — show what the model can call.

use stepwright_config::AppConfig;

pub async fn run(show_prompt: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let provider = super::default_provider(&config)?;
    let registry = super::build_registry(&config, provider);
    let definitions = registry.definitions();

    if show_prompt {
        print!("{}", stepwright_agent::system_prompt(&definitions));
        return Ok(());
    }

    println!("🛠️  Available tools ({})", definitions.len());
    println!("======================\n");
    for def in &definitions {
        println!("  {:<16} {}", def.name, def.description);
    }

    println!();
    println!("  generate_code model: {}", config.tools.code_model);
    match config.tools.timeout_secs {
        Some(secs) => println!("  Tool timeout:        {secs}s"),
        None => println!("  Tool timeout:        none"),
    }

    Ok(())
}
