//! `stepwright doctor` — diagnose config and provider health.

use stepwright_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Stepwright Doctor");
    println!("===================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults. Run `stepwright init` to create one.");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue found. See above for details.");
            return Ok(());
        }
    };

    println!("     Provider: {}", config.default_provider);
    println!("     Model:    {}", config.default_model);
    match config.agent.turn_limit() {
        Some(max) => println!("     Turns:    up to {max}"),
        None => println!("     Turns:    unbounded"),
    }

    if config.has_key_for(&config.default_provider) {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key configured. Set OPENAI_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    let provider = super::default_provider(&config)?;
    match provider.health_check().await {
        Ok(true) => {
            println!("  ✅ Provider '{}' reachable", provider.name());
            match provider.list_models().await {
                Ok(models) if models.contains(&config.default_model) => {
                    println!("  ✅ Model '{}' available", config.default_model);
                }
                Ok(models) if !models.is_empty() => {
                    println!(
                        "  ⚠️  Model '{}' not in the provider's {} listed models",
                        config.default_model,
                        models.len()
                    );
                    issues += 1;
                }
                Ok(_) => {}
                Err(e) => println!("  ⚠️  Could not list models: {e}"),
            }
        }
        Ok(false) => {
            println!("  ❌ Provider '{}' rejected the health check", provider.name());
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
