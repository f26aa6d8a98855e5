pub mod doctor;
pub mod init;
pub mod run;
pub mod tools;

use std::sync::Arc;
use stepwright_config::AppConfig;
use stepwright_core::provider::Provider;
use stepwright_core::tool::ToolRegistry;
use stepwright_tools::ToolSettings;

/// Resolve the configured default provider.
pub fn default_provider(config: &AppConfig) -> Result<Arc<dyn Provider>, Box<dyn std::error::Error>> {
    let router = stepwright_providers::build_from_config(config);
    router
        .default()
        .ok_or_else(|| format!("Provider '{}' is not configured", router.default_name()).into())
}

/// Build the tool registry from the `[tools]` config section.
pub fn build_registry(config: &AppConfig, provider: Arc<dyn Provider>) -> ToolRegistry {
    stepwright_tools::default_registry(
        provider,
        ToolSettings {
            code_model: config.tools.code_model.clone(),
            shell: config.tools.shell.clone(),
            timeout: config.tools.timeout_secs.map(std::time::Duration::from_secs),
        },
    )
}
