use crate::config::{AppConfig, ProviderConfig};
use crate::error::RecipeError;
use crate::providers::{
    AnthropicProvider, GoogleProvider, LlmProvider, OllamaProvider, OpenAIProvider,
};
use std::error::Error;
use std::time::Duration;

pub struct ProviderFactory;

fn provider_error(provider_name: &str, e: Box<dyn Error>) -> RecipeError {
    RecipeError::Provider(format!("{}: {}", provider_name, e))
}

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, RecipeError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(RecipeError::Provider(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        let provider: Box<dyn LlmProvider> = match provider_name {
            "google" => Box::new(
                GoogleProvider::new(config, timeout)
                    .map_err(|e| provider_error(provider_name, e))?,
            ),
            "openai" => Box::new(
                OpenAIProvider::new(config, timeout)
                    .map_err(|e| provider_error(provider_name, e))?,
            ),
            "anthropic" => Box::new(
                AnthropicProvider::new(config, timeout)
                    .map_err(|e| provider_error(provider_name, e))?,
            ),
            "ollama" => Box::new(
                OllamaProvider::new(config, timeout)
                    .map_err(|e| provider_error(provider_name, e))?,
            ),
            _ => {
                return Err(RecipeError::Provider(format!(
                    "Unknown provider: {}",
                    provider_name
                )))
            }
        };

        Ok(provider)
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(config: &AppConfig) -> Result<Box<dyn LlmProvider>, RecipeError> {
        let provider_name = &config.default_provider;
        let provider_config = config.providers.get(provider_name).ok_or_else(|| {
            RecipeError::Provider(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        Self::create(provider_name, provider_config, config.timeout())
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai", "anthropic", "ollama"]
    }
}
