use crate::config::AppConfig;
use crate::error::{BoxError, RecipeError};
use crate::providers::{LlmProvider, ProviderFactory};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Tries providers in order, retrying each a bounded number of times
pub struct FallbackProvider {
    providers: Vec<Box<dyn LlmProvider>>,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl FallbackProvider {
    /// Create a new fallback provider from configuration
    pub fn new(config: &AppConfig) -> Result<Self, RecipeError> {
        if !config.fallback.enabled {
            // If fallback is disabled, just use the default provider
            let default_provider = ProviderFactory::get_default_provider(config)?;
            return Ok(FallbackProvider {
                providers: vec![default_provider],
                retry_attempts: 1,
                retry_delay_ms: 0,
            });
        }

        let mut providers = Vec::new();

        // Create providers in fallback order
        for provider_name in &config.fallback.order {
            if let Some(provider_config) = config.providers.get(provider_name) {
                if provider_config.enabled {
                    match ProviderFactory::create(provider_name, provider_config, config.timeout())
                    {
                        Ok(provider) => {
                            info!("Added '{}' to fallback chain", provider_name);
                            providers.push(provider);
                        }
                        Err(e) => {
                            warn!("Failed to initialize provider '{}': {}", provider_name, e);
                        }
                    }
                }
            } else {
                warn!(
                    "Provider '{}' in fallback order not found in configuration",
                    provider_name
                );
            }
        }

        if providers.is_empty() {
            return Err(RecipeError::Provider(
                "No providers available in fallback configuration".to_string(),
            ));
        }

        Ok(FallbackProvider {
            providers,
            retry_attempts: config.fallback.retry_attempts.max(1),
            retry_delay_ms: config.fallback.retry_delay_ms,
        })
    }

    /// Build a chain from already constructed providers
    pub fn from_providers(
        providers: Vec<Box<dyn LlmProvider>>,
        retry_attempts: u32,
        retry_delay_ms: u64,
    ) -> Self {
        FallbackProvider {
            providers,
            retry_attempts: retry_attempts.max(1),
            retry_delay_ms,
        }
    }

    /// Try a provider, waiting a little longer after each failed attempt
    async fn try_provider_with_retry(
        &self,
        provider: &dyn LlmProvider,
        prompt: &str,
    ) -> Result<String, String> {
        let mut last_error = String::new();

        for attempt in 1..=self.retry_attempts {
            debug!(
                "Generating with {} (attempt {}/{})",
                provider.provider_name(),
                attempt,
                self.retry_attempts
            );

            match provider.generate(prompt).await {
                Ok(text) => {
                    info!("Generated recipes using {}", provider.provider_name());
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        "Provider {} failed (attempt {}/{}): {}",
                        provider.provider_name(),
                        attempt,
                        self.retry_attempts,
                        e
                    );
                    last_error = e.to_string();
                }
            }

            // Sleep only if we need to retry
            if attempt < self.retry_attempts {
                let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
                debug!("Waiting {:?} before retry", delay);
                sleep(delay).await;
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl LlmProvider for FallbackProvider {
    fn provider_name(&self) -> &str {
        match self.providers.as_slice() {
            [only] => only.provider_name(),
            _ => "fallback",
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, BoxError> {
        let mut all_errors: Vec<String> = Vec::new();

        for provider in &self.providers {
            match self
                .try_provider_with_retry(provider.as_ref(), prompt)
                .await
            {
                Ok(text) => return Ok(text),
                Err(e) => {
                    all_errors.push(format!("{}: {}", provider.provider_name(), e));
                }
            }
        }

        Err(format!("All providers failed:\n{}", all_errors.join("\n")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FallbackConfig, ProviderConfig};
    use crate::providers::OpenAIProvider;
    use mockito::Server;
    use std::collections::HashMap;

    fn provider_config(api_key: &str) -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "test-model".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            api_key: Some(api_key.to_string()),
            base_url: None,
        }
    }

    fn create_test_config_with_fallback() -> AppConfig {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), provider_config("test-key"));

        AppConfig {
            default_provider: "openai".to_string(),
            providers,
            fallback: FallbackConfig {
                enabled: true,
                order: vec!["openai".to_string()],
                retry_attempts: 3,
                retry_delay_ms: 100,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_provider_creation() {
        let config = create_test_config_with_fallback();
        let fallback = FallbackProvider::new(&config).unwrap();
        assert_eq!(fallback.providers.len(), 1);
        assert_eq!(fallback.retry_attempts, 3);
    }

    #[test]
    fn test_fallback_disabled() {
        let mut config = create_test_config_with_fallback();
        config.fallback.enabled = false;

        let fallback = FallbackProvider::new(&config).unwrap();
        // With fallback disabled, only the default provider is used, once
        assert_eq!(fallback.providers.len(), 1);
        assert_eq!(fallback.retry_attempts, 1);
        assert_eq!(fallback.provider_name(), "openai");
    }

    #[test]
    fn test_fallback_no_providers() {
        let mut config = create_test_config_with_fallback();
        config.providers.clear();

        let result = FallbackProvider::new(&config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("No providers available"));
        }
    }

    #[test]
    fn test_fallback_multiple_providers() {
        let mut config = create_test_config_with_fallback();
        config
            .providers
            .insert("anthropic".to_string(), provider_config("test-key-2"));
        config.fallback.order = vec!["openai".to_string(), "anthropic".to_string()];

        let fallback = FallbackProvider::new(&config).unwrap();
        assert_eq!(fallback.providers.len(), 2);
        assert_eq!(fallback.provider_name(), "fallback");
    }

    #[tokio::test]
    async fn test_falls_through_to_next_provider() {
        let mut failing = Server::new_async().await;
        let failing_mock = failing
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let mut working = Server::new_async().await;
        let working_mock = working
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"content": "ok"}}]}"#)
            .create_async()
            .await;

        let fallback = FallbackProvider::from_providers(
            vec![
                Box::new(OpenAIProvider::with_base_url(
                    "k".to_string(),
                    failing.url(),
                    "m".to_string(),
                )),
                Box::new(OpenAIProvider::with_base_url(
                    "k".to_string(),
                    working.url(),
                    "m".to_string(),
                )),
            ],
            2,
            0,
        );

        assert_eq!(fallback.generate("食材：蛋").await.unwrap(), "ok");
        failing_mock.assert_async().await;
        working_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_all_providers_failing() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let fallback = FallbackProvider::from_providers(
            vec![Box::new(OpenAIProvider::with_base_url(
                "k".to_string(),
                server.url(),
                "m".to_string(),
            ))],
            1,
            0,
        );

        let err = fallback.generate("食材：蛋").await.unwrap_err();
        assert!(err.to_string().contains("All providers failed"));
    }
}
