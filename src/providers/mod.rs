mod anthropic;
mod factory;
mod fallback;
mod google;
mod ollama;
mod open_ai;
pub mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use google::GoogleProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_recipe_prompt, RECIPE_COUNT, RECIPE_PROMPT_TEMPLATE};

use crate::error::BoxError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

/// Unified trait for all generative model providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Send a prompt and return the raw text of the model's answer
    async fn generate(&self, prompt: &str) -> Result<String, BoxError>;
}

/// HTTP client shared by the providers; the timeout covers the whole request
pub(crate) fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Turn a non-2xx response into an error carrying status and body
pub(crate) async fn ensure_success(
    provider: &str,
    response: Response,
) -> Result<Response, BoxError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(format!("{} API error ({}): {}", provider, status, body).into())
}
