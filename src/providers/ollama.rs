use crate::config::ProviderConfig;
use crate::error::BoxError;
use crate::providers::{ensure_success, http_client, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;
use std::time::Duration;

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaProvider {
    /// Create a new Ollama provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        Ok(OllamaProvider {
            client: http_client(timeout)?,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaProvider {
            client: Client::new(),
            base_url,
            model,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String, BoxError> {
        // Ollama uses OpenAI-compatible API
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        let response = ensure_success("Ollama", response).await?;
        let response_body: Value = response.json().await?;
        debug!("Ollama response: {:?}", response_body);

        // Check for API error response
        if let Some(error) = response_body.get("error") {
            let error_message = error
                .as_str()
                .unwrap_or_else(|| error["message"].as_str().unwrap_or("Unknown error"));
            return Err(format!("Ollama API error: {}", error_message).into());
        }

        let text = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                format!(
                    "Failed to extract content from Ollama response. Response: {}",
                    response_body
                )
            })?
            .to_string();

        Ok(text)
    }
}
