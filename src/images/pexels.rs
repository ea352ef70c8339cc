use crate::config::ImageConfig;
use crate::error::BoxError;
use crate::images::ImageSearch;
use crate::providers::{ensure_success, http_client};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::error::Error;
use std::time::Duration;

pub struct PexelsSearch {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PexelsSearch {
    /// Create a new Pexels search from configuration
    pub fn new(config: &ImageConfig, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("PEXELS_API_KEY").ok())
            .ok_or("PEXELS_API_KEY not found in config or environment")?;

        Ok(PexelsSearch {
            client: http_client(timeout)?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.pexels.com".to_string()),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        PexelsSearch {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl ImageSearch for PexelsSearch {
    fn provider_name(&self) -> &str {
        "pexels"
    }

    async fn search(&self, query: &str) -> Result<Option<String>, BoxError> {
        let response = self
            .client
            .get(format!("{}/v1/search", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", "1")])
            .send()
            .await?;

        let response = ensure_success("Pexels", response).await?;
        let response_body: Value = response.json().await?;
        debug!("Pexels response: {:?}", response_body);

        Ok(response_body["photos"][0]["src"]["medium"]
            .as_str()
            .map(String::from))
    }
}
