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

pub struct UnsplashSearch {
    client: Client,
    access_key: String,
    base_url: String,
}

impl UnsplashSearch {
    /// Create a new Unsplash search from configuration
    pub fn new(config: &ImageConfig, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let access_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("UNSPLASH_ACCESS_KEY").ok())
            .ok_or("UNSPLASH_ACCESS_KEY not found in config or environment")?;

        Ok(UnsplashSearch {
            client: http_client(timeout)?,
            access_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.unsplash.com".to_string()),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(access_key: String, base_url: String) -> Self {
        UnsplashSearch {
            client: Client::new(),
            access_key,
            base_url,
        }
    }
}

#[async_trait]
impl ImageSearch for UnsplashSearch {
    fn provider_name(&self) -> &str {
        "unsplash"
    }

    async fn search(&self, query: &str) -> Result<Option<String>, BoxError> {
        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[("query", query), ("per_page", "1")])
            .send()
            .await?;

        let response = ensure_success("Unsplash", response).await?;
        let response_body: Value = response.json().await?;
        debug!("Unsplash response: {:?}", response_body);

        Ok(response_body["results"][0]["urls"]["regular"]
            .as_str()
            .map(String::from))
    }
}
