use std::time::Duration;

use crate::config::{AppConfig, ProviderConfig, DEFAULT_GEMINI_MODEL};
use crate::images::create_image_search;
use crate::ingredients::split;
use crate::pipelines::RecipePipeline;
use crate::providers::ProviderFactory;
use crate::{PipelineResult, RecipeError};

/// Where the ingredient names come from
#[derive(Debug, Clone)]
pub enum IngredientSource {
    /// Free text, split on newlines, commas, 、 and slashes
    Text(String),
    /// Names that are already separated
    Names(Vec<String>),
}

impl IngredientSource {
    fn into_names(self) -> Vec<String> {
        match self {
            IngredientSource::Text(text) => split(&text),
            IngredientSource::Names(names) => names
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }
}

/// Generative model vendor to use instead of the configured default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Google,
    OpenAI,
    Anthropic,
    Ollama,
}

impl LlmProvider {
    /// Look up a vendor by the name used in configuration
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "google" => Some(LlmProvider::Google),
            "openai" => Some(LlmProvider::OpenAI),
            "anthropic" => Some(LlmProvider::Anthropic),
            "ollama" => Some(LlmProvider::Ollama),
            _ => None,
        }
    }

    /// Convert to provider name string used by the factory
    fn as_str(&self) -> &str {
        match self {
            LlmProvider::Google => "google",
            LlmProvider::OpenAI => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Ollama => "ollama",
        }
    }

    fn default_model(&self) -> &str {
        match self {
            LlmProvider::Google => DEFAULT_GEMINI_MODEL,
            LlmProvider::OpenAI => "gpt-4.1-mini",
            LlmProvider::Anthropic => "claude-3-5-haiku-latest",
            LlmProvider::Ollama => "llama3.2",
        }
    }
}

/// Builder for one-shot recipe suggestions
#[derive(Debug)]
pub struct RecipeSuggesterBuilder {
    source: Option<IngredientSource>,
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    images: bool,
}

impl Default for RecipeSuggesterBuilder {
    fn default() -> Self {
        RecipeSuggesterBuilder {
            source: None,
            provider: None,
            api_key: None,
            model: None,
            base_url: None,
            timeout: None,
            images: true,
        }
    }
}

impl RecipeSuggesterBuilder {
    /// Use free text as the ingredient list
    ///
    /// # Example
    /// ```
    /// use fridge_recipes::RecipeSuggester;
    ///
    /// let builder = RecipeSuggester::builder()
    ///     .text("鮭魚, 蛋\n豆腐");
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(IngredientSource::Text(text.into()));
        self
    }

    /// Use already separated ingredient names, e.g. items picked from the fridge
    ///
    /// # Example
    /// ```
    /// use fridge_recipes::RecipeSuggester;
    ///
    /// let builder = RecipeSuggester::builder()
    ///     .ingredients(["高麗菜", "豬絞肉"]);
    /// ```
    pub fn ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = Some(IngredientSource::Names(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Use a specific model vendor instead of the configured default
    ///
    /// # Example
    /// ```
    /// use fridge_recipes::{LlmProvider, RecipeSuggester};
    ///
    /// let builder = RecipeSuggester::builder()
    ///     .text("蛋")
    ///     .provider(LlmProvider::Anthropic);
    /// ```
    pub fn provider(mut self, provider: LlmProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Pass the API key directly instead of relying on the environment or config files
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Send model requests to a proxy or self-hosted endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for each outbound HTTP request
    ///
    /// # Example
    /// ```
    /// use fridge_recipes::RecipeSuggester;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeSuggester::builder()
    ///     .text("蛋")
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Skip image lookup even when an image provider is configured
    pub fn without_images(mut self) -> Self {
        self.images = false;
        self
    }

    fn has_provider_overrides(&self) -> bool {
        self.provider.is_some()
            || self.api_key.is_some()
            || self.model.is_some()
            || self.base_url.is_some()
    }

    /// Build the pipeline and run it once
    ///
    /// # Errors
    /// Returns `RecipeError` if:
    /// - No ingredient source was specified (`Builder`)
    /// - The source contains no ingredient names (`Validation`)
    /// - Configuration cannot be loaded or no model provider can be constructed
    ///
    /// A failed model call is not an error; see [`PipelineResult`].
    ///
    /// # Example
    /// ```no_run
    /// # use fridge_recipes::RecipeSuggester;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = RecipeSuggester::builder()
    ///     .text("鮭魚、蛋、豆腐")
    ///     .build()
    ///     .await?;
    /// for recipe in result.recipes {
    ///     println!("{}", recipe.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(mut self) -> Result<PipelineResult, RecipeError> {
        let source = self.source.take().ok_or_else(|| {
            RecipeError::Builder(
                "No ingredient source specified. Use .text() or .ingredients()".to_string(),
            )
        })?;

        // Reject before loading config so a missing key cannot mask bad input
        let names = source.into_names();
        if names.is_empty() {
            return Err(RecipeError::Validation("items is required".to_string()));
        }

        let mut config = AppConfig::load()?;
        self.apply_timeout(&mut config);
        let timeout = config.timeout();

        let pipeline = if self.has_provider_overrides() {
            let provider = self.resolve_provider(&config)?;
            let provider_config = self.provider_config(&config, provider);
            let llm = ProviderFactory::create(provider.as_str(), &provider_config, timeout)?;
            let mut pipeline =
                RecipePipeline::new(llm).with_qualifier(config.images.qualifier.clone());
            if self.images {
                if let Some(search) = create_image_search(&config.images, timeout)? {
                    pipeline = pipeline.with_image_search(search);
                }
            }
            pipeline
        } else {
            if !self.images {
                config.images.provider = None;
            }
            RecipePipeline::from_config(&config)?
        };

        pipeline.run(&names).await
    }

    fn apply_timeout(&self, config: &mut AppConfig) {
        if let Some(timeout) = self.timeout {
            config.timeout = timeout.as_secs_f64();
        }
    }

    /// The explicit vendor, else the configured default
    fn resolve_provider(&self, config: &AppConfig) -> Result<LlmProvider, RecipeError> {
        match self.provider {
            Some(provider) => Ok(provider),
            None => LlmProvider::from_name(&config.default_provider).ok_or_else(|| {
                RecipeError::Builder(format!(
                    "Unknown default provider '{}'; call .provider() to choose one",
                    config.default_provider
                ))
            }),
        }
    }

    /// Configured settings for `provider`, with the builder's overrides applied
    fn provider_config(&self, config: &AppConfig, provider: LlmProvider) -> ProviderConfig {
        let mut provider_config =
            config
                .providers
                .get(provider.as_str())
                .cloned()
                .unwrap_or_else(|| ProviderConfig {
                    enabled: true,
                    model: provider.default_model().to_string(),
                    temperature: 0.7,
                    max_tokens: 2000,
                    api_key: None,
                    base_url: None,
                });

        provider_config.enabled = true;
        if let Some(api_key) = &self.api_key {
            provider_config.api_key = Some(api_key.clone());
        }
        if let Some(model) = &self.model {
            provider_config.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            provider_config.base_url = Some(base_url.clone());
        }
        provider_config
    }
}

/// Main entry point for the builder API
pub struct RecipeSuggester;

impl RecipeSuggester {
    /// Creates a new builder for suggesting recipes
    ///
    /// # Example
    /// ```
    /// use fridge_recipes::RecipeSuggester;
    ///
    /// let builder = RecipeSuggester::builder();
    /// ```
    pub fn builder() -> RecipeSuggesterBuilder {
        RecipeSuggesterBuilder::default()
    }
}
