use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::images::{create_image_search, enrich_all, ImageSearch};
use crate::ingredients::split;
use crate::model::PipelineResult;
use crate::pipelines::interpret::interpret;
use crate::providers::{build_recipe_prompt, FallbackProvider, LlmProvider};
use log::{debug, info, warn};

/// Turns a list of ingredient names into illustrated recipe suggestions.
///
/// Holds no per-request state, so one pipeline can serve concurrent requests.
pub struct RecipePipeline {
    provider: Box<dyn LlmProvider>,
    images: Option<Box<dyn ImageSearch>>,
    qualifier: String,
}

impl RecipePipeline {
    /// A pipeline without image enrichment
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        RecipePipeline {
            provider,
            images: None,
            qualifier: "food".to_string(),
        }
    }

    pub fn with_image_search(mut self, search: Box<dyn ImageSearch>) -> Self {
        self.images = Some(search);
        self
    }

    /// Term appended to each recipe title when searching for its image
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Build the model chain and image search described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, RecipeError> {
        let provider = FallbackProvider::new(config)?;
        let images = create_image_search(&config.images, config.timeout())?;

        Ok(RecipePipeline {
            provider: Box::new(provider),
            images,
            qualifier: config.images.qualifier.clone(),
        })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub fn image_provider_name(&self) -> Option<&str> {
        self.images.as_deref().map(|search| search.provider_name())
    }

    /// Suggest recipes for `ingredient_names`.
    ///
    /// Only a missing ingredient list is an error, and it is reported before
    /// any network call. A failed model call or an unreadable answer comes
    /// back as an empty `PipelineResult` carrying the diagnostic.
    pub async fn run<S: AsRef<str>>(
        &self,
        ingredient_names: &[S],
    ) -> Result<PipelineResult, RecipeError> {
        let names = validate(ingredient_names)?;
        let prompt = build_recipe_prompt(&names);
        debug!("Prompt for {} ingredients:\n{}", names.len(), prompt);

        let raw_text = match self.provider.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("{} call failed: {}", self.provider.provider_name(), e);
                return Ok(PipelineResult::upstream_failure(e.to_string()));
            }
        };

        let result = interpret(&raw_text);
        if !result.is_success() {
            return Ok(result);
        }

        info!(
            "{} suggested {} recipes",
            self.provider.provider_name(),
            result.recipes.len()
        );

        let recipes = enrich_all(result.recipes, self.images.as_deref(), &self.qualifier).await;
        Ok(PipelineResult::success(recipes))
    }

    /// Split free text into ingredient names, then run
    pub async fn run_text(&self, raw: &str) -> Result<PipelineResult, RecipeError> {
        self.run(&split(raw)).await
    }
}

/// Non-blank, trimmed names; an empty result is a validation error
fn validate<S: AsRef<str>>(ingredient_names: &[S]) -> Result<Vec<&str>, RecipeError> {
    let names: Vec<&str> = ingredient_names
        .iter()
        .map(|name| name.as_ref().trim())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        return Err(RecipeError::Validation("items is required".to_string()));
    }
    Ok(names)
}
