pub mod builder;
pub mod config;
pub mod error;
pub mod images;
pub mod ingredients;
pub mod inventory;
pub mod model;
pub mod pipelines;
pub mod providers;
pub mod server;

// Re-export commonly used types
pub use builder::{IngredientSource, LlmProvider, RecipeSuggester, RecipeSuggesterBuilder};
pub use error::RecipeError;
pub use ingredients::{classify, split, PreviewItem};
pub use model::{Category, PipelineResult, RecipeRecord};
pub use pipelines::{interpret, RecipePipeline};

/// Suggest recipes for free-text ingredients using the configured provider
///
/// # Arguments
/// * `text` - Ingredients separated by newlines, commas, 、 or slashes
///
/// # Example
/// ```no_run
/// use fridge_recipes::suggest_recipes;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let result = suggest_recipes("鮭魚, 蛋, 豆腐").await?;
///     for recipe in result.recipes {
///         println!("{}", recipe.title);
///     }
///     Ok(())
/// }
/// ```
pub async fn suggest_recipes(text: &str) -> Result<PipelineResult, RecipeError> {
    RecipeSuggester::builder().text(text).build().await
}

/// Suggest recipes for already separated ingredient names
///
/// # Example
/// ```no_run
/// use fridge_recipes::suggest_recipes_for;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let result = suggest_recipes_for(&["高麗菜", "豬絞肉"]).await?;
///     println!("{} recipes", result.recipes.len());
///     Ok(())
/// }
/// ```
pub async fn suggest_recipes_for<S: AsRef<str>>(
    names: &[S],
) -> Result<PipelineResult, RecipeError> {
    RecipeSuggester::builder()
        .ingredients(names.iter().map(|name| name.as_ref().to_string()))
        .build()
        .await
}

/// Split and classify free text without calling any external service
///
/// # Example
/// ```
/// use fridge_recipes::{preview_items, Category};
///
/// let items = preview_items("鮭魚、高麗菜");
/// assert_eq!(items[0].category, Category::Seafood);
/// assert_eq!(items[1].category, Category::Vegetable);
/// ```
pub fn preview_items(text: &str) -> Vec<PreviewItem> {
    ingredients::preview(text, &ingredients::Classifier::default())
}
