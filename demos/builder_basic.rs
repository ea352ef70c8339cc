//! Basic usage of the RecipeSuggester builder API
//!
//! 1. Free text with the configured provider
//! 2. Picked fridge items with an explicit provider and model

use fridge_recipes::{LlmProvider, RecipeSuggester};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Free text ===");
    let result = RecipeSuggester::builder()
        .text("番茄, 蛋, 青蔥")
        .build()
        .await?;

    for recipe in &result.recipes {
        println!("- {} {}", recipe.title, recipe.image.as_deref().unwrap_or(""));
    }

    println!("\n=== Picked items, explicit provider ===");
    let api_key = std::env::var("OPENAI_API_KEY")?;
    let result = RecipeSuggester::builder()
        .ingredients(["高麗菜", "豬絞肉", "冬粉"])
        .provider(LlmProvider::OpenAI)
        .api_key(api_key)
        .model("gpt-4.1-mini")
        .timeout(Duration::from_secs(60))
        .without_images()
        .build()
        .await?;

    for recipe in &result.recipes {
        println!("\n## {}\n{}", recipe.title, recipe.steps);
    }

    Ok(())
}
