//! Simple API usage with convenience functions
//!
//! Needs GEMINI_API_KEY (or a config.toml with a provider) for the
//! suggestion part; the preview runs offline.

use fridge_recipes::{preview_items, suggest_recipes};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fridge = "鮭魚, 蛋\n高麗菜、白飯/豬絞肉";

    println!("=== Preview ===");
    for item in preview_items(fridge) {
        println!("{}\t{}", item.category, item.name);
    }

    println!("\n=== Suggestions ===");
    let result = suggest_recipes(fridge).await?;
    if let Some(error) = &result.error {
        println!("Model call failed: {}", error);
    } else if let Some(raw) = &result.raw {
        println!("Unreadable answer:\n{}", raw);
    }

    for recipe in &result.recipes {
        println!("\n## {}", recipe.title);
        println!("{}", recipe.description);
        println!("{}", recipe.steps);
    }

    Ok(())
}
