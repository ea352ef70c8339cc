/// Number of recipes requested from the model per invocation
pub const RECIPE_COUNT: usize = 5;

/// Separator used when rendering ingredient names into the prompt
pub const INGREDIENT_SEPARATOR: &str = "、";

/// The instruction template sent to the generative model.
///
/// Loaded from `prompt.txt` at compile time. Contains `{{COUNT}}` and
/// `{{INGREDIENTS}}` placeholders filled in by [`build_recipe_prompt`].
pub const RECIPE_PROMPT_TEMPLATE: &str = include_str!("prompt.txt");

/// The output shape the model is told to produce
pub const RECIPE_JSON_SHAPE: &str = r#"{"recipes":[{"title":"","description":"","steps":""}]}"#;

/// Build the full prompt for a set of ingredient names.
///
/// Deterministic: the same names always produce the same prompt.
pub fn build_recipe_prompt<S: AsRef<str>>(ingredient_names: &[S]) -> String {
    let ingredients = ingredient_names
        .iter()
        .map(|name| name.as_ref().trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(INGREDIENT_SEPARATOR);

    RECIPE_PROMPT_TEMPLATE
        .trim()
        .replace("{{COUNT}}", &RECIPE_COUNT.to_string())
        .replace("{{INGREDIENTS}}", &ingredients)
}
