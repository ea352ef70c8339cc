use crate::model::{PipelineResult, RecipeRecord};
use log::{debug, warn};
use serde_json::Value;

/// Interpret the model's raw answer as a list of recipes.
///
/// Tries a strict parse first, then re-parses the outermost `{...}` span to
/// recover from surrounding prose or code fences. When neither yields a
/// usable recipe the result is empty and carries `raw_text` verbatim.
/// Never fails.
pub fn interpret(raw_text: &str) -> PipelineResult {
    if let Some(recipes) = parse_recipes(raw_text) {
        return PipelineResult::success(recipes);
    }

    if let Some(span) = outermost_braces(raw_text) {
        debug!("Strict parse failed, retrying on {} byte brace span", span.len());
        if let Some(recipes) = parse_recipes(span) {
            return PipelineResult::success(recipes);
        }
    }

    warn!(
        "Could not interpret model output as recipes ({} bytes)",
        raw_text.len()
    );
    PipelineResult::unparsed(raw_text)
}

/// The span from the first `{` to the last `}`, inclusive
fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Parse `text` as JSON and pull out the usable recipes, if any
fn parse_recipes(text: &str) -> Option<Vec<RecipeRecord>> {
    let json: Value = serde_json::from_str(text.trim()).ok()?;
    let recipes = recipes_from_value(&json)?;
    if recipes.is_empty() {
        None
    } else {
        Some(recipes)
    }
}

fn recipes_from_value(json: &Value) -> Option<Vec<RecipeRecord>> {
    match json {
        Value::Object(map) => {
            let list = map.get("recipes")?.as_array()?;
            Some(list.iter().filter_map(record_from_value).collect())
        }
        // A bare list of recipe objects
        Value::Array(list) => Some(list.iter().filter_map(record_from_value).collect()),
        // The whole answer JSON-encoded once more
        Value::String(inner) => {
            let nested: Value = serde_json::from_str(inner.trim()).ok()?;
            match nested {
                Value::String(_) => None,
                other => recipes_from_value(&other),
            }
        }
        _ => None,
    }
}

/// A recipe needs a non-empty title; other fields default to empty strings
fn record_from_value(value: &Value) -> Option<RecipeRecord> {
    let title = text_field(&value["title"])?;
    let title = title.trim();
    if title.is_empty() {
        return None;
    }

    Some(RecipeRecord::new(
        title,
        text_field(&value["description"]).unwrap_or_default().trim(),
        text_field(&value["steps"]).unwrap_or_default().trim(),
    ))
}

/// Read a field as text, joining a list of lines when the model sent an array
fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(text_field)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        _ => None,
    }
}
