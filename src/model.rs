use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Food grouping assigned to an ingredient name.
///
/// Serialized with the display labels shown in the fridge UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "蔬菜")]
    Vegetable,
    #[serde(rename = "海鮮")]
    Seafood,
    #[serde(rename = "肉")]
    Meat,
    #[serde(rename = "澱粉")]
    Starch,
    #[serde(rename = "其他")]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Vegetable,
        Category::Seafood,
        Category::Meat,
        Category::Starch,
        Category::Other,
    ];

    /// Display label used by the fridge UI
    pub fn label(&self) -> &'static str {
        match self {
            Category::Vegetable => "蔬菜",
            Category::Seafood => "海鮮",
            Category::Meat => "肉",
            Category::Starch => "澱粉",
            Category::Other => "其他",
        }
    }

    fn english_name(&self) -> &'static str {
        match self {
            Category::Vegetable => "vegetable",
            Category::Seafood => "seafood",
            Category::Meat => "meat",
            Category::Starch => "starch",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the display label or the English name (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == trimmed || c.english_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// One suggested dish.
///
/// `steps` is prose with embedded line breaks, not a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub title: String,
    pub description: String,
    pub steps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl RecipeRecord {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        steps: impl Into<String>,
    ) -> Self {
        RecipeRecord {
            title: title.into(),
            description: description.into(),
            steps: steps.into(),
            image: None,
        }
    }
}

/// Outcome of one recipe-suggestion request.
///
/// Either a non-empty list of recipes, or an empty list carrying the
/// diagnostic for why nothing usable came back: `raw` holds the verbatim
/// model output that could not be interpreted, `error` the message of a
/// failed model call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub recipes: Vec<RecipeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineResult {
    pub fn success(recipes: Vec<RecipeRecord>) -> Self {
        PipelineResult {
            recipes,
            raw: None,
            error: None,
        }
    }

    /// The model answered but nothing could be interpreted
    pub fn unparsed(raw: impl Into<String>) -> Self {
        PipelineResult {
            recipes: Vec::new(),
            raw: Some(raw.into()),
            error: None,
        }
    }

    /// The model call itself failed
    pub fn upstream_failure(message: impl Into<String>) -> Self {
        PipelineResult {
            recipes: Vec::new(),
            raw: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        !self.recipes.is_empty()
    }

    pub fn is_upstream_failure(&self) -> bool {
        self.recipes.is_empty() && self.error.is_some()
    }
}
