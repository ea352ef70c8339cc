pub mod classifier;
pub mod parser;

pub use classifier::{classify, Classifier};
pub use parser::split;

use crate::model::Category;
use serde::Serialize;

/// An ingredient name with its guessed category, for the local preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewItem {
    pub name: String,
    pub category: Category,
}

/// Split free text and classify each name, preserving input order
pub fn preview(raw: &str, classifier: &Classifier) -> Vec<PreviewItem> {
    split(raw)
        .into_iter()
        .map(|name| {
            let category = classifier.classify(&name);
            PreviewItem { name, category }
        })
        .collect()
}
