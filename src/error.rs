use thiserror::Error;

/// Boxed error returned by the network adapters (model and image providers)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while suggesting recipes
#[derive(Error, Debug)]
pub enum RecipeError {
    /// The caller supplied unusable input, such as no ingredients
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Builder or pipeline setup is incomplete or inconsistent
    #[error("Builder error: {0}")]
    Builder(String),

    /// A model or image provider could not be constructed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Failed to read an inventory file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode an inventory file
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecipeError {
    /// True when the error is the caller's fault (maps to a client-error status)
    pub fn is_validation(&self) -> bool {
        matches!(self, RecipeError::Validation(_))
    }
}
