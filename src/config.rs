use config::{Config, ConfigError, Environment, File};
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::ingredients::Classifier;
use crate::model::Category;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used for recipe generation when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Image search used to illustrate suggested recipes
    #[serde(default)]
    pub images: ImageConfig,
    /// Category priority for ingredient classification
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Fridge inventory selection settings
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// Request timeout in seconds for every outbound call; fractions allowed
    #[serde(default = "default_timeout")]
    pub timeout: f64,
}

/// Configuration for a specific generative model provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-flash-latest", "gpt-4.1-mini")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Configuration for provider fallback and retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of attempts per provider before moving on
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base delay between attempts in milliseconds (grows linearly)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Configuration for recipe image lookup
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// "unsplash" or "pexels"; images are disabled when unset
    pub provider: Option<String>,
    /// API key (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Term appended to every query to bias results toward food photography
    #[serde(default = "default_qualifier")]
    pub qualifier: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider: None,
            api_key: None,
            base_url: None,
            qualifier: default_qualifier(),
        }
    }
}

/// Category priority for the classifier
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClassifierConfig {
    /// Categories checked first, in order (labels or English names)
    #[serde(default)]
    pub priority: Vec<String>,
}

impl ClassifierConfig {
    pub fn build(&self) -> Result<Classifier, ConfigError> {
        if self.priority.is_empty() {
            return Ok(Classifier::default());
        }

        let priority = self
            .priority
            .iter()
            .map(|name| name.parse::<Category>().map_err(ConfigError::Message))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Classifier::with_priority(&priority))
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Fridge inventory settings
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    /// Items expiring within this many days count as "expiring soon"
    #[serde(default = "default_expiring_days")]
    pub expiring_days: i64,
    /// JSON file backing the server's fridge; kept in memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            expiring_days: default_expiring_days(),
            path: None,
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_qualifier() -> String {
    "food".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_expiring_days() -> i64 {
    2
}

fn default_timeout() -> f64 {
    30.0
}

/// Model used when the Google provider is synthesized from the environment
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            fallback: FallbackConfig::default(),
            images: ImageConfig::default(),
            classifier: ClassifierConfig::default(),
            server: ServerConfig::default(),
            inventory: InventoryConfig::default(),
            timeout: default_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FRIDGE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FRIDGE__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = load_config()?;
        config.apply_env_defaults();
        Ok(config)
    }

    /// Negative or non-finite values fall back to the default
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout).unwrap_or_else(|_| {
            warn!("Invalid timeout {}, using {}s", self.timeout, default_timeout());
            Duration::from_secs_f64(default_timeout())
        })
    }

    /// With no providers configured, fall back to a Gemini key in the environment
    fn apply_env_defaults(&mut self) {
        if !self.providers.is_empty() {
            return;
        }

        let has_key = ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .iter()
            .any(|key| std::env::var(key).is_ok());

        if has_key {
            self.providers.insert(
                "google".to_string(),
                ProviderConfig {
                    enabled: true,
                    model: DEFAULT_GEMINI_MODEL.to_string(),
                    temperature: default_temperature(),
                    max_tokens: default_max_tokens(),
                    api_key: None,
                    base_url: None,
                },
            );
            if !self.providers.contains_key(&self.default_provider) {
                self.default_provider = "google".to_string();
            }
        }
    }
}

/// Load configuration from file and environment variables, without
/// synthesizing providers from well-known API key variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: FRIDGE__PROVIDERS__GOOGLE__API_KEY
        .add_source(
            Environment::with_prefix("FRIDGE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
