use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    /// Default provider to use when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Where saved recipes and the meal plan live
    #[serde(default)]
    pub storage: StorageConfig,
    /// Serving selector bounds
    #[serde(default)]
    pub cook: CookConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for a specific generation provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-4.1-mini", "gemini-2.5-flash")
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
    /// Number of retry attempts per provider before fallback
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Initial delay between retries in milliseconds (grows with each attempt)
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

/// Location of the persisted user data
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Serving selector settings
#[derive(Debug, Deserialize, Clone)]
pub struct CookConfig {
    /// Upper bound for the serving selector
    #[serde(default = "default_max_servings")]
    pub max_servings: u32,
}

impl Default for CookConfig {
    fn default() -> Self {
        Self {
            max_servings: default_max_servings(),
        }
    }
}

impl CookConfig {
    /// Clamp a requested serving count to `[1, max_servings]`.
    pub fn clamp_servings(&self, servings: u32) -> u32 {
        servings.clamp(1, self.max_servings.max(1))
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
    0.8
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("recipe-assistant.json")
}

fn default_max_servings() -> u32 {
    20
}

fn default_timeout() -> u64 {
    60
}

impl AssistantConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_ASSISTANT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_ASSISTANT__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AssistantConfig::load`] for the lookup order.
pub fn load_config() -> Result<AssistantConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_ASSISTANT__PROVIDERS__GOOGLE__API_KEY
        .add_source(
            Environment::with_prefix("RECIPE_ASSISTANT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "google");
        assert_eq!(default_temperature(), 0.8);
        assert_eq!(default_max_tokens(), 4000);
        assert_eq!(default_retry_attempts(), 3);
        assert_eq!(default_retry_delay_ms(), 1000);
    }

    #[test]
    fn test_fallback_config_default() {
        let fallback = FallbackConfig::default();
        assert!(!fallback.enabled);
        assert!(fallback.order.is_empty());
        assert_eq!(fallback.retry_attempts, 3);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            default_provider = "openai"
            timeout = 10

            [providers.openai]
            model = "gpt-4.1-mini"
            api_key = "test-key"

            [storage]
            path = "/tmp/recipes.json"

            [cook]
            max_servings = 12
        "#;

        let config: AssistantConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.timeout, 10);
        let openai = &config.providers["openai"];
        assert!(openai.enabled);
        assert_eq!(openai.max_tokens, 4000);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/recipes.json"));
        assert_eq!(config.cook.max_servings, 12);
        assert_eq!(config.cook.clamp_servings(30), 12);
        assert!(!config.fallback.enabled);
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config: AssistantConfig = Config::builder()
            .add_source(File::from_str("", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.default_provider, "google");
        assert!(config.providers.is_empty());
        assert_eq!(config.timeout, 60);
    }

    #[test]
    fn test_clamp_servings() {
        let cook = CookConfig::default();
        assert_eq!(cook.clamp_servings(0), 1);
        assert_eq!(cook.clamp_servings(4), 4);
        assert_eq!(cook.clamp_servings(50), 20);
    }
}
