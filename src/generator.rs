use std::time::Duration;

use log::{debug, info, warn};
use serde_json::Value;

use crate::config::{AssistantConfig, ProviderConfig};
use crate::providers::{
    build_generation_prompt, FallbackProvider, LlmProvider, Preferences, ProviderFactory,
    RECIPE_GENERATION_PROMPT,
};
use crate::{AssistantError, Recipe};

/// Which generation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Google,
    Ollama,
}

impl ProviderKind {
    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::Ollama => "ollama",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Anthropic => "claude-sonnet-4-5",
            ProviderKind::Google => "gemini-2.5-flash",
            ProviderKind::Ollama => "llama3.2",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "google" | "gemini" => Ok(ProviderKind::Google),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(AssistantError::BuilderError(format!(
                "Unknown provider: {}",
                other
            ))),
        }
    }
}

/// Builder for requesting recipes from a generation provider
#[derive(Default)]
pub struct RecipeGeneratorBuilder {
    ingredients: Vec<String>,
    preferences: Preferences,
    provider: Option<ProviderKind>,
    custom_provider: Option<Box<dyn LlmProvider>>,
    config: Option<AssistantConfig>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    model: Option<String>,
}

impl RecipeGeneratorBuilder {
    /// Add one available ingredient
    pub fn ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }

    /// Add several available ingredients
    ///
    /// # Example
    /// ```
    /// use recipe_assistant::RecipeGenerator;
    ///
    /// let builder = RecipeGenerator::builder()
    ///     .ingredients(["chicken", "rice", "garlic"]);
    /// ```
    pub fn ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients
            .extend(ingredients.into_iter().map(Into::into));
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.preferences.cuisine = Some(cuisine.into());
        self
    }

    pub fn diet(mut self, diet: impl Into<String>) -> Self {
        self.preferences.diet = Some(diet.into());
        self
    }

    /// Number of recipes to ask for
    pub fn count(mut self, count: u32) -> Self {
        self.preferences.count = Some(count);
        self
    }

    /// Choose a provider instead of the configured default
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Use an already constructed provider, bypassing configuration
    pub fn with_provider(mut self, provider: Box<dyn LlmProvider>) -> Self {
        self.custom_provider = Some(provider);
        self
    }

    /// Use this configuration instead of loading `config.toml` and the environment
    pub fn config(mut self, config: AssistantConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for the whole generation request
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the API key for the provider
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Ask the provider for recipes
    ///
    /// # Errors
    /// Returns `AssistantError` if:
    /// - No ingredients were given
    /// - The provider cannot be configured
    /// - The request fails or times out
    /// - The response contains no usable recipes
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_assistant::RecipeGenerator;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipes = RecipeGenerator::builder()
    ///     .ingredients(["eggs", "spinach"])
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<Vec<Recipe>, AssistantError> {
        let ingredients: Vec<String> = self
            .ingredients
            .iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        if ingredients.is_empty() {
            return Err(AssistantError::BuilderError(
                "No ingredients specified. Use .ingredient() or .ingredients()".to_string(),
            ));
        }

        let prompt = build_generation_prompt(&ingredients, &self.preferences);
        let RecipeGeneratorBuilder {
            provider,
            custom_provider,
            config,
            timeout,
            api_key,
            model,
            ..
        } = self;

        let (provider, config_timeout) = match custom_provider {
            Some(provider) => (provider, None),
            None => {
                let config = match config {
                    Some(config) => config,
                    None => AssistantConfig::load()?,
                };
                let timeout = Duration::from_secs(config.timeout);
                (resolve_provider(&config, provider, api_key, model)?, Some(timeout))
            }
        };
        let timeout = timeout.or(config_timeout);

        info!(
            "Requesting recipes for {} ingredient(s) from {}",
            ingredients.len(),
            provider.provider_name()
        );

        let request = provider.complete(RECIPE_GENERATION_PROMPT, &prompt);
        let response = match timeout {
            Some(limit) => tokio::time::timeout(limit, request).await.map_err(|_| {
                AssistantError::GenerationError(format!("Request timed out after {:?}", limit))
            })?,
            None => request.await,
        }
        .map_err(|e| AssistantError::GenerationError(e.to_string()))?;

        parse_recipes(&response)
    }
}

/// Pick the provider for a request.
///
/// An explicit provider, key or model means a single provider built from
/// its config entry (or defaults when it has none); otherwise the
/// configured fallback chain or default provider is used.
fn resolve_provider(
    config: &AssistantConfig,
    kind: Option<ProviderKind>,
    api_key: Option<String>,
    model: Option<String>,
) -> Result<Box<dyn LlmProvider>, AssistantError> {
    let to_error = |e: Box<dyn std::error::Error + Send + Sync>| {
        AssistantError::BuilderError(e.to_string())
    };

    if kind.is_none() && api_key.is_none() && model.is_none() {
        let provider = FallbackProvider::new(config).map_err(to_error)?;
        return Ok(Box::new(provider));
    }

    let kind = match kind {
        Some(kind) => kind,
        None => config.default_provider.parse()?,
    };
    let mut provider_config = config
        .providers
        .get(kind.as_str())
        .cloned()
        .unwrap_or_else(|| ProviderConfig {
            enabled: true,
            model: kind.default_model().to_string(),
            temperature: 0.8,
            max_tokens: 4000,
            api_key: None,
            base_url: None,
        });
    if api_key.is_some() {
        provider_config.api_key = api_key;
    }
    if let Some(model) = model {
        provider_config.model = model;
    }

    ProviderFactory::create(kind.as_str(), &provider_config).map_err(to_error)
}

/// Entry point for the builder API
pub struct RecipeGenerator;

impl RecipeGenerator {
    /// Creates a new builder for generating recipes
    pub fn builder() -> RecipeGeneratorBuilder {
        RecipeGeneratorBuilder::default()
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line ("```json")
    let inner = match inner.find('\n') {
        Some(pos) => &inner[pos + 1..],
        None => inner,
    };
    inner.trim_end().trim_end_matches("```").trim()
}

fn parse_json_payload(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    // Tolerate prose around the JSON
    let start = text.find(|c| c == '[' || c == '{')?;
    let end = text.rfind(|c| c == ']' || c == '}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Parse a provider response into recipes.
///
/// Accepts a JSON array of recipes, an object with a `recipes` array, or a
/// single recipe object, optionally wrapped in a Markdown code fence.
/// Entries that do not fit the recipe shape are skipped.
pub fn parse_recipes(response: &str) -> Result<Vec<Recipe>, AssistantError> {
    let payload = strip_code_fence(response);
    let value = parse_json_payload(payload).ok_or_else(|| {
        AssistantError::ParseError("Response is not valid JSON".to_string())
    })?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("recipes") {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(AssistantError::ParseError(
                    "'recipes' is not an array".to_string(),
                ))
            }
            None => vec![Value::Object(object)],
        },
        _ => {
            return Err(AssistantError::ParseError(
                "Expected a list of recipes".to_string(),
            ))
        }
    };

    let recipes: Vec<Recipe> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Recipe>(entry) {
            Ok(recipe) => Some(recipe.normalize()),
            Err(e) => {
                warn!("Skipping malformed recipe: {}", e);
                None
            }
        })
        .filter(|recipe| !recipe.name.is_empty())
        .collect();

    if recipes.is_empty() {
        return Err(AssistantError::ParseError(
            "No recipes found in response".to_string(),
        ));
    }

    debug!("Parsed {} recipe(s)", recipes.len());
    Ok(recipes)
}
