mod anthropic;
mod factory;
mod fallback;
mod google;
mod ollama;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use google::GoogleProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_generation_prompt, Preferences, RECIPE_GENERATION_PROMPT};

use async_trait::async_trait;
use std::error::Error;

/// Unified trait for all text generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "google")
    fn provider_name(&self) -> &str;

    /// Run one completion with a system prompt and a user message
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}
