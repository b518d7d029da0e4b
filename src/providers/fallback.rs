use crate::config::AssistantConfig;
use crate::providers::{LlmProvider, ProviderFactory};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;

pub struct FallbackProvider {
    providers: Vec<Box<dyn LlmProvider>>,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl FallbackProvider {
    /// Create a new fallback provider from configuration
    pub fn new(config: &AssistantConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        if !config.fallback.enabled {
            // If fallback is disabled, just use the default provider
            let default_provider = ProviderFactory::get_default_provider(config)?;
            return Ok(FallbackProvider {
                providers: vec![default_provider],
                retry_attempts: 1,
                retry_delay_ms: 0,
            });
        }

        let mut providers = Vec::new();

        // Create providers in fallback order
        for provider_name in &config.fallback.order {
            if let Some(provider_config) = config.providers.get(provider_name) {
                if provider_config.enabled {
                    match ProviderFactory::create(provider_name, provider_config) {
                        Ok(provider) => {
                            info!("Added '{}' to fallback chain", provider_name);
                            providers.push(provider);
                        }
                        Err(e) => {
                            warn!("Failed to initialize provider '{}': {}", provider_name, e);
                        }
                    }
                }
            } else {
                warn!(
                    "Provider '{}' in fallback order not found in configuration",
                    provider_name
                );
            }
        }

        Self::from_providers(providers, config.fallback.retry_attempts, config.fallback.retry_delay_ms)
    }

    /// Build a chain from already constructed providers, tried in order.
    pub fn from_providers(
        providers: Vec<Box<dyn LlmProvider>>,
        retry_attempts: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        if providers.is_empty() {
            return Err("No providers available in fallback configuration".into());
        }

        Ok(FallbackProvider {
            providers,
            retry_attempts: retry_attempts.max(1),
            retry_delay_ms,
        })
    }

    /// Try a provider, retrying with a delay that grows with each attempt
    async fn try_provider_with_retry(
        &self,
        provider: &dyn LlmProvider,
        system: &str,
        prompt: &str,
    ) -> Result<String, String> {
        let mut last_error = String::new();

        for attempt in 1..=self.retry_attempts {
            debug!(
                "Requesting recipes from {} (attempt {}/{})",
                provider.provider_name(),
                attempt,
                self.retry_attempts
            );

            match provider.complete(system, prompt).await {
                Ok(result) => {
                    info!(
                        "Received recipes from {}",
                        provider.provider_name()
                    );
                    return Ok(result);
                }
                Err(e) => {
                    warn!(
                        "Provider {} failed (attempt {}/{}): {}",
                        provider.provider_name(),
                        attempt,
                        self.retry_attempts,
                        e
                    );
                    last_error = e.to_string();
                }
            }

            // Sleep only if we need to retry
            if attempt < self.retry_attempts {
                let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
                debug!("Waiting {:?} before retry", delay);
                sleep(delay).await;
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl LlmProvider for FallbackProvider {
    fn provider_name(&self) -> &str {
        "fallback"
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let mut all_errors: Vec<String> = Vec::new();

        for provider in &self.providers {
            match self
                .try_provider_with_retry(provider.as_ref(), system, prompt)
                .await
            {
                Ok(result) => return Ok(result),
                Err(e) => {
                    all_errors.push(format!("{}: {}", provider.provider_name(), e));
                }
            }
        }

        Err(format!("All providers failed:\n{}", all_errors.join("\n")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FallbackConfig, ProviderConfig};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FlakyProvider {
        name: &'static str,
        failures_left: AtomicU32,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl LlmProvider for FlakyProvider {
        fn provider_name(&self) -> &str {
            self.name
        }

        async fn complete(
            &self,
            _system: &str,
            _prompt: &str,
        ) -> Result<String, Box<dyn Error + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err("temporarily unavailable".into());
            }
            Ok(format!("from {}", self.name))
        }
    }

    fn flaky(name: &'static str, failures: u32) -> (Box<dyn LlmProvider>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = FlakyProvider {
            name,
            failures_left: AtomicU32::new(failures),
            calls: calls.clone(),
        };
        (Box::new(provider), calls)
    }

    fn provider_config(key: &str) -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "test-model".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            api_key: Some(key.to_string()),
            base_url: None,
        }
    }

    fn create_test_config_with_fallback() -> AssistantConfig {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), provider_config("test-key-1"));
        providers.insert("google".to_string(), provider_config("test-key-2"));

        AssistantConfig {
            default_provider: "openai".to_string(),
            providers,
            fallback: FallbackConfig {
                enabled: true,
                order: vec!["google".to_string(), "openai".to_string()],
                retry_attempts: 3,
                retry_delay_ms: 100,
            },
            storage: Default::default(),
            cook: Default::default(),
            timeout: 60,
        }
    }

    #[test]
    fn test_fallback_provider_creation() {
        let fallback = FallbackProvider::new(&create_test_config_with_fallback()).unwrap();
        assert_eq!(fallback.provider_name(), "fallback");
        assert_eq!(fallback.providers.len(), 2);
        assert_eq!(fallback.providers[0].provider_name(), "google");
    }

    #[test]
    fn test_fallback_disabled() {
        let mut config = create_test_config_with_fallback();
        config.fallback.enabled = false;

        let fallback = FallbackProvider::new(&config).unwrap();
        assert_eq!(fallback.providers.len(), 1);
        assert_eq!(fallback.providers[0].provider_name(), "openai");
        assert_eq!(fallback.retry_attempts, 1);
    }

    #[test]
    fn test_fallback_no_providers() {
        let mut config = create_test_config_with_fallback();
        config.providers.clear();

        let result = FallbackProvider::new(&config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("No providers available"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_before_succeeding() {
        let (provider, calls) = flaky("first", 2);
        let fallback = FallbackProvider::from_providers(vec![provider], 3, 100).unwrap();

        let result = fallback.complete("system", "prompt").await.unwrap();
        assert_eq!(result, "from first");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_moves_to_next_provider() {
        let (first, first_calls) = flaky("first", 10);
        let (second, second_calls) = flaky("second", 0);
        let fallback = FallbackProvider::from_providers(vec![first, second], 2, 50).unwrap();

        let result = fallback.complete("system", "prompt").await.unwrap();
        assert_eq!(result, "from second");
        assert_eq!(first_calls.load(Ordering::SeqCst), 2);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_providers_fail() {
        let (first, _) = flaky("first", 10);
        let (second, _) = flaky("second", 10);
        let fallback = FallbackProvider::from_providers(vec![first, second], 1, 0).unwrap();

        let err = fallback.complete("system", "prompt").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("All providers failed"));
        assert!(message.contains("first: temporarily unavailable"));
        assert!(message.contains("second: temporarily unavailable"));
    }
}
