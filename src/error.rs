use thiserror::Error;

/// Errors that can occur while generating, storing or planning recipes
#[derive(Error, Debug)]
pub enum AssistantError {
    /// HTTP request to a generation provider failed
    #[error("Failed to reach provider: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The provider could not produce recipes
    #[error("Generation failed: {0}")]
    GenerationError(String),

    /// Provider output did not contain usable recipes
    #[error("Failed to parse recipes: {0}")]
    ParseError(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Persisted data could not be read or written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvError(#[from] std::env::VarError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
