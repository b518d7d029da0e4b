use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::book::RecipeBook;
use crate::plan::MealPlan;
use crate::AssistantError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// Everything the assistant remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub saved: RecipeBook,
    #[serde(default)]
    pub plan: MealPlan,
    #[serde(default)]
    pub theme: Theme,
    /// Provider API key entered by the user, used when none is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Load/save access to persisted user data
#[async_trait]
pub trait Store: Send + Sync {
    /// Load the stored data, or defaults when nothing has been saved yet
    async fn load(&self) -> Result<UserData, AssistantError>;

    async fn save(&self, data: &UserData) -> Result<(), AssistantError>;
}

/// Stores user data as pretty-printed JSON in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self) -> Result<UserData, AssistantError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No data at {}, starting fresh", self.path.display());
                return Ok(UserData::default());
            }
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(UserData::default());
        }
        serde_json::from_str(&contents).map_err(|e| {
            AssistantError::StorageError(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, data: &UserData) -> Result<(), AssistantError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&self.path, json).await?;
        info!("Saved data to {}", self.path.display());
        Ok(())
    }
}

/// Keeps user data in memory only.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<UserData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> Result<UserData, AssistantError> {
        self.data
            .lock()
            .map(|data| data.clone())
            .map_err(|e| AssistantError::StorageError(e.to_string()))
    }

    async fn save(&self, data: &UserData) -> Result<(), AssistantError> {
        let mut stored = self
            .data
            .lock()
            .map_err(|e| AssistantError::StorageError(e.to_string()))?;
        *stored = data.clone();
        Ok(())
    }
}
