//! Configuration schema for Pantry.

use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default chat-completion endpoint (OpenAI-compatible router).
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";
/// Default model used for recipe generation.
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
/// Token cap for generated recipes.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Environment variable holding the inference access token.
pub const DEFAULT_TOKEN_ENV: &str = "HF_ACCESS_TOKEN";
/// Minimum ingredient count before a recipe can be requested.
pub const DEFAULT_MIN_INGREDIENTS: usize = 4;

/// Directory under the home directory holding Pantry files.
pub(crate) const DEFAULT_CONFIG_DIR: &str = ".pantry";
/// Default file name of the key-value storage file.
const DEFAULT_STORAGE_FILE: &str = "storage.json";

/// Root config for Pantry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PantryConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl PantryConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> PantryConfigBuilder {
        PantryConfigBuilder::new()
    }
}

/// Builder for assembling a `PantryConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct PantryConfigBuilder {
    config: PantryConfig,
}

impl PantryConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: PantryConfig::default(),
        }
    }

    /// Replace the inference endpoint configuration.
    pub fn inference(mut self, inference: InferenceConfig) -> Self {
        self.config.inference = inference;
        self
    }

    /// Replace the storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Replace the generation configuration.
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.config.generation = generation;
        self
    }

    /// Finalize and return the built `PantryConfig`.
    pub fn build(self) -> PantryConfig {
        self.config
    }
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InferenceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Name of the environment variable that holds the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            token_env: default_token_env(),
        }
    }
}

impl InferenceConfig {
    /// Read the access token from the configured environment variable.
    ///
    /// Empty values are treated as absent.
    pub fn access_token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

/// Key-value storage location.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    /// Configured storage path, falling back to `~/.pantry/storage.json`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if let Some(path) = self.path.as_ref() {
            return Some(PathBuf::from(path));
        }
        UserDirs::new().map(|dirs| {
            dirs.home_dir()
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_STORAGE_FILE)
        })
    }
}

/// Recipe generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationConfig {
    #[serde(default = "default_min_ingredients")]
    pub min_ingredients: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_ingredients: default_min_ingredients(),
        }
    }
}

fn default_min_ingredients() -> usize {
    DEFAULT_MIN_INGREDIENTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_recipe_endpoint() {
        let config = PantryConfig::default();
        assert_eq!(config.inference.model, DEFAULT_MODEL);
        assert_eq!(config.inference.max_tokens, 1024);
        assert_eq!(config.generation.min_ingredients, 4);
        assert_eq!(config.storage.path, None);
    }

    #[test]
    fn explicit_storage_path_wins() {
        let storage = StorageConfig {
            path: Some("/tmp/pantry.json".to_string()),
        };
        assert_eq!(
            storage.resolved_path(),
            Some(PathBuf::from("/tmp/pantry.json"))
        );
    }

    #[test]
    fn builder_replaces_sections() {
        let config = PantryConfig::builder()
            .generation(GenerationConfig { min_ingredients: 2 })
            .build();
        assert_eq!(config.generation.min_ingredients, 2);
        assert_eq!(config.inference, InferenceConfig::default());
    }
}
