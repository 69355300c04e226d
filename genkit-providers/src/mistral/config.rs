//! Mistral provider configuration

use crate::constants::{MISTRAL_API_KEY_ENV, MISTRAL_BASE_URL_ENV, MISTRAL_DEFAULT_BASE_URL};
use genkit_core::Error;

/// Configuration for the Mistral provider
#[derive(Clone)]
pub struct MistralConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for the API, including the version segment
    pub base_url: String,
}

impl std::fmt::Debug for MistralConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MistralConfig {
    /// Create a new configuration with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: MISTRAL_DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the API key (and optionally the base URL) from the environment
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var(MISTRAL_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Configuration(format!("{MISTRAL_API_KEY_ENV} is not set")))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var(MISTRAL_BASE_URL_ENV) {
            config = config.with_base_url(url);
        }
        Ok(config)
    }

    /// Set a custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the URL for chat completions
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Get the URL for embeddings
    pub fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    /// Get the URL for model listing
    pub fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_base() {
        let config = MistralConfig::new("key").with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.chat_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.embeddings_url(), "http://localhost:8080/v1/embeddings");
        assert_eq!(config.models_url(), "http://localhost:8080/v1/models");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = MistralConfig::new("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
