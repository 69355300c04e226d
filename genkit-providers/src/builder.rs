//! Builder pattern for provider construction
//!
//! Builders follow a fluent interface: every configuration method returns
//! `self`, and `build()` is the terminal method that constructs the provider.
//!
//! # Examples
//!
//! ```no_run
//! use genkit_providers::builder::{MistralBuilder, ProviderBuilder};
//! use std::sync::Arc;
//!
//! // Basic usage
//! let provider = MistralBuilder::new("api-key")
//!     .build()
//!     .expect("Failed to build provider");
//!
//! // With all options
//! # let custom_client = Arc::new(genkit_providers::http::ReqwestClient::new().unwrap());
//! let provider = MistralBuilder::new("api-key")
//!     .base_url("https://mistral.internal.example/v1")
//!     .with_client(custom_client)
//!     .build()
//!     .expect("Failed to build provider");
//! ```

use crate::http::{HttpClient, ReqwestClient};
use crate::mistral::{Mistral, MistralConfig};
use genkit_core::Error;
use std::sync::Arc;

/// Common builder trait for all providers
pub trait ProviderBuilder: Sized {
    /// The provider type being built
    type Provider;

    /// Set a custom HTTP client
    ///
    /// Useful for testing or special networking requirements.
    fn with_client(self, client: Arc<dyn HttpClient>) -> Self;

    /// Build the provider, or fail if the configuration is invalid
    fn build(self) -> Result<Self::Provider, Error>;
}

/// Builder for constructing Mistral providers
pub struct MistralBuilder {
    api_key: String,
    base_url: Option<String>,
    client: Option<Arc<dyn HttpClient>>,
}

impl MistralBuilder {
    /// Create a new Mistral builder with API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            client: None,
        }
    }

    /// Set the base URL, including the version segment
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

impl ProviderBuilder for MistralBuilder {
    type Provider = Mistral;

    fn with_client(self, client: Arc<dyn HttpClient>) -> Self {
        Self {
            client: Some(client),
            ..self
        }
    }

    fn build(self) -> Result<Mistral, Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("Mistral API key is empty".into()));
        }

        let mut config = MistralConfig::new(self.api_key);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        let client = match self.client {
            Some(client) => client,
            None => Arc::new(ReqwestClient::new()?),
        };

        Ok(Mistral::new(config, client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_applies_base_url() {
        let provider = MistralBuilder::new("key")
            .base_url("http://localhost:8080/v1/")
            .build()
            .unwrap();
        assert_eq!(
            provider.config().chat_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let result = MistralBuilder::new("  ").build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
