//! Typed HTTP calls against the Mistral REST API

use crate::error;
use crate::http::{create_headers, HttpClient};
use crate::mistral::config::MistralConfig;
use crate::mistral::converter::{ChatCompletionRequest, EmbeddingRequest};
use crate::mistral::parser::{ChatCompletionResponse, EmbeddingResponse, ModelList};
use crate::mistral::stream::ChunkStream;
use genkit_core::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Sends encoded requests and decodes the raw JSON bodies
#[derive(Clone)]
pub struct MistralClient {
    http: Arc<dyn HttpClient>,
    config: MistralConfig,
}

impl MistralClient {
    pub fn new(config: MistralConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &MistralConfig {
        &self.config
    }

    /// `POST /chat/completions` with `stream: false`
    pub async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse, Error> {
        let url = self.config.chat_url();
        debug!(%url, model = %request.model, "sending chat request");
        let response = self.http.post(&url, self.headers()?, to_body(request)?).await?;
        from_body(response)
    }

    /// `POST /chat/completions` with `stream: true`
    pub async fn chat_stream(&self, request: &ChatCompletionRequest) -> Result<ChunkStream, Error> {
        let url = self.config.chat_url();
        debug!(%url, model = %request.model, "opening chat stream");
        let body = self
            .http
            .post_stream(&url, self.headers()?, to_body(request)?)
            .await?;
        Ok(ChunkStream::new(body))
    }

    /// `POST /embeddings`
    pub async fn embeddings(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse, Error> {
        let url = self.config.embeddings_url();
        debug!(%url, model = %request.model, "sending embedding request");
        let response = self.http.post(&url, self.headers()?, to_body(request)?).await?;
        from_body(response)
    }

    /// `GET /models`
    pub async fn models(&self) -> Result<ModelList, Error> {
        let url = self.config.models_url();
        debug!(%url, "listing models");
        let response = self.http.get(&url, self.headers()?).await?;
        from_body(response)
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, Error> {
        create_headers(&self.config.api_key)
    }
}

fn to_body<T: Serialize>(request: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(request).map_err(error::serialization_error)
}

fn from_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, Error> {
    serde_json::from_value(body).map_err(error::serialization_error)
}
