//! HTTP client abstraction and utilities

use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::error;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use genkit_core::Error;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;

/// Type alias for response body streams
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

/// HTTP client abstraction
///
/// Implementations must be safe to share between concurrent requests; one
/// provider instance holds a single client behind an `Arc`.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a POST request and decode the JSON body
    async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<Value, Error>;

    /// Send a POST request and hand back the raw body as it arrives
    async fn post_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Value,
    ) -> Result<ResponseStream, Error>;

    /// Send a GET request and decode the JSON body
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Value, Error>;
}

/// Default HTTP client implementation using reqwest
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(error::network_error)?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(error::status_error(status.as_u16(), &text))
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<Value, Error> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(error::network_error)?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(error::network_error)
    }

    async fn post_stream(
        &self,
        url: &str,
        mut headers: HeaderMap,
        body: Value,
    ) -> Result<ResponseStream, Error> {
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(error::network_error)?;

        let body = Self::check(response).await?.bytes_stream();
        Ok(Box::pin(body.map(|chunk| chunk.map_err(error::network_error))))
    }

    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Value, Error> {
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(error::network_error)?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(error::network_error)
    }
}

/// Helper to create common headers
pub fn create_headers(api_key: &str) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| Error::Configuration(format!("Invalid API key: {e}")))?,
    );

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_bearer_token() {
        let headers = create_headers("secret").unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer secret");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn headers_reject_control_characters_in_key() {
        let err = create_headers("bad\nkey").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
