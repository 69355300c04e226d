//! Capability traits implemented by provider adapters
//!
//! Each capability is its own trait so callers can depend on exactly what
//! they use. Streaming variants hand snapshots to the caller through a
//! channel: a snapshot for fragment `n + 1` is only sent once the one for
//! fragment `n` has been accepted, and a closed receiver cancels the stream.

use crate::error::Result;
use crate::types::message::Message;
use crate::types::request::{ChatRequest, Model, ToolRequest};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// General chat completion
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send a request and get the complete assistant message
    async fn completion(&self, request: ChatRequest) -> Result<Message>;

    /// Stream a request, sending a cumulative snapshot after every fragment
    async fn completion_stream(
        &self,
        request: ChatRequest,
        updates: mpsc::Sender<Message>,
    ) -> Result<()>;
}

/// Chat completion forced to call a single tool
#[async_trait]
pub trait ToolService: Send + Sync {
    /// Send a request and get the complete assistant message
    async fn tool_completion(&self, request: ToolRequest) -> Result<Message>;

    /// Stream a request, sending a cumulative snapshot after every fragment
    async fn tool_completion_stream(
        &self,
        request: ToolRequest,
        updates: mpsc::Sender<Message>,
    ) -> Result<()>;
}

/// Text embeddings
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed `input` with `model`
    ///
    /// Returns an empty vector when the provider answers without any
    /// embedding entries.
    async fn embeddings(&self, model: &Model, input: &str) -> Result<Vec<f64>>;
}

/// Model discovery
#[async_trait]
pub trait ModelService: Send + Sync {
    /// List every model the provider reports
    async fn models(&self) -> Result<Vec<Model>>;
}
