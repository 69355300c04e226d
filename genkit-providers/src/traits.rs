//! Common traits for provider implementations
//!
//! A provider adapter is assembled from three pure pieces: a converter that
//! encodes generic requests into the provider's wire type, a parser that
//! decodes complete responses, and a stream parser that turns each streamed
//! chunk into a generic [`MessageDelta`].

use genkit_core::{ChatRequest, Error, Message, MessageDelta};

/// Convert requests to provider-specific format
pub trait RequestConverter: Send + Sync {
    /// The provider's request body
    type Request;

    /// Encode a chat request
    fn convert_request(&self, request: &ChatRequest, stream: bool)
        -> Result<Self::Request, Error>;
}

/// Parse complete responses from provider-specific format
pub trait ResponseParser: Send + Sync {
    /// The provider's response body
    type Response;

    /// Decode a complete response into a message
    fn parse_response(&self, response: Self::Response) -> Result<Message, Error>;
}

/// Parse streamed chunks from provider-specific format
pub trait StreamEventParser: Send + Sync {
    /// One decoded stream chunk
    type Chunk;

    /// Extract the fragment a chunk carries
    fn parse_chunk(&self, chunk: Self::Chunk) -> Result<MessageDelta, Error>;
}
