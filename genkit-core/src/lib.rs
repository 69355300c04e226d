//! Core traits and types for the GenKit LLM library
//!
//! This crate provides the vendor-neutral message model, the capability traits
//! provider adapters implement, and the accumulator that rebuilds a message
//! from streamed fragments.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod service;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use service::{ChatService, EmbeddingService, ModelService, ToolService};
pub use types::{
    message::{Content, FinishReason, Image, Message, Role},
    request::{
        BuildError, ChatRequest, ChatRequestBuilder, Model, Parameters, ParametersBuilder,
        ToolRequest,
    },
    stream::{MessageDelta, StreamAccumulator, ToolCallDelta},
    tool::{Tool, ToolCall, ToolChoice},
};
