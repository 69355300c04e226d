//! Provider implementations for LLM services

#![warn(missing_docs)]

pub mod builder;
pub mod constants;
pub mod error;
pub mod http;
pub mod traits;

// Provider implementations
pub mod mistral;

// Re-export provider types
pub use builder::{MistralBuilder, ProviderBuilder};
pub use mistral::{Mistral, MistralConfig, SnapshotStream};

// Re-export common traits
pub use traits::{RequestConverter, ResponseParser, StreamEventParser};
