//! GenKit - vendor-neutral chat, tool, embedding and model services
//!
//! This crate re-exports the message model and capability traits from
//! `genkit-core` and, behind the `providers` feature, the Mistral adapter.
//!
//! # Features
//!
//! - **Capability traits**: chat, single-tool chat, embeddings and model listing
//! - **Streaming**: cumulative snapshots through a channel or a `Stream`
//! - **Tool calling**: tool definitions, forced tool choice and streamed arguments
//!
//! # Quick Start
//!
//! ```no_run
//! # use genkit::prelude::*;
//! # #[cfg(feature = "providers")]
//! # use genkit::providers::Mistral;
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), genkit::Error> {
//! #     #[cfg(feature = "providers")]
//! #     {
//!     let provider = Mistral::from_env()?;
//!
//!     let request = ChatRequest::builder()
//!         .model("mistral-small-latest")
//!         .message(Message::user("Hello, world!"))
//!         .build();
//!
//!     let reply = provider.completion(request).await?;
//!     println!("{}", reply.text().unwrap_or_default());
//! #     }
//! #     Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export core types
pub use genkit_core::*;

#[cfg(feature = "providers")]
#[cfg_attr(docsrs, doc(cfg(feature = "providers")))]
pub mod providers {
    //! Provider implementations
    pub use genkit_providers::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use genkit_core::{
        ChatRequest, ChatService, Content, EmbeddingService, Error, Message, MessageDelta, Model,
        ModelService, Parameters, Role, StreamAccumulator, Tool, ToolCall, ToolChoice,
        ToolRequest, ToolService,
    };

    #[cfg(feature = "providers")]
    pub use genkit_providers::{Mistral, MistralBuilder, MistralConfig, ProviderBuilder};
}
