//! Mistral provider implementation

mod client;
mod config;
mod converter;
mod parser;
mod provider;
mod stream;

pub use config::MistralConfig;
pub use converter::encode_role;
pub use parser::decode_role;
pub use provider::Mistral;
pub use stream::SnapshotStream;
