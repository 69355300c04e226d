//! Constants for provider implementations

/// Default Mistral base URL
pub const MISTRAL_DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Environment variable holding the Mistral API key
pub const MISTRAL_API_KEY_ENV: &str = "MISTRAL_API_KEY";

/// Environment variable overriding the Mistral base URL
pub const MISTRAL_BASE_URL_ENV: &str = "MISTRAL_BASE_URL";

/// Overall timeout for a single HTTP request, streaming included
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Payload of the SSE event that ends a stream
pub const SSE_DONE: &str = "[DONE]";
