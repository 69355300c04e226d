//! Request types for chat, tool and model-listing capabilities

use crate::types::message::Message;
use crate::types::tool::{Tool, ToolChoice};
use thiserror::Error;

/// A model offered by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Model identifier sent on requests (e.g., "mistral-large-latest")
    pub id: String,
    /// Organisation that owns the model
    pub owner: String,
}

impl Model {
    /// Create a new model reference
    pub fn new(id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Parameters for controlling LLM generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature for randomness
    pub temperature: Option<f32>,
    /// Top-p nucleus sampling
    pub top_p: Option<f32>,
    /// Stop sequences
    pub stop: Option<Vec<String>>,
    /// Random seed for deterministic generation
    pub random_seed: Option<u64>,
}

impl Parameters {
    /// Create a new parameters builder
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }
}

/// Builder for Parameters
#[derive(Default)]
pub struct ParametersBuilder {
    params: Parameters,
}

impl ParametersBuilder {
    /// Set maximum tokens
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.params.max_tokens = Some(tokens);
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temp: f32) -> Self {
        self.params.temperature = Some(temp);
        self
    }

    /// Set top-p
    pub fn top_p(mut self, p: f32) -> Self {
        self.params.top_p = Some(p);
        self
    }

    /// Set stop sequences
    pub fn stop(mut self, sequences: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.params.stop = Some(sequences.into_iter().map(Into::into).collect());
        self
    }

    /// Set the random seed
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.params.random_seed = Some(seed);
        self
    }

    /// Build the parameters
    pub fn build(self) -> Parameters {
        self.params
    }
}

/// A general chat request
///
/// `tool_choice` left unset lets the encoder pick: `None` when there are no
/// tools, `Auto` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The model to use
    pub model: String,
    /// The conversation messages
    pub messages: Vec<Message>,
    /// Available tools
    pub tools: Vec<Tool>,
    /// Explicit tool policy
    pub tool_choice: Option<ToolChoice>,
    /// Generation parameters
    pub parameters: Parameters,
}

impl ChatRequest {
    /// Create a new request builder
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }

    /// Create a simple request with just a model and messages
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            tool_choice: None,
            parameters: Parameters::default(),
        }
    }

    /// Check if the request has tools available
    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}

/// Builder for ChatRequest
#[derive(Default)]
pub struct ChatRequestBuilder {
    model: Option<String>,
    messages: Vec<Message>,
    tools: Vec<Tool>,
    tool_choice: Option<ToolChoice>,
    parameters: Parameters,
}

impl ChatRequestBuilder {
    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add a message
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add multiple messages
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Add a tool
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the tool policy explicitly
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Set parameters
    pub fn parameters(mut self, params: Parameters) -> Self {
        self.parameters = params;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temp: f32) -> Self {
        self.parameters.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.parameters.max_tokens = Some(tokens);
        self
    }

    /// Build the request
    pub fn build(self) -> ChatRequest {
        ChatRequest {
            model: self.model.unwrap_or_default(),
            messages: self.messages,
            tools: self.tools,
            tool_choice: self.tool_choice,
            parameters: self.parameters,
        }
    }

    /// Try to build the request, returning an error if validation fails
    pub fn try_build(self) -> Result<ChatRequest, BuildError> {
        if self.model.as_deref().map_or(true, str::is_empty) {
            return Err(BuildError::NoModel);
        }
        if self.messages.is_empty() {
            return Err(BuildError::NoMessages);
        }
        Ok(self.build())
    }
}

/// A chat request constrained to exactly one tool, which the model must call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    /// The model to use
    pub model: String,
    /// The conversation messages
    pub messages: Vec<Message>,
    /// The tool the model is forced to call
    pub tool: Tool,
    /// Generation parameters
    pub parameters: Parameters,
}

impl ToolRequest {
    /// Create a tool request
    pub fn new(model: impl Into<String>, messages: Vec<Message>, tool: Tool) -> Self {
        Self {
            model: model.into(),
            messages,
            tool,
            parameters: Parameters::default(),
        }
    }

    /// Set temperature
    pub fn temperature(mut self, temp: f32) -> Self {
        self.parameters.temperature = Some(temp);
        self
    }

    /// Set parameters
    pub fn parameters(mut self, params: Parameters) -> Self {
        self.parameters = params;
        self
    }
}

impl From<ToolRequest> for ChatRequest {
    /// A single-tool chat request with the choice forced to that tool
    fn from(request: ToolRequest) -> Self {
        Self {
            model: request.model,
            messages: request.messages,
            tool_choice: Some(ToolChoice::tool(&request.tool)),
            tools: vec![request.tool],
            parameters: request.parameters,
        }
    }
}

/// Errors that can occur when building a request
#[derive(Debug, Error)]
pub enum BuildError {
    /// Request must name a model
    #[error("Request must name a model")]
    NoModel,
    /// Request must contain at least one message
    #[error("Request must contain at least one message")]
    NoMessages,
}
