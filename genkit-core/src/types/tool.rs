//! Tool/function calling types

use serde::{Deserialize, Serialize};

/// A tool that can be called by the model
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for the parameters, passed to the provider untouched
    pub parameters: serde_json::Value,
}

impl Tool {
    /// Create a tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// How the model should use tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// Never call tools
    None,
    /// Let the model decide
    Auto,
    /// Call the named tool
    Specific(String),
}

impl ToolChoice {
    /// Force the given tool
    pub fn tool(tool: &Tool) -> Self {
        Self::Specific(tool.name.clone())
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique ID for this call
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// JSON-encoded arguments; parse once the call is complete
    pub arguments: String,
}

impl ToolCall {
    /// Create a tool call
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the accumulated arguments
    pub fn parse_arguments(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.arguments)?)
    }
}
