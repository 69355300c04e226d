//! Message types for conversations

use crate::types::tool::ToolCall;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Role {
    /// System message (instructions)
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
    /// Tool message (function result)
    Tool,
}

/// One segment of message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    /// Plain text content
    Text(String),
    /// Image content
    Image(Image),
}

/// Image content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Base64-encoded image data
    pub data: Option<String>,
    /// URL to the image
    pub url: Option<String>,
    /// MIME type (e.g., "image/png")
    pub mime_type: String,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// Natural end of message
    Stop,
    /// Hit max_tokens limit
    Length,
    /// Hit the model's context length
    ModelLength,
    /// Model decided to call a tool
    ToolCalls,
    /// Generation failed on the provider side
    Error,
}

/// A message in a conversation
///
/// Content is an ordered list of segments and may be empty, e.g. for an
/// assistant turn that only carries tool calls or for a streaming snapshot
/// taken before the first text delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The content segments of the message
    pub content: Vec<Content>,
    /// Tool calls requested by the assistant
    pub tool_calls: Vec<ToolCall>,
    /// Tool call ID if this is a tool response
    pub tool_call_id: Option<String>,
    /// Name of the tool that produced this message
    pub name: Option<String>,
    /// Why generation stopped, when known
    pub finish_reason: Option<FinishReason>,
}

impl Message {
    /// Create an empty message with the given role
    pub fn new(role: Role) -> Self {
        Self {
            role,
            content: Vec::new(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
            finish_reason: None,
        }
    }

    /// Create a simple text message
    pub fn with_text(role: Role, text: impl Into<String>) -> Self {
        let mut msg = Self::new(role);
        msg.content.push(Content::Text(text.into()));
        msg
    }

    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self::with_text(Role::System, text)
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_text(Role::User, text)
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_text(Role::Assistant, text)
    }

    /// Create a tool result message answering `tool_call_id`
    pub fn tool(
        text: impl Into<String>,
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let mut msg = Self::with_text(Role::Tool, text);
        msg.tool_call_id = Some(tool_call_id.into());
        msg.name = Some(name.into());
        msg
    }

    /// Attach tool calls to this message
    pub fn with_tool_calls(mut self, tool_calls: impl IntoIterator<Item = ToolCall>) -> Self {
        self.tool_calls.extend(tool_calls);
        self
    }

    /// Concatenated text of all text segments, `None` when there are none
    pub fn text(&self) -> Option<String> {
        let mut parts = self.content.iter().filter_map(Content::as_text).peekable();
        parts.peek()?;
        Some(parts.collect())
    }

    /// Append streamed text, extending the trailing text segment if present
    pub fn push_text(&mut self, delta: &str) {
        if let Some(Content::Text(last)) = self.content.last_mut() {
            last.push_str(delta);
        } else {
            self.content.push(Content::Text(delta.to_string()));
        }
    }

    /// Check if the message requests tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

impl Content {
    /// Get text content if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            Content::Image(_) => None,
        }
    }

    /// Get image content if this is an Image variant
    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Content::Image(img) => Some(img),
            Content::Text(_) => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "stop"),
            FinishReason::Length => write!(f, "length"),
            FinishReason::ModelLength => write!(f, "model_length"),
            FinishReason::ToolCalls => write!(f, "tool_calls"),
            FinishReason::Error => write!(f, "error"),
        }
    }
}

// Conversion implementations
impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<Image> for Content {
    fn from(image: Image) -> Self {
        Content::Image(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_concatenates_text_segments_only() {
        let mut msg = Message::user("Look at ");
        msg.content.push(Content::Image(Image {
            data: None,
            url: Some("https://example.com/cat.png".into()),
            mime_type: "image/png".into(),
        }));
        msg.content.push(Content::Text("this".into()));

        assert_eq!(msg.text().as_deref(), Some("Look at this"));
    }

    #[test]
    fn text_is_none_without_text_segments() {
        assert!(Message::new(Role::Assistant).text().is_none());
    }

    #[test]
    fn push_text_extends_trailing_segment() {
        let mut msg = Message::new(Role::Assistant);
        msg.push_text("Hel");
        msg.push_text("lo");

        assert_eq!(msg.content, vec![Content::Text("Hello".into())]);
    }

    #[test]
    fn tool_message_carries_call_id_and_name() {
        let msg = Message::tool("{\"temp\":21}", "tc1", "get_temp");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("tc1"));
        assert_eq!(msg.name.as_deref(), Some("get_temp"));
    }
}
