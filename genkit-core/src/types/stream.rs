//! Streaming types for incremental responses

use crate::error::{Error, Result};
use crate::types::message::{FinishReason, Message, Role};
use crate::types::tool::ToolCall;

/// A chunk of tool call information
///
/// Providers identify the call a delta belongs to by positional `index`,
/// by `id`, or both. Either may be missing on any given delta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallDelta {
    /// Position of the tool call in the provider's list
    pub index: Option<usize>,
    /// Tool call ID
    pub id: Option<String>,
    /// Function name piece
    pub name: Option<String>,
    /// Arguments piece (partial JSON)
    pub arguments: Option<String>,
}

/// One incremental fragment of a streamed message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageDelta {
    /// Role, usually only on the first fragment
    pub role: Option<Role>,
    /// Text to append to the message content
    pub content: Option<String>,
    /// Tool call pieces, in provider order
    pub tool_calls: Vec<ToolCallDelta>,
    /// Finish reason, usually only on the last fragment
    pub finish_reason: Option<FinishReason>,
}

impl MessageDelta {
    /// A fragment carrying only text
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    /// A fragment carrying only a role
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    /// A fragment carrying a single tool call piece
    pub fn tool_call(delta: ToolCallDelta) -> Self {
        Self {
            tool_calls: vec![delta],
            ..Default::default()
        }
    }

    /// True for heartbeat/metadata fragments that change nothing
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.content.as_deref().map_or(true, str::is_empty)
            && self.tool_calls.is_empty()
            && self.finish_reason.is_none()
    }
}

/// Which provider identity a tool call in the running message is bound to
#[derive(Debug, Clone, Default)]
struct Binding {
    index: Option<usize>,
}

/// Accumulates streamed fragments into a complete message
///
/// Starts as an empty assistant message. Every call to [`merge`](Self::merge)
/// returns an owned snapshot; content and tool-call arguments only ever grow.
#[derive(Debug, Clone)]
pub struct StreamAccumulator {
    message: Message,
    bindings: Vec<Binding>,
}

impl Default for StreamAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self {
            message: Message::new(Role::Assistant),
            bindings: Vec::new(),
        }
    }

    /// Merge one fragment and return the updated snapshot
    ///
    /// A fragment that contradicts an earlier tool-call identity is rejected
    /// as a whole. The returned [`Error::ProtocolViolation`] carries the
    /// snapshot as it stood before that fragment.
    pub fn merge(&mut self, delta: MessageDelta) -> Result<Message> {
        if delta.is_empty() {
            return Ok(self.message.clone());
        }

        let mut message = self.message.clone();
        let mut bindings = self.bindings.clone();

        if let Some(text) = delta.content.as_deref().filter(|t| !t.is_empty()) {
            message.push_text(text);
        }

        for call in delta.tool_calls {
            if let Err(reason) = apply_tool_call(&mut message, &mut bindings, call) {
                tracing::warn!(%reason, "rejecting stream fragment");
                return Err(Error::ProtocolViolation {
                    message: reason,
                    partial: Box::new(self.message.clone()),
                });
            }
        }

        if let Some(role) = delta.role {
            message.role = role;
        }
        if let Some(reason) = delta.finish_reason {
            message.finish_reason = Some(reason);
        }

        self.message = message;
        self.bindings = bindings;
        Ok(self.message.clone())
    }

    /// The snapshot accumulated so far
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Consume the accumulator, returning the final message
    pub fn into_message(self) -> Message {
        self.message
    }
}

fn apply_tool_call(
    message: &mut Message,
    bindings: &mut Vec<Binding>,
    delta: ToolCallDelta,
) -> std::result::Result<(), String> {
    let id = delta.id.filter(|id| !id.is_empty());

    let by_index = delta
        .index
        .and_then(|i| bindings.iter().position(|b| b.index == Some(i)));
    let by_id = id
        .as_deref()
        .and_then(|id| message.tool_calls.iter().position(|tc| tc.id == id));

    let position = match (by_index, by_id) {
        (Some(a), Some(b)) if a != b => {
            return Err(format!(
                "tool call id {:?} already belongs to a different call than index {}",
                id.unwrap_or_default(),
                delta.index.unwrap_or_default()
            ));
        }
        (Some(pos), _) => pos,
        (None, Some(pos)) => {
            if let (Some(want), Some(bound)) = (delta.index, bindings[pos].index) {
                return Err(format!(
                    "tool call {:?} is bound to index {bound}, fragment says {want}",
                    message.tool_calls[pos].id
                ));
            }
            pos
        }
        // Continuation pieces with no identity belong to the latest call.
        (None, None) if delta.index.is_none() && id.is_none() && !bindings.is_empty() => {
            bindings.len() - 1
        }
        (None, None) => {
            message.tool_calls.push(ToolCall::default());
            bindings.push(Binding::default());
            bindings.len() - 1
        }
    };

    let binding = &mut bindings[position];
    if binding.index.is_none() {
        binding.index = delta.index;
    }

    let tool_call = &mut message.tool_calls[position];
    if let Some(id) = id {
        if tool_call.id.is_empty() {
            tool_call.id = id;
        } else if tool_call.id != id {
            return Err(format!(
                "index {} already has id {:?}, fragment says {:?}",
                delta.index.unwrap_or(position),
                tool_call.id,
                id
            ));
        }
    }
    if let Some(name) = delta.name {
        tool_call.name.push_str(&name);
    }
    if let Some(arguments) = delta.arguments {
        tool_call.arguments.push_str(&arguments);
    }
    Ok(())
}
