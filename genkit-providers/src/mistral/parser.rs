//! Response parsing for Mistral

use crate::traits::{ResponseParser, StreamEventParser};
use genkit_core::{
    Content, Error, FinishReason, Message, MessageDelta, Model, Role, ToolCall, ToolCallDelta,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Parses Mistral responses and stream chunks
#[derive(Debug, Clone, Copy, Default)]
pub struct MistralParser;

impl ResponseParser for MistralParser {
    type Response = ChatCompletionResponse;

    fn parse_response(&self, response: ChatCompletionResponse) -> Result<Message, Error> {
        if let Some(usage) = &response.usage {
            debug!(
                id = %response.id,
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "chat completion usage"
            );
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("No choices in response".to_string()))?;

        let reply = choice
            .message
            .ok_or_else(|| Error::MalformedResponse("Choice has no message".to_string()))?;

        let role = reply
            .role
            .as_deref()
            .ok_or_else(|| Error::MalformedResponse("Message has no role".to_string()))
            .and_then(|role| {
                decode_role(role)
                    .ok_or_else(|| Error::MalformedResponse(format!("Unknown role {role:?}")))
            })?;

        let mut message = Message::new(role);
        if let Some(content) = reply.content {
            message.content = content.into_segments();
        }
        message.tool_calls = reply
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let id = call.id.filter(|id| !id.is_empty()).ok_or_else(|| {
                    Error::MalformedResponse(format!(
                        "Tool call {:?} has no id",
                        call.function.name
                    ))
                })?;
                Ok(ToolCall {
                    id,
                    name: call.function.name,
                    arguments: arguments_text(call.function.arguments),
                })
            })
            .collect::<Result<_, Error>>()?;
        message.finish_reason = choice.finish_reason.as_deref().map(parse_finish_reason);

        Ok(message)
    }
}

impl StreamEventParser for MistralParser {
    type Chunk = ChatCompletionChunk;

    fn parse_chunk(&self, chunk: ChatCompletionChunk) -> Result<MessageDelta, Error> {
        if let Some(usage) = &chunk.usage {
            debug!(
                id = %chunk.id,
                model = %chunk.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "chat stream usage"
            );
        }

        // Only one choice is ever requested.
        let Some(choice) = chunk.choices.into_iter().next() else {
            return Ok(MessageDelta::default());
        };

        let role = choice.delta.role.as_deref().and_then(|role| {
            let decoded = decode_role(role);
            if decoded.is_none() {
                warn!(role, "ignoring unknown role in stream chunk");
            }
            decoded
        });

        let content = choice.delta.content.map(|content| content.into_text());

        let tool_calls = choice
            .delta
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let function = call.function.unwrap_or_default();
                ToolCallDelta {
                    index: call.index,
                    id: call.id.filter(|id| id != "null"),
                    name: function.name,
                    arguments: function.arguments.map(arguments_text),
                }
            })
            .collect();

        Ok(MessageDelta {
            role,
            content,
            tool_calls,
            finish_reason: choice.finish_reason.as_deref().map(parse_finish_reason),
        })
    }
}

impl MistralParser {
    /// Pick the first embedding vector, or none
    pub fn parse_embeddings(&self, response: EmbeddingResponse) -> Vec<f64> {
        match response.data.into_iter().next() {
            Some(entry) => entry.embedding,
            None => {
                warn!(model = %response.model, "embedding response carried no data");
                Vec::new()
            }
        }
    }

    /// Map every listed model, without filtering
    pub fn parse_models(&self, response: ModelList) -> Vec<Model> {
        response
            .data
            .into_iter()
            .map(|entry| Model::new(entry.id, entry.owned_by))
            .collect()
    }
}

/// Map a wire role name back to a generic role
pub fn decode_role(role: &str) -> Option<Role> {
    match role {
        "system" => Some(Role::System),
        "user" => Some(Role::User),
        "assistant" => Some(Role::Assistant),
        "tool" => Some(Role::Tool),
        _ => None,
    }
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "length" => FinishReason::Length,
        "model_length" => FinishReason::ModelLength,
        "tool_calls" => FinishReason::ToolCalls,
        "error" => FinishReason::Error,
        _ => FinishReason::Stop,
    }
}

// Arguments normally arrive as a JSON string but some models send an object.
fn arguments_text(arguments: Value) -> String {
    match arguments {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Response structures
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub role: Option<String>,
    pub content: Option<ResponseContent>,
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResponseContent {
    Text(String),
    Chunks(Vec<ResponseChunk>),
}

impl ResponseContent {
    fn into_segments(self) -> Vec<Content> {
        match self {
            ResponseContent::Text(text) if text.is_empty() => Vec::new(),
            ResponseContent::Text(text) => vec![Content::Text(text)],
            ResponseContent::Chunks(chunks) => chunks
                .into_iter()
                .filter_map(|chunk| match chunk {
                    ResponseChunk::Text { text } => Some(Content::Text(text)),
                    ResponseChunk::Other => None,
                })
                .collect(),
        }
    }

    fn into_text(self) -> String {
        match self {
            ResponseContent::Text(text) => text,
            ResponseContent::Chunks(chunks) => chunks
                .into_iter()
                .filter_map(|chunk| match chunk {
                    ResponseChunk::Text { text } => Some(text),
                    ResponseChunk::Other => None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseChunk {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct ResponseToolCall {
    pub id: Option<String>,
    #[serde(default)]
    pub function: ResponseFunction,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseFunction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Deserialize)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// Streaming structures
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    pub usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    pub role: Option<String>,
    pub content: Option<ResponseContent>,
    pub tool_calls: Option<Vec<ChunkToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkToolCall {
    pub index: Option<usize>,
    pub id: Option<String>,
    pub function: Option<ChunkFunction>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkFunction {
    pub name: Option<String>,
    pub arguments: Option<Value>,
}

// Embedding and model listing structures
#[derive(Debug, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingData {
    pub embedding: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelCard>,
}

#[derive(Debug, Deserialize)]
pub struct ModelCard {
    pub id: String,
    #[serde(default)]
    pub owned_by: String,
}
