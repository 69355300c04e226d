//! Request encoding for Mistral
//!
//! Encoding is a pure function of its inputs. Empty lists are always
//! omitted and optional parameters are only written when set, so the same
//! request serializes to the same bytes every time.

use crate::traits::RequestConverter;
use genkit_core::{ChatRequest, Content, Error, Message, Role, Tool, ToolChoice};
use serde::Serialize;
use serde_json::Value;

/// Converts generic requests to Mistral format
#[derive(Debug, Clone, Copy, Default)]
pub struct MistralConverter;

impl RequestConverter for MistralConverter {
    type Request = ChatCompletionRequest;

    fn convert_request(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<ChatCompletionRequest, Error> {
        let params = &request.parameters;
        Ok(ChatCompletionRequest {
            model: request.model.clone(),
            messages: encode_messages(&request.messages)?,
            tools: encode_tools(&request.tools),
            tool_choice: encode_tool_choice(&request.tools, request.tool_choice.as_ref())?,
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stop: params.stop.clone(),
            random_seed: params.random_seed,
            stream,
        })
    }
}

/// Map a generic role to its wire name
pub fn encode_role(role: Role) -> Result<&'static str, Error> {
    match role {
        Role::System => Ok("system"),
        Role::User => Ok("user"),
        Role::Assistant => Ok("assistant"),
        Role::Tool => Ok("tool"),
        other => Err(Error::UnsupportedRole(other)),
    }
}

/// Encode conversation messages
pub fn encode_messages(messages: &[Message]) -> Result<Vec<WireMessage>, Error> {
    messages.iter().map(encode_message).collect()
}

fn encode_message(message: &Message) -> Result<WireMessage, Error> {
    let role = encode_role(message.role)?;
    let tool_calls = message
        .tool_calls
        .iter()
        .map(|call| WireToolCall {
            id: call.id.clone(),
            kind: "function",
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        })
        .collect();

    Ok(WireMessage {
        role,
        content: encode_content(&message.content)?,
        tool_calls,
        tool_call_id: message.tool_call_id.clone(),
        name: message.name.clone(),
    })
}

fn encode_content(content: &[Content]) -> Result<WireContent, Error> {
    match content {
        [] => Ok(WireContent::Text(String::new())),
        [Content::Text(text)] => Ok(WireContent::Text(text.clone())),
        segments => segments
            .iter()
            .map(|segment| match segment {
                Content::Text(text) => Ok(WireChunk::Text { text: text.clone() }),
                Content::Image(image) => match (&image.url, &image.data) {
                    (Some(url), _) => Ok(WireChunk::ImageUrl {
                        image_url: url.clone(),
                    }),
                    (None, Some(data)) => Ok(WireChunk::ImageUrl {
                        image_url: format!("data:{};base64,{}", image.mime_type, data),
                    }),
                    (None, None) => Err(Error::InvalidRequest(
                        "Image must have either URL or data".to_string(),
                    )),
                },
            })
            .collect::<Result<Vec<_>, _>>()
            .map(WireContent::Chunks),
    }
}

/// Encode tool definitions; the schema is passed through untouched
pub fn encode_tools(tools: &[Tool]) -> Vec<WireTool> {
    tools
        .iter()
        .map(|tool| WireTool {
            kind: "function",
            function: WireFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        })
        .collect()
}

/// Encode the tool policy
///
/// Without tools the model may not call any. With tools and no explicit
/// choice the model decides. A forced tool must be one of `tools`.
pub fn encode_tool_choice(
    tools: &[Tool],
    choice: Option<&ToolChoice>,
) -> Result<WireToolChoice, Error> {
    if tools.is_empty() {
        return Ok(WireToolChoice::Mode("none"));
    }
    match choice {
        None | Some(ToolChoice::Auto) => Ok(WireToolChoice::Mode("auto")),
        Some(ToolChoice::None) => Ok(WireToolChoice::Mode("none")),
        Some(ToolChoice::Specific(name)) => {
            if !tools.iter().any(|tool| &tool.name == name) {
                return Err(Error::InvalidRequest(format!(
                    "tool choice {name:?} is not among the request's tools"
                )));
            }
            Ok(WireToolChoice::Function {
                kind: "function",
                function: WireFunctionName { name: name.clone() },
            })
        }
    }
}

/// Body of `POST /chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    pub tool_choice: WireToolChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: WireContent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Chunks(Vec<WireChunk>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireChunk {
    Text { text: String },
    ImageUrl { image_url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireFunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireToolChoice {
    Mode(&'static str),
    Function {
        #[serde(rename = "type")]
        kind: &'static str,
        function: WireFunctionName,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireFunctionName {
    pub name: String,
}

/// Body of `POST /embeddings`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: Vec<String>,
}

impl EmbeddingRequest {
    /// Embed a single input string
    pub fn single(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: vec![input.into()],
        }
    }
}
