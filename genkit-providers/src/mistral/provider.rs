//! Mistral provider implementation
//!
//! This module wires the Mistral codec to the capability traits from
//! `genkit-core`: chat, single-tool chat (both with streaming variants),
//! embeddings and model listing.

use crate::http::{HttpClient, ReqwestClient};
use crate::mistral::{
    client::MistralClient, config::MistralConfig, converter::EmbeddingRequest,
    converter::MistralConverter, parser::MistralParser, stream::SnapshotStream,
};
use crate::traits::{RequestConverter, ResponseParser};
use async_trait::async_trait;
use futures::StreamExt;
use genkit_core::{
    ChatRequest, ChatService, EmbeddingService, Error, Message, Model, ModelService, ToolRequest,
    ToolService,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Mistral provider
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent calls.
///
/// # Example
///
/// ```no_run
/// use genkit_providers::Mistral;
/// use genkit_core::{ChatRequest, ChatService, Message};
///
/// # async fn run() -> genkit_core::Result<()> {
/// let provider = Mistral::from_env()?;
/// let request = ChatRequest::new("mistral-small-latest", vec![Message::user("Hello")]);
/// let reply = provider.completion(request).await?;
/// println!("{}", reply.text().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Mistral {
    client: MistralClient,
    converter: MistralConverter,
    parser: MistralParser,
}

impl Mistral {
    /// Create a provider with the given configuration and client
    pub fn new(config: MistralConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            client: MistralClient::new(config, client),
            converter: MistralConverter,
            parser: MistralParser,
        }
    }

    /// Create a provider with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::new(MistralConfig::new(api_key), client))
    }

    /// Create a provider configured from `MISTRAL_API_KEY` and `MISTRAL_BASE_URL`
    pub fn from_env() -> Result<Self, Error> {
        let config = MistralConfig::from_env()?;
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::new(config, client))
    }

    /// The active configuration
    pub fn config(&self) -> &MistralConfig {
        self.client.config()
    }

    /// Stream a chat request as cumulative snapshots
    ///
    /// Encoding errors are returned before any network traffic happens.
    pub async fn stream_chat(&self, request: &ChatRequest) -> Result<SnapshotStream, Error> {
        let body = self.converter.convert_request(request, true)?;
        let chunks = self.client.chat_stream(&body).await?;
        Ok(SnapshotStream::new(Box::pin(chunks)))
    }

    async fn complete(&self, request: &ChatRequest) -> Result<Message, Error> {
        debug!(model = %request.model, tools = request.tools.len(), stream = false, "mistral chat");
        let body = self.converter.convert_request(request, false)?;
        let response = self.client.chat(&body).await?;
        self.parser.parse_response(response)
    }

    async fn forward(
        &self,
        request: &ChatRequest,
        updates: mpsc::Sender<Message>,
    ) -> Result<(), Error> {
        debug!(model = %request.model, tools = request.tools.len(), stream = true, "mistral chat");
        let mut snapshots = self.stream_chat(request).await?;
        loop {
            // A receiver dropped while the server is silent still cancels.
            let snapshot = tokio::select! {
                biased;
                () = updates.closed() => None,
                next = snapshots.next() => match next {
                    Some(snapshot) => Some(snapshot?),
                    None => return Ok(()),
                },
            };
            let sent = match snapshot {
                Some(snapshot) => updates.send(snapshot).await.is_ok(),
                None => false,
            };
            if !sent {
                info!(model = %request.model, "update receiver closed, cancelling stream");
                return Err(Error::Cancelled);
            }
        }
    }
}

#[async_trait]
impl ChatService for Mistral {
    async fn completion(&self, request: ChatRequest) -> Result<Message, Error> {
        self.complete(&request).await
    }

    async fn completion_stream(
        &self,
        request: ChatRequest,
        updates: mpsc::Sender<Message>,
    ) -> Result<(), Error> {
        self.forward(&request, updates).await
    }
}

#[async_trait]
impl ToolService for Mistral {
    async fn tool_completion(&self, request: ToolRequest) -> Result<Message, Error> {
        self.complete(&ChatRequest::from(request)).await
    }

    async fn tool_completion_stream(
        &self,
        request: ToolRequest,
        updates: mpsc::Sender<Message>,
    ) -> Result<(), Error> {
        self.forward(&ChatRequest::from(request), updates).await
    }
}

#[async_trait]
impl EmbeddingService for Mistral {
    async fn embeddings(&self, model: &Model, input: &str) -> Result<Vec<f64>, Error> {
        let request = EmbeddingRequest::single(model.id.clone(), input);
        let response = self.client.embeddings(&request).await?;
        Ok(self.parser.parse_embeddings(response))
    }
}

#[async_trait]
impl ModelService for Mistral {
    async fn models(&self) -> Result<Vec<Model>, Error> {
        let response = self.client.models().await?;
        Ok(self.parser.parse_models(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ResponseStream;
    use bytes::Bytes;
    use futures::stream;
    use genkit_core::{Role, Tool};
    use pretty_assertions::assert_eq;
    use reqwest::header::HeaderMap;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records request bodies and replays canned answers
    #[derive(Default)]
    struct FakeClient {
        bodies: Mutex<Vec<(String, Value)>>,
        reply: Value,
        events: Vec<&'static str>,
        silent_after_events: bool,
    }

    impl FakeClient {
        fn replying(reply: Value) -> Self {
            Self {
                reply,
                ..Self::default()
            }
        }

        fn streaming(events: Vec<&'static str>) -> Self {
            Self {
                events,
                ..Self::default()
            }
        }

        fn last_body(&self) -> (String, Value) {
            self.bodies.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HttpClient for FakeClient {
        async fn post(&self, url: &str, _headers: HeaderMap, body: Value) -> Result<Value, Error> {
            self.bodies.lock().unwrap().push((url.to_string(), body));
            Ok(self.reply.clone())
        }

        async fn post_stream(
            &self,
            url: &str,
            _headers: HeaderMap,
            body: Value,
        ) -> Result<ResponseStream, Error> {
            self.bodies.lock().unwrap().push((url.to_string(), body));
            let chunks: Vec<Result<Bytes, Error>> = self
                .events
                .iter()
                .map(|event| Ok(Bytes::from_static(event.as_bytes())))
                .collect();
            if self.silent_after_events {
                Ok(Box::pin(stream::iter(chunks).chain(stream::pending())))
            } else {
                Ok(Box::pin(stream::iter(chunks)))
            }
        }

        async fn get(&self, url: &str, _headers: HeaderMap) -> Result<Value, Error> {
            self.bodies.lock().unwrap().push((url.to_string(), Value::Null));
            Ok(self.reply.clone())
        }
    }

    fn provider(fake: Arc<FakeClient>) -> Mistral {
        Mistral::new(
            MistralConfig::new("test-key").with_base_url("http://mistral.test/v1"),
            fake,
        )
    }

    fn weather_tool() -> Tool {
        Tool::new(
            "get_weather",
            "Current weather for a city",
            json!({"type": "object", "properties": {"city": {"type": "string"}}}),
        )
    }

    #[tokio::test]
    async fn chat_completion_round_trip() {
        let fake = Arc::new(FakeClient::replying(json!({
            "id": "cmpl-1",
            "model": "mistral-small-latest",
            "choices": [{"message": {"role": "assistant", "content": "Bonjour"}, "finish_reason": "stop"}]
        })));
        let mistral = provider(fake.clone());

        let request = ChatRequest::new("mistral-small-latest", vec![Message::user("Hi")]);
        let reply = mistral.completion(request).await.unwrap();

        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text().as_deref(), Some("Bonjour"));

        let (url, body) = fake.last_body();
        assert_eq!(url, "http://mistral.test/v1/chat/completions");
        assert_eq!(body["stream"], json!(false));
        assert_eq!(body["tool_choice"], json!("none"));
    }

    #[tokio::test]
    async fn tool_completion_forces_the_tool() {
        let fake = Arc::new(FakeClient::replying(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{"id": "call_1", "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}}]
            }}]
        })));
        let mistral = provider(fake.clone());

        let request = ToolRequest::new("m", vec![Message::user("Paris?")], weather_tool());
        let reply = mistral.tool_completion(request).await.unwrap();

        assert_eq!(reply.tool_calls[0].id, "call_1");
        let (_, body) = fake.last_body();
        assert_eq!(
            body["tool_choice"],
            json!({"type": "function", "function": {"name": "get_weather"}})
        );
        assert_eq!(body["tools"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn encoding_errors_happen_before_any_request() {
        let fake = Arc::new(FakeClient::default());
        let mistral = provider(fake.clone());

        let request = ChatRequest::builder()
            .model("m")
            .message(Message::user("hi"))
            .tool(weather_tool())
            .tool_choice(genkit_core::ToolChoice::Specific("missing".into()))
            .build();

        let result = mistral.completion(request).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
        assert!(fake.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stream_sends_one_snapshot_per_chunk() {
        let fake = Arc::new(FakeClient::streaming(vec![
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        ]));
        let mistral = provider(fake.clone());
        let (tx, mut rx) = mpsc::channel(8);

        let request = ChatRequest::new("m", vec![Message::user("Hi")]);
        mistral.completion_stream(request, tx).await.unwrap();

        let mut texts = Vec::new();
        while let Some(snapshot) = rx.recv().await {
            texts.push(snapshot.text().unwrap_or_default());
        }
        assert_eq!(texts, vec!["", "Hel", "Hello"]);
        assert_eq!(fake.last_body().1["stream"], json!(true));
    }

    #[tokio::test]
    async fn closed_receiver_cancels_the_stream() {
        let fake = Arc::new(FakeClient::streaming(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n",
        ]));
        let mistral = provider(fake);
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let request = ChatRequest::new("m", vec![Message::user("Hi")]);
        let result = mistral.completion_stream(request, tx).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn receiver_dropped_while_server_is_silent_cancels() {
        let fake = Arc::new(FakeClient {
            events: vec![": keep-alive\n\n"],
            silent_after_events: true,
            ..FakeClient::default()
        });
        let mistral = provider(fake);
        let (tx, rx) = mpsc::channel(1);

        let request = ChatRequest::new("m", vec![Message::user("Hi")]);
        let task = tokio::spawn(async move { mistral.completion_stream(request, tx).await });
        tokio::task::yield_now().await;
        drop(rx);

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("stream kept waiting on a closed receiver")
            .unwrap();
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn models_are_listed_unfiltered() {
        let fake = Arc::new(FakeClient::replying(json!({
            "object": "list",
            "data": [
                {"id": "mistral-small-latest", "owned_by": "mistralai"},
                {"id": "ft:custom", "owned_by": "acme"}
            ]
        })));
        let mistral = provider(fake.clone());

        let models = mistral.models().await.unwrap();
        assert_eq!(
            models,
            vec![
                Model::new("mistral-small-latest", "mistralai"),
                Model::new("ft:custom", "acme"),
            ]
        );
        assert_eq!(fake.last_body().0, "http://mistral.test/v1/models");
    }

    #[tokio::test]
    async fn embeddings_take_the_first_vector() {
        let fake = Arc::new(FakeClient::replying(json!({
            "model": "mistral-embed",
            "data": [{"embedding": [0.25, -0.5]}, {"embedding": [9.0]}]
        })));
        let mistral = provider(fake.clone());

        let vector = mistral
            .embeddings(&Model::new("mistral-embed", "mistralai"), "hello")
            .await
            .unwrap();
        assert_eq!(vector, vec![0.25, -0.5]);

        let (url, body) = fake.last_body();
        assert_eq!(url, "http://mistral.test/v1/embeddings");
        assert_eq!(body, json!({"model": "mistral-embed", "input": ["hello"]}));
    }
}
