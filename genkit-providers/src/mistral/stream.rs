//! Streaming implementation for Mistral
//!
//! Two layers: [`ChunkStream`] decodes the server-sent events of the response
//! body into chunks, and [`SnapshotStream`] folds those chunks into
//! cumulative messages.

use crate::constants::SSE_DONE;
use crate::error;
use crate::http::ResponseStream;
use crate::mistral::parser::{ChatCompletionChunk, MistralParser};
use crate::traits::StreamEventParser;
use eventsource_stream::{EventStream, EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use genkit_core::{Error, Message, StreamAccumulator};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::trace;

/// Boxed stream of decoded chunks
pub type BoxChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, Error>> + Send>>;

/// Decodes SSE events from a response body until `[DONE]` or end of body
pub struct ChunkStream {
    inner: EventStream<ResponseStream>,
    done: bool,
}

impl ChunkStream {
    /// Wrap a raw response body
    pub fn new(body: ResponseStream) -> Self {
        Self {
            inner: body.eventsource(),
            done: false,
        }
    }
}

fn event_stream_error(err: EventStreamError<Error>) -> Error {
    match err {
        EventStreamError::Transport(e) => e,
        other => Error::transport(format!("invalid event stream: {other}")),
    }
}

impl Stream for ChunkStream {
    type Item = Result<ChatCompletionChunk, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if self.done {
                return Poll::Ready(None);
            }

            match self.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    if event.data.is_empty() {
                        continue;
                    }
                    if event.data == SSE_DONE {
                        self.done = true;
                        return Poll::Ready(None);
                    }
                    trace!(data = %event.data, "mistral stream chunk");
                    let parsed =
                        serde_json::from_str(&event.data).map_err(error::serialization_error);
                    if parsed.is_err() {
                        self.done = true;
                    }
                    return Poll::Ready(Some(parsed));
                }
                Poll::Ready(Some(Err(e))) => {
                    self.done = true;
                    return Poll::Ready(Some(Err(event_stream_error(e))));
                }
                Poll::Ready(None) => {
                    self.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Cumulative message snapshots, one per streamed chunk
///
/// Each item reflects every chunk received so far. The stream ends after the
/// first error; dropping it releases the underlying connection.
pub struct SnapshotStream {
    inner: BoxChunkStream,
    parser: MistralParser,
    accumulator: StreamAccumulator,
    finished: bool,
}

impl SnapshotStream {
    /// Fold a chunk stream into snapshots
    pub(crate) fn new(chunks: BoxChunkStream) -> Self {
        Self {
            inner: chunks,
            parser: MistralParser,
            accumulator: StreamAccumulator::new(),
            finished: false,
        }
    }

    /// The message accumulated so far
    pub fn current(&self) -> &Message {
        self.accumulator.message()
    }

    fn fold(&mut self, chunk: ChatCompletionChunk) -> Result<Message, Error> {
        let delta = self.parser.parse_chunk(chunk)?;
        self.accumulator.merge(delta)
    }
}

impl Stream for SnapshotStream {
    type Item = Result<Message, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                let snapshot = SnapshotStream::fold(&mut self, chunk);
                if snapshot.is_err() {
                    self.finished = true;
                }
                Poll::Ready(Some(snapshot))
            }
            Poll::Ready(Some(Err(e))) => {
                self.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
