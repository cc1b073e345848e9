//! Axum handlers for the chat service

use crate::chat::adapter::StreamAdapter;
use crate::chat::frames::StreamFrame;
use crate::chat::headers::{
    content_types, CACHE_CONTROL, CONTENT_TYPE, DATA_STREAM_VERSION, X_VERCEL_AI_DATA_STREAM,
};
use crate::chat::service::ChatService;
use crate::chat::types::{ChatRequestBody, ChatResult, ErrorExposure};
use crate::providers::{CompletionRequest, ProviderError};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use futures_util::{Stream, StreamExt};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{field, info, instrument, Span};

/// Embedded chat page
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// `POST /api/chat`
///
/// Validation, provider selection and stream setup happen before any byte
/// is written, so their failures are ordinary JSON error responses. Once
/// the body starts streaming, an upstream failure writes one error line and
/// aborts the body.
pub async fn chat_handler(
    State(service): State<Arc<ChatService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match start_chat(&service, &body).await {
        Ok(response) => response,
        Err(error) => error.into_response_with(service.exposure(), &headers),
    }
}

#[instrument(
    skip_all,
    fields(provider = field::Empty, model = field::Empty, messages = field::Empty)
)]
async fn start_chat(service: &ChatService, body: &[u8]) -> ChatResult<Response> {
    let request = ChatRequestBody::from_slice(body)?;
    let selection = request.provider_selection()?;
    let binding = service
        .selector()
        .select(selection, request.model.as_deref())?;

    let span = Span::current();
    span.record("provider", field::display(binding.provider_id()));
    span.record("model", field::display(&binding.model));
    span.record("messages", request.messages.len());

    let dispatched_at = Instant::now();
    let upstream = binding
        .provider
        .stream_chat(CompletionRequest {
            model: binding.model.clone(),
            conversation: request.messages,
            inference: service.inference(),
        })
        .await?;
    info!("Dispatched to provider");

    let frames =
        StreamAdapter::new(binding.provider_id(), binding.model, dispatched_at).adapt(upstream);

    Ok(data_stream_response(encode_frames(frames, service.exposure())))
}

/// Wrap an encoded frame stream in a data stream response
fn data_stream_response<S>(body: S) -> Response
where
    S: Stream<Item = Result<Bytes, ProviderError>> + Send + 'static,
{
    (
        StatusCode::OK,
        [
            (
                CONTENT_TYPE,
                HeaderValue::from_static(content_types::TEXT_PLAIN_UTF8),
            ),
            (CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        ],
        [(X_VERCEL_AI_DATA_STREAM, DATA_STREAM_VERSION)],
        Body::from_stream(body),
    )
        .into_response()
}

/// Encode frames as wire lines
///
/// An upstream failure becomes an error line, masked per `exposure`,
/// followed by the failure itself so the body ends in an error state.
/// Nothing is written after a terminal frame.
pub fn encode_frames<S>(
    frames: S,
    exposure: ErrorExposure,
) -> impl Stream<Item = Result<Bytes, ProviderError>> + Send + 'static
where
    S: Stream<Item = Result<StreamFrame, ProviderError>> + Send + 'static,
{
    async_stream::stream! {
        let mut frames = Box::pin(frames);

        while let Some(frame) = frames.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    if let Ok(line) = StreamFrame::error(exposure.client_message(&e)).encode() {
                        yield Ok(line);
                    }
                    yield Err(e);
                    return;
                }
            };

            match frame.encode() {
                Ok(bytes) => {
                    yield Ok(bytes);
                    if frame.is_terminal() {
                        return;
                    }
                }
                Err(e) => {
                    yield Err(ProviderError::InvalidResponse(format!(
                        "failed to encode frame: {e}"
                    )));
                    return;
                }
            }
        }
    }
}

/// Health check handler
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Chat page handler
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
