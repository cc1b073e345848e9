//! Test utilities for chat module testing
//!
//! A scripted in-memory provider plus helpers for building routers and
//! reading streamed bodies.

use crate::chat::service::ChatService;
use crate::chat::types::ErrorExposure;
use crate::domain::{InferenceConfig, MaxTokens, ModelName, Temperature, TopP};
use crate::providers::constants::http::content_types::APPLICATION_JSON;
use crate::providers::{
    ChatProvider, ChunkStream, CompletionRequest, ModelSelector, ProviderChunk, ProviderError,
    ProviderId,
};
use async_trait::async_trait;
use axum::body::Body;
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One step of a scripted provider reply
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Chunk(ProviderChunk),
    Delay(Duration),
    Fail(ProviderError),
}

/// Provider that replays a fixed script and records what it was asked
pub struct ScriptedProvider {
    id: ProviderId,
    model: ModelName,
    script: Vec<ScriptStep>,
    open_error: Option<ProviderError>,
    calls: Arc<AtomicUsize>,
    streams_dropped: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// Counts a stream as dropped when it goes out of scope
struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl ScriptedProvider {
    pub fn new(id: ProviderId, model: &str, script: Vec<ScriptStep>) -> Self {
        Self {
            id,
            model: ModelName::try_new(model.to_string()).expect("test model name is valid"),
            script,
            open_error: None,
            calls: Arc::new(AtomicUsize::new(0)),
            streams_dropped: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail before any chunk is produced
    pub fn failing(id: ProviderId, error: ProviderError) -> Self {
        let mut provider = Self::new(id, "failing-model", Vec::new());
        provider.open_error = Some(error);
        provider
    }

    /// Shared counter of `stream_chat` calls
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Shared counter of reply streams dropped, finished or not
    pub fn streams_dropped(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.streams_dropped)
    }

    /// Shared log of received requests
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn default_model(&self) -> &ModelName {
        &self.model
    }

    async fn stream_chat(&self, request: CompletionRequest) -> Result<ChunkStream, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("request log lock poisoned")
            .push(request);

        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }

        let script = self.script.clone();
        let guard = DropCounter(Arc::clone(&self.streams_dropped));
        Ok(Box::pin(async_stream::stream! {
            let _guard = guard;
            for step in script {
                match step {
                    ScriptStep::Chunk(chunk) => yield Ok(chunk),
                    ScriptStep::Delay(duration) => tokio::time::sleep(duration).await,
                    ScriptStep::Fail(error) => {
                        yield Err(error);
                        return;
                    }
                }
            }
        }))
    }
}

pub fn test_inference() -> InferenceConfig {
    InferenceConfig {
        max_tokens: MaxTokens::try_new(2048).expect("valid max tokens"),
        temperature: Temperature::try_new(0.7).expect("valid temperature"),
        top_p: TopP::try_new(0.9).expect("valid top_p"),
    }
}

/// Router with the given providers registered and OpenAI as default
pub fn test_router(providers: Vec<ScriptedProvider>, exposure: ErrorExposure) -> axum::Router {
    let mut selector = ModelSelector::new(ProviderId::OpenAi);
    for provider in providers {
        selector.register(Arc::new(provider));
    }
    ChatService::new(selector, test_inference(), exposure).into_router()
}

/// Chat request with a single user message
pub fn chat_request(body: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", APPLICATION_JSON)
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Read a body until it ends or fails
///
/// Returns the text received and whether the body ended in an error.
pub async fn read_streamed_body(body: Body) -> (String, bool) {
    let mut body = body;
    let mut text = Vec::new();

    while let Some(frame) = body.frame().await {
        match frame {
            Ok(frame) => {
                if let Ok(data) = frame.into_data() {
                    text.extend_from_slice(&data);
                }
            }
            Err(_) => return (String::from_utf8_lossy(&text).into_owned(), true),
        }
    }

    (String::from_utf8_lossy(&text).into_owned(), false)
}
