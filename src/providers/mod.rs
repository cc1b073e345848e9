//! Provider abstraction for LLM backends
//!
//! Every backend implements [`ChatProvider`]: it accepts a conversation and
//! returns its native streaming reply normalized into [`ProviderChunk`]s.
//! The [`selector::ModelSelector`] maps a request's provider/model choice to
//! one of the registered providers.

pub mod bedrock;
pub mod constants;
pub mod openai;
pub mod selector;

use crate::domain::{Conversation, FinishReason, InferenceConfig, ModelName, TokenUsage};
use async_trait::async_trait;
use derive_more::Display;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::str::FromStr;

pub use selector::{ModelBinding, ModelSelector, ProviderSelection};

/// Identifier of a configured provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Any OpenAI-compatible chat completions API
    #[display("openai")]
    OpenAi,
    /// AWS Bedrock Runtime (Converse API)
    #[display("bedrock")]
    Bedrock,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::OpenAi, ProviderId::Bedrock];
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            constants::provider_names::OPENAI => Ok(Self::OpenAi),
            constants::provider_names::BEDROCK => Ok(Self::Bedrock),
            other => Err(ProviderError::Configuration(format!(
                "unknown provider '{other}'"
            ))),
        }
    }
}

/// A single request handed to a provider
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: ModelName,
    pub conversation: Conversation,
    pub inference: InferenceConfig,
}

/// One normalized unit of a provider's streaming reply
///
/// A chunk may carry a text delta, a usage report, a finish reason, or any
/// combination of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderChunk {
    pub text: Option<String>,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<FinishReason>,
}

impl ProviderChunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn usage(usage: TokenUsage) -> Self {
        Self {
            usage: Some(usage),
            ..Default::default()
        }
    }

    pub fn finished(reason: FinishReason) -> Self {
        Self {
            finish_reason: Some(reason),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.usage.is_none() && self.finish_reason.is_none()
    }
}

/// Provider's native stream, already mapped to [`ProviderChunk`]s
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ProviderChunk, ProviderError>> + Send>>;

/// Core provider trait for LLM backends
///
/// Implementations must be safe to share between concurrent requests; they
/// are constructed once at startup and held behind an `Arc`.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> ProviderId;

    /// Model used when a request does not name one
    fn default_model(&self) -> &ModelName;

    /// Dispatch the request and return the provider's reply stream
    ///
    /// Errors returned here happen before any output was produced. Errors
    /// inside the stream happen mid-generation. Dropping the stream cancels
    /// the upstream request.
    async fn stream_chat(&self, request: CompletionRequest) -> Result<ChunkStream, ProviderError>;
}

/// Provider-specific error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream does not know the requested model or deployment
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("openai", ProviderId::OpenAi)]
    #[case("bedrock", ProviderId::Bedrock)]
    #[case(" Bedrock ", ProviderId::Bedrock)]
    #[case("OPENAI", ProviderId::OpenAi)]
    fn test_provider_id_parses(#[case] input: &str, #[case] expected: ProviderId) {
        assert_eq!(input.parse::<ProviderId>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_provider_is_configuration_error() {
        let error = "vertex".parse::<ProviderId>().unwrap_err();
        assert!(matches!(error, ProviderError::Configuration(_)));
        assert!(error.to_string().contains("vertex"));
    }

    #[test]
    fn test_provider_id_display_round_trips() {
        for id in ProviderId::ALL {
            assert_eq!(id.to_string().parse::<ProviderId>().unwrap(), id);
        }
    }

    #[test]
    fn test_chunk_constructors() {
        assert_eq!(ProviderChunk::text("hi").text.as_deref(), Some("hi"));
        assert_eq!(
            ProviderChunk::usage(TokenUsage::new(1, 2)).usage,
            Some(TokenUsage::new(1, 2))
        );
        assert_eq!(
            ProviderChunk::finished(FinishReason::Length).finish_reason,
            Some(FinishReason::Length)
        );
        assert!(ProviderChunk::default().is_empty());
    }
}
