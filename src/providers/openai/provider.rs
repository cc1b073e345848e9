//! OpenAI-compatible provider implementation

use crate::config::HttpClientSettings;
use crate::domain::ModelName;
use crate::providers::constants::{error_messages, openai::CHAT_COMPLETIONS_PATH};
use crate::providers::openai::streaming::into_chunk_stream;
use crate::providers::openai::types::{ApiErrorEnvelope, ChatCompletionsRequest};
use crate::providers::{ChatProvider, ChunkStream, CompletionRequest, ProviderError, ProviderId};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

/// Longest upstream error body quoted in an error message
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Provider for any OpenAI-compatible chat completions API
///
/// Does not derive `Debug` so the API key cannot end up in logs.
pub struct OpenAiProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: ModelName,
}

impl OpenAiProvider {
    /// Create a provider sharing the given connection pool
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        api_key: Option<String>,
        model: ModelName,
    ) -> Self {
        if api_key.is_none() {
            warn!("{}", error_messages::MISSING_API_KEY);
        }

        let endpoint = format!(
            "{}{}",
            api_base.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        );

        Self {
            http,
            endpoint,
            api_key,
            model,
        }
    }

    /// Build the pooled HTTP client used for all requests to the provider
    pub fn http_client(settings: &HttpClientSettings) -> Result<reqwest::Client, ProviderError> {
        reqwest::Client::builder()
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .tcp_keepalive(settings.tcp_keepalive())
            .connect_timeout(settings.connect_timeout())
            .read_timeout(settings.read_timeout())
            .build()
            .map_err(|e| ProviderError::Configuration(format!("failed to build HTTP client: {e}")))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn default_model(&self) -> &ModelName {
        &self.model
    }

    #[instrument(skip_all, fields(provider = %self.id(), model = %request.model))]
    async fn stream_chat(&self, request: CompletionRequest) -> Result<ChunkStream, ProviderError> {
        let body = ChatCompletionsRequest::from(&request);

        let mut builder = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &text));
        }

        debug!(status = status.as_u16(), "Stream opened");
        Ok(into_chunk_stream(response))
    }
}

/// Map a non-success status and body to a provider error
fn error_for_status(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| match envelope.error.kind {
            Some(kind) => format!("{kind}: {}", envelope.error.message),
            None => envelope.error.message,
        })
        .unwrap_or_else(|_| body.chars().take(MAX_ERROR_BODY_CHARS).collect());
    let message = format!("{status}: {message}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Authentication(message),
        StatusCode::NOT_FOUND => ProviderError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::InvalidRequest(message)
        }
        _ => ProviderError::RequestFailed(message),
    }
}
