//! AWS Bedrock provider implementation

use crate::domain::ModelName;
use crate::providers::bedrock::conversation::{
    converse_messages, inference_configuration, system_blocks,
};
use crate::providers::bedrock::streaming::into_chunk_stream;
use crate::providers::{ChatProvider, ChunkStream, CompletionRequest, ProviderError, ProviderId};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, SdkError};
use aws_sdk_bedrockruntime::operation::converse_stream::ConverseStreamError;
use aws_sdk_bedrockruntime::Client;
use std::fmt::Debug;
use tracing::{debug, instrument};

/// AWS Bedrock provider
pub struct BedrockProvider {
    client: Client,
    model: ModelName,
}

impl BedrockProvider {
    /// Create a new Bedrock provider around a shared SDK client
    pub fn new(client: Client, model: ModelName) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl ChatProvider for BedrockProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Bedrock
    }

    fn default_model(&self) -> &ModelName {
        &self.model
    }

    #[instrument(skip_all, fields(provider = %self.id(), model = %request.model))]
    async fn stream_chat(&self, request: CompletionRequest) -> Result<ChunkStream, ProviderError> {
        let messages = converse_messages(&request.conversation)?;
        let system = system_blocks(&request.conversation);

        let output = self
            .client
            .converse_stream()
            .model_id(request.model.as_ref())
            .set_messages(Some(messages))
            .set_system((!system.is_empty()).then_some(system))
            .inference_config(inference_configuration(&request.inference))
            .send()
            .await
            .map_err(map_send_error)?;

        debug!("Stream opened");
        Ok(into_chunk_stream(output.stream))
    }
}

/// Map a failed ConverseStream call to a provider error
pub(crate) fn map_send_error<R>(err: SdkError<ConverseStreamError, R>) -> ProviderError
where
    R: Debug,
{
    let message = DisplayErrorContext(&err).to_string();

    match err.as_service_error() {
        Some(ConverseStreamError::AccessDeniedException(_)) => {
            ProviderError::Authentication(message)
        }
        Some(ConverseStreamError::ResourceNotFoundException(_)) => {
            ProviderError::NotFound(message)
        }
        Some(ConverseStreamError::ValidationException(_)) => ProviderError::InvalidRequest(message),
        _ => ProviderError::RequestFailed(message),
    }
}
