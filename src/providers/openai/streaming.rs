//! SSE stream to [`ProviderChunk`] adapter for chat completions

use crate::domain::{FinishReason, TokenUsage};
use crate::providers::constants::openai::{DONE_SENTINEL, FINISH_LENGTH, FINISH_STOP};
use crate::providers::openai::types::ChatCompletionChunk;
use crate::providers::{ChunkStream, ProviderChunk, ProviderError};
use eventsource_stream::Eventsource;
use futures_util::StreamExt;

/// Map the body of a streaming chat completions response to chunks
///
/// The stream ends at the `[DONE]` sentinel or when the body ends. A
/// transport or decode failure is yielded once and ends the stream.
pub fn into_chunk_stream(response: reqwest::Response) -> ChunkStream {
    Box::pin(async_stream::stream! {
        let mut events = Box::pin(response.bytes_stream().eventsource());

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    yield Err(ProviderError::Stream(format!("SSE error: {e}")));
                    return;
                }
            };

            if event.data == DONE_SENTINEL {
                break;
            }

            match parse_chunk(&event.data) {
                Ok(Some(chunk)) => yield Ok(chunk),
                Ok(None) => {}
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    })
}

/// Parse one `data:` payload; `None` when it carries nothing of interest
pub fn parse_chunk(data: &str) -> Result<Option<ProviderChunk>, ProviderError> {
    let parsed: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| ProviderError::InvalidResponse(format!("malformed stream chunk: {e}")))?;

    let mut chunk = ProviderChunk::default();

    if let Some(choice) = parsed.choices.into_iter().next() {
        chunk.text = choice.delta.content;
        chunk.finish_reason = choice.finish_reason.as_deref().map(map_finish_reason);
    }

    if let Some(usage) = parsed.usage {
        chunk.usage = Some(match usage.total_tokens {
            Some(total) => {
                TokenUsage::with_total(usage.prompt_tokens, usage.completion_tokens, total)
            }
            None => TokenUsage::new(usage.prompt_tokens, usage.completion_tokens),
        });
    }

    Ok((!chunk.is_empty()).then_some(chunk))
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        FINISH_LENGTH => FinishReason::Length,
        FINISH_STOP => FinishReason::Stop,
        // tool_calls, content_filter and provider-specific reasons
        _ => FinishReason::Stop,
    }
}
