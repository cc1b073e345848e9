//! ConverseStream event stream to [`ProviderChunk`] adapter

use crate::domain::{FinishReason, TokenUsage};
use crate::providers::{ChunkStream, ProviderChunk, ProviderError};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::event_stream::EventReceiver;
use aws_sdk_bedrockruntime::types::error::ConverseStreamOutputError;
use aws_sdk_bedrockruntime::types::{ContentBlockDelta, ConverseStreamOutput, StopReason};

/// Map a ConverseStream event receiver to chunks
///
/// Events without text, usage or a stop reason are skipped. A receive
/// failure is yielded once and ends the stream.
pub fn into_chunk_stream(
    mut receiver: EventReceiver<ConverseStreamOutput, ConverseStreamOutputError>,
) -> ChunkStream {
    Box::pin(async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(Some(event)) => {
                    if let Some(chunk) = chunk_from_event(&event) {
                        yield Ok(chunk);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    yield Err(ProviderError::Stream(DisplayErrorContext(&e).to_string()));
                    break;
                }
            }
        }
    })
}

/// Normalize one ConverseStream event
pub fn chunk_from_event(event: &ConverseStreamOutput) -> Option<ProviderChunk> {
    match event {
        ConverseStreamOutput::ContentBlockDelta(delta) => match delta.delta() {
            Some(ContentBlockDelta::Text(text)) => Some(ProviderChunk::text(text.clone())),
            _ => None,
        },
        ConverseStreamOutput::Metadata(metadata) => metadata.usage().map(|usage| {
            ProviderChunk::usage(TokenUsage::with_total(
                token_count(usage.input_tokens()),
                token_count(usage.output_tokens()),
                token_count(usage.total_tokens()),
            ))
        }),
        ConverseStreamOutput::MessageStop(stop) => Some(ProviderChunk::finished(
            map_stop_reason(stop.stop_reason()),
        )),
        _ => None,
    }
}

pub fn map_stop_reason(reason: &StopReason) -> FinishReason {
    match reason {
        StopReason::MaxTokens => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

fn token_count(count: i32) -> u32 {
    u32::try_from(count).unwrap_or(0)
}
