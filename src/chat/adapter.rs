//! Provider chunk stream to [`StreamFrame`] adapter
//!
//! One adapter runs per request. It forwards every non-empty text delta as
//! soon as it arrives, counts deltas as an approximate completion-token
//! count, and lets provider-reported usage replace that count. When the
//! upstream stream ends it emits exactly one finish event followed by one
//! usage annotation. When the upstream stream fails it forwards the failure
//! and emits nothing else.
//!
//! Timing uses [`tokio::time::Instant`], measured from the dispatch instant
//! handed to [`StreamAdapter::new`].

use crate::chat::frames::StreamFrame;
use crate::domain::{FinishReason, ModelName, TimingInfo, TokenUsage};
use crate::providers::{ChunkStream, ProviderChunk, ProviderError, ProviderId};
use futures_util::{Stream, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Per-request bookkeeping for one streamed reply
#[derive(Debug)]
pub struct StreamAdapter {
    provider: ProviderId,
    model: ModelName,
    dispatched_at: Instant,
    first_token_at: Option<Instant>,
    delta_count: u32,
    reported_usage: Option<TokenUsage>,
    finish_reason: Option<FinishReason>,
}

impl StreamAdapter {
    pub fn new(provider: ProviderId, model: ModelName, dispatched_at: Instant) -> Self {
        Self {
            provider,
            model,
            dispatched_at,
            first_token_at: None,
            delta_count: 0,
            reported_usage: None,
            finish_reason: None,
        }
    }

    /// Fold one chunk into the running state
    ///
    /// Returns the text delta frame to forward, if the chunk carried text.
    pub fn observe(&mut self, chunk: ProviderChunk) -> Option<StreamFrame> {
        if let Some(usage) = chunk.usage {
            self.reported_usage = Some(usage);
        }
        if let Some(reason) = chunk.finish_reason {
            self.finish_reason = Some(reason);
        }

        let text = chunk.text.filter(|text| !text.is_empty())?;

        if self.first_token_at.is_none() {
            let now = Instant::now();
            self.first_token_at = Some(now);
            debug!(
                provider = %self.provider,
                model = %self.model,
                ms_to_first_chunk = now.duration_since(self.dispatched_at).as_millis(),
                "First token received"
            );
        }
        self.delta_count = self.delta_count.saturating_add(1);

        Some(StreamFrame::text(text))
    }

    /// Usage as it stands: the last provider report, else the local count
    pub fn usage(&self) -> TokenUsage {
        self.reported_usage
            .unwrap_or_else(|| TokenUsage::new(0, self.delta_count))
    }

    pub fn delta_count(&self) -> u32 {
        self.delta_count
    }

    /// Close the reply with its finish event and usage annotation
    pub fn finish(self) -> [StreamFrame; 2] {
        let finished_at = Instant::now();
        let usage = self.usage();
        let finish_reason = self.finish_reason.unwrap_or_default();
        let timing = TimingInfo::new(
            self.first_token_at
                .map(|at| at.duration_since(self.dispatched_at)),
            finished_at.duration_since(self.dispatched_at),
        );

        info!(
            provider = %self.provider,
            model = %self.model,
            finish_reason = %finish_reason,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            ms_to_first_chunk = timing.ms_to_first_chunk,
            ms_to_finish = timing.ms_to_finish,
            "Stream finished"
        );

        [
            StreamFrame::FinishEvent {
                finish_reason,
                usage,
            },
            StreamFrame::UsageAnnotation { usage, timing },
        ]
    }

    /// Drive the upstream stream to completion, yielding frames in order
    ///
    /// Dropping the returned stream drops the upstream stream with it.
    pub fn adapt(
        self,
        upstream: ChunkStream,
    ) -> impl Stream<Item = Result<StreamFrame, ProviderError>> + Send + 'static {
        let mut adapter = self;
        let mut upstream = upstream;

        async_stream::stream! {
            while let Some(item) = upstream.next().await {
                match item {
                    Ok(chunk) => {
                        if let Some(frame) = adapter.observe(chunk) {
                            yield Ok(frame);
                        }
                    }
                    Err(e) => {
                        warn!(
                            provider = %adapter.provider,
                            model = %adapter.model,
                            deltas = adapter.delta_count,
                            error = %e,
                            "Upstream stream failed"
                        );
                        yield Err(e);
                        return;
                    }
                }
            }

            for frame in adapter.finish() {
                yield Ok(frame);
            }
        }
    }
}
