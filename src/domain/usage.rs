//! Token usage and timing metadata for a streamed reply

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why generation stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishReason {
    #[default]
    #[display("stop")]
    Stop,
    #[display("length")]
    Length,
    #[display("error")]
    Error,
}

/// Token counts for one request/response exchange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Usage with the total derived from prompt and completion counts
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Usage with a total reported by the provider
    pub fn with_total(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Latency of a streamed reply, measured from request dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingInfo {
    pub ms_to_first_chunk: f64,
    pub ms_to_finish: f64,
}

impl TimingInfo {
    pub fn new(to_first_chunk: Option<Duration>, to_finish: Duration) -> Self {
        Self {
            ms_to_first_chunk: to_first_chunk.map(as_millis_f64).unwrap_or_default(),
            ms_to_finish: as_millis_f64(to_finish),
        }
    }
}

fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
