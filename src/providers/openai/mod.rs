//! OpenAI-compatible chat completions provider
//!
//! Talks to any endpoint implementing `POST {api_base}/chat/completions`
//! with server-sent-event streaming. Usage is requested through
//! `stream_options.include_usage`, so it arrives as a final chunk with an
//! empty `choices` array.

pub mod provider;
pub mod streaming;
pub mod types;

pub use provider::OpenAiProvider;
