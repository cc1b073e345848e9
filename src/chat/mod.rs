//! Chat module: the HTTP surface of the relay
//!
//! A request names a conversation and optionally a provider and model. The
//! handler resolves the provider through the [`ModelSelector`], hands the
//! provider's chunk stream to a per-request [`StreamAdapter`], and streams
//! the resulting frames back in the line-delimited data stream format of
//! [`frames`].
//!
//! [`ModelSelector`]: crate::providers::ModelSelector

pub mod adapter;
pub mod error_response;
pub mod frames;
pub mod handler;
pub mod headers;
pub mod middleware;
pub mod middleware_stack;
pub mod service;
pub mod transcript;
pub mod types;

#[cfg(test)]
pub mod test_utils;




pub use adapter::StreamAdapter;
pub use frames::{StreamFrame, WirePart};
pub use service::ChatService;
pub use transcript::AssistantMessage;
pub use types::{ChatError, ChatRequestBody, ChatResult, ErrorExposure};
