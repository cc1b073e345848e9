//! Chat Relay - a streaming chat relay for LLM providers
//!
//! Forwards a conversation to one of several model providers (an
//! OpenAI-compatible API or AWS Bedrock) and streams the reply back to the
//! browser as a line-delimited data stream, closing with a finish event and
//! a token-usage/timing annotation.

pub mod application;
pub mod chat;
pub mod config;
pub mod domain;
pub mod error;
pub mod providers;

pub use application::Application;
pub use error::{Error, Result};
