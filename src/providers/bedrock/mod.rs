//! AWS Bedrock provider implementation
//!
//! Uses the Bedrock Runtime `ConverseStream` operation through the AWS SDK.
//! The SDK owns request signing, credential resolution, connection pooling
//! and event-stream decoding; this module maps conversations in and stream
//! events out.
//!
//! ## Event mapping
//!
//! - `contentBlockDelta` with text → text chunk
//! - `metadata.usage` → usage chunk (input/output/total tokens)
//! - `messageStop` → finish reason (`max_tokens` → length, else stop)

pub mod client;
pub mod conversation;
pub mod provider;
pub mod streaming;
pub mod types;


pub use provider::BedrockProvider;
