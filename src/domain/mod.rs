//! Domain types for Chat Relay
//!
//! Conversations, inference parameters and the usage/timing metadata that
//! accompanies every streamed reply. Values are validated at construction so
//! the rest of the crate can rely on them.

pub mod llm;
pub mod message;
pub mod usage;

pub use llm::*;
pub use message::*;
pub use usage::*;
