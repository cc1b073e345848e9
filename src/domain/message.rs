//! Chat messages and conversations

use derive_more::Display;
use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display("user")]
    User,
    #[display("assistant")]
    Assistant,
    #[display("system")]
    System,
}

/// Text content of a single message
#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct MessageContent(String);

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn new(role: Role, content: MessageContent) -> Self {
        Self { role, content }
    }

    pub fn user(content: impl Into<String>) -> Result<Self, MessageContentError> {
        Ok(Self::new(Role::User, MessageContent::try_new(content.into())?))
    }

    pub fn assistant(content: impl Into<String>) -> Result<Self, MessageContentError> {
        Ok(Self::new(
            Role::Assistant,
            MessageContent::try_new(content.into())?,
        ))
    }

    pub fn system(content: impl Into<String>) -> Result<Self, MessageContentError> {
        Ok(Self::new(Role::System, MessageContent::try_new(content.into())?))
    }

    pub fn text(&self) -> &str {
        self.content.as_ref()
    }
}

/// Chronologically ordered, non-empty list of messages
#[nutype(
    validate(predicate = |messages| !messages.is_empty()),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef)
)]
pub struct Conversation(Vec<ChatMessage>);

impl Conversation {
    pub fn messages(&self) -> &[ChatMessage] {
        self.as_ref()
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }

    /// Messages with the system role, in order
    pub fn system_prompts(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages().iter().filter(|m| m.role == Role::System)
    }

    /// User and assistant turns, in order
    pub fn turns(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages().iter().filter(|m| m.role != Role::System)
    }
}
