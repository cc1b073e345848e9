//! Conversation and inference parameter mapping for the Converse API

use crate::domain::{ChatMessage, Conversation, InferenceConfig, Role};
use crate::providers::ProviderError;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};

/// User and assistant turns as Converse messages, in order
///
/// System messages are not turns in the Converse API; see [`system_blocks`].
pub fn converse_messages(conversation: &Conversation) -> Result<Vec<Message>, ProviderError> {
    conversation.turns().map(converse_message).collect()
}

fn converse_message(message: &ChatMessage) -> Result<Message, ProviderError> {
    let role = match message.role {
        Role::Assistant => ConversationRole::Assistant,
        Role::User | Role::System => ConversationRole::User,
    };

    Message::builder()
        .role(role)
        .content(ContentBlock::Text(message.text().to_string()))
        .build()
        .map_err(|e| ProviderError::InvalidRequest(format!("invalid Bedrock message: {e}")))
}

/// System messages as Converse system prompt blocks, in order
pub fn system_blocks(conversation: &Conversation) -> Vec<SystemContentBlock> {
    conversation
        .system_prompts()
        .map(|m| SystemContentBlock::Text(m.text().to_string()))
        .collect()
}

pub fn inference_configuration(config: &InferenceConfig) -> InferenceConfiguration {
    InferenceConfiguration::builder()
        .max_tokens(i32::try_from(config.max_tokens.into_inner()).unwrap_or(i32::MAX))
        .temperature(config.temperature.into_inner())
        .top_p(config.top_p.into_inner())
        .build()
}
