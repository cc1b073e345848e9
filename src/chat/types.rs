//! Type definitions for the chat module

use crate::domain::Conversation;
use crate::providers::constants::error_messages::GENERIC_ERROR;
use crate::providers::{ProviderError, ProviderSelection};
use serde::Deserialize;
use thiserror::Error;

/// Body of `POST /api/chat`
///
/// Unknown fields are ignored; browser clients send extra bookkeeping.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequestBody {
    pub messages: Conversation,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ChatRequestBody {
    /// Parse and validate a raw request body
    pub fn from_slice(body: &[u8]) -> ChatResult<Self> {
        serde_json::from_slice(body).map_err(|e| ChatError::BadRequest(e.to_string()))
    }

    /// Requested provider, `Default` when the field is absent
    pub fn provider_selection(&self) -> ChatResult<ProviderSelection> {
        match self.provider.as_deref() {
            Some(name) => Ok(name.parse::<ProviderSelection>()?),
            None => Ok(ProviderSelection::Default),
        }
    }
}

/// Whether upstream error text reaches clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorExposure {
    pub expose_details: bool,
}

impl ErrorExposure {
    pub fn masked() -> Self {
        Self::default()
    }

    pub fn exposed() -> Self {
        Self {
            expose_details: true,
        }
    }

    /// Message shown to the client for a provider failure
    pub fn client_message(&self, error: &ProviderError) -> String {
        if self.expose_details {
            error.to_string()
        } else {
            GENERIC_ERROR.to_string()
        }
    }
}

/// Errors surfaced by the chat endpoint before streaming starts
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {0}")]
    Provider(ProviderError),
}

impl From<ProviderError> for ChatError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Configuration(message) => Self::Configuration(message),
            other => Self::Provider(other),
        }
    }
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;
