use crate::providers::ProviderError;
use thiserror::Error;

/// Chat Relay application error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: String, reason: String },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_setting(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidSetting {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_setting_message_names_field() {
        let error = Error::invalid_setting("inference.temperature", "must be at most 2");
        assert_eq!(
            error.to_string(),
            "Invalid setting inference.temperature: must be at most 2"
        );
    }

    #[test]
    fn test_provider_error_converts() {
        let error: Error = ProviderError::Configuration("no bedrock".to_string()).into();
        assert!(matches!(error, Error::Provider(_)));
    }
}
