//! Constants for provider interactions
//!
//! Provider names, model-name prefixes, endpoint paths and default values
//! shared by the provider implementations and the model selector.

/// Names accepted in the `provider` request field and in configuration
pub mod provider_names {
    pub const OPENAI: &str = "openai";
    pub const BEDROCK: &str = "bedrock";
    /// Selects whichever provider is configured as the default
    pub const DEFAULT: &str = "default";
}

/// Model-name prefixes that identify a provider when a request names a
/// model without naming a provider
pub mod model_prefixes {
    use crate::providers::ProviderId;

    pub const TABLE: &[(&str, ProviderId)] = &[
        ("gpt-", ProviderId::OpenAi),
        ("chatgpt-", ProviderId::OpenAi),
        ("o1", ProviderId::OpenAi),
        ("o3", ProviderId::OpenAi),
        ("anthropic.", ProviderId::Bedrock),
        ("amazon.", ProviderId::Bedrock),
        ("meta.", ProviderId::Bedrock),
        ("mistral.", ProviderId::Bedrock),
        ("cohere.", ProviderId::Bedrock),
        ("ai21.", ProviderId::Bedrock),
        ("us.", ProviderId::Bedrock),
        ("eu.", ProviderId::Bedrock),
        ("apac.", ProviderId::Bedrock),
    ];
}

/// OpenAI-compatible chat completions API
pub mod openai {
    pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
    /// Sentinel data payload closing an SSE stream
    pub const DONE_SENTINEL: &str = "[DONE]";
    pub const FINISH_STOP: &str = "stop";
    pub const FINISH_LENGTH: &str = "length";
}

/// HTTP-related constants
pub mod http {
    /// Content type constants
    pub mod content_types {
        pub const APPLICATION_JSON: &str = "application/json";
        pub const TEXT_EVENT_STREAM: &str = "text/event-stream";
        pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
    }
}

/// Error message constants
pub mod error_messages {
    /// Shown to clients when upstream error details are masked
    pub const GENERIC_ERROR: &str = "An error occurred.";
    pub const MISSING_API_KEY: &str = "No API key configured for the OpenAI-compatible provider";
}
