//! HTTP header and path constants for the chat service

use ::http::header;

/// Header name for request ID used for tracing and correlation
pub const X_REQUEST_ID: &str = "x-request-id";

/// Marks a response body as a line-delimited data stream
pub const X_VERCEL_AI_DATA_STREAM: &str = "x-vercel-ai-data-stream";

/// Data stream protocol version announced in [`X_VERCEL_AI_DATA_STREAM`]
pub const DATA_STREAM_VERSION: &str = "v1";

/// Standard header re-exports for convenience
pub use header::{CACHE_CONTROL, CONTENT_TYPE};

/// Well-known paths
pub mod paths {
    /// Chat page
    pub const INDEX: &str = "/";

    /// Health check endpoint path
    pub const HEALTH: &str = "/health";

    /// Streaming chat endpoint
    pub const CHAT: &str = "/api/chat";
}

/// Common content types (re-exported from centralized constants)
pub mod content_types {
    pub use crate::providers::constants::http::content_types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_constants() {
        assert!(X_REQUEST_ID.starts_with("x-"));
        assert!(X_VERCEL_AI_DATA_STREAM.starts_with("x-"));
        assert_eq!(X_VERCEL_AI_DATA_STREAM, X_VERCEL_AI_DATA_STREAM.to_lowercase());

        assert!(paths::INDEX.starts_with('/'));
        assert!(paths::HEALTH.starts_with('/'));
        assert!(paths::CHAT.starts_with('/'));
    }
}
