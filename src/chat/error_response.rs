//! Unified error response handling for the chat service
//!
//! Every error produced before a stream starts is returned as the same JSON
//! shape, carrying the request ID for correlation. Provider error text is
//! masked unless the [`ErrorExposure`] policy allows it.

use crate::chat::headers::X_REQUEST_ID;
use crate::chat::types::{ChatError, ErrorExposure};
use crate::providers::ProviderError;
use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Standard error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Unique error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Request ID for correlation
    pub request_id: Option<String>,
    /// Additional error details (only when details are exposed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            request_id: None,
            details: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convert to HTTP response with proper headers
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        let request_id = self.request_id.clone();
        let mut response = (status, Json(self)).into_response();

        if let Some(id) = request_id {
            if let Ok(header_value) = HeaderValue::from_str(&id) {
                response.headers_mut().insert(X_REQUEST_ID, header_value);
            }
        }

        response
    }
}

/// Extension trait for consistent error formatting
pub trait ErrorResponseExt {
    /// Convert to standardized error response under the given policy
    fn to_error_response(&self, exposure: ErrorExposure) -> ErrorResponse;

    /// Get the appropriate HTTP status code
    fn status_code(&self) -> StatusCode;
}

impl ErrorResponseExt for ChatError {
    fn to_error_response(&self, exposure: ErrorExposure) -> ErrorResponse {
        match self {
            ChatError::BadRequest(msg) => {
                ErrorResponse::new("BAD_REQUEST", format!("Invalid chat request: {msg}"))
            }
            ChatError::Configuration(msg) => ErrorResponse::new("CONFIGURATION_ERROR", msg.clone()),
            ChatError::Provider(e) => {
                let response = ErrorResponse::new(provider_error_code(e), exposure.client_message(e));
                if exposure.expose_details {
                    response.with_details(serde_json::json!({ "provider_error": e.to_string() }))
                } else {
                    response
                }
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ChatError::BadRequest(_) | ChatError::Configuration(_) => StatusCode::BAD_REQUEST,
            ChatError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

fn provider_error_code(error: &ProviderError) -> &'static str {
    match error {
        ProviderError::Configuration(_) => "CONFIGURATION_ERROR",
        ProviderError::NotFound(_) => "PROVIDER_MODEL_NOT_FOUND",
        ProviderError::InvalidRequest(_) => "PROVIDER_REJECTED_REQUEST",
        ProviderError::Authentication(_) => "PROVIDER_AUTHENTICATION_ERROR",
        ProviderError::RequestFailed(_) => "PROVIDER_UNAVAILABLE",
        ProviderError::Stream(_) | ProviderError::InvalidResponse(_) => "PROVIDER_STREAM_ERROR",
    }
}

impl ChatError {
    /// Render under `exposure`, tagging the body with the request ID if known
    pub fn into_response_with(self, exposure: ErrorExposure, headers: &HeaderMap) -> Response {
        let status = self.status_code();
        let mut error = self.to_error_response(exposure);
        if let Some(id) = extract_request_id(headers) {
            error = error.with_request_id(id);
        }
        error.into_response_with_status(status)
    }
}

/// Error conversion for Axum responses, with provider details masked
impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        self.to_error_response(ErrorExposure::masked())
            .into_response_with_status(status)
    }
}

/// Helper to extract request ID from headers
pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}
