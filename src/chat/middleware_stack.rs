//! Middleware stack builder for the chat router

use crate::chat::middleware::*;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Builder for composing the chat middleware stack
#[derive(Debug, Clone, Copy)]
pub struct ChatMiddlewareStack {
    body_limit: usize,
}

impl Default for ChatMiddlewareStack {
    fn default() -> Self {
        Self {
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ChatMiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Apply the complete middleware stack to a router
    ///
    /// Outer to inner:
    /// 1. Request ID generation/propagation
    /// 2. Logging (with request ID)
    /// 3. Error handling
    /// 4. Request body limit
    pub fn apply_to_router<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.body_limit))
            .layer(from_fn(error_handling_middleware))
            .layer(from_fn(logging_middleware))
            .layer(from_fn(request_id_middleware))
    }
}
