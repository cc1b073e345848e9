//! Chat service: router, shared state and lifecycle
//!
//! ## Service Lifecycle
//!
//! ```rust,ignore
//! use chat_relay::chat::{ChatService, ErrorExposure};
//! use chat_relay::providers::{ModelSelector, ProviderId};
//!
//! // 1. Register providers once at startup
//! let mut selector = ModelSelector::new(ProviderId::OpenAi);
//! selector.register(openai_provider);
//!
//! // 2. Build the router
//! let router = ChatService::new(selector, inference, ErrorExposure::masked()).into_router();
//!
//! // 3. Serve with Axum
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use crate::chat::handler::{chat_handler, health_handler, index_handler};
use crate::chat::headers::paths;
use crate::chat::middleware_stack::ChatMiddlewareStack;
use crate::chat::types::ErrorExposure;
use crate::domain::InferenceConfig;
use crate::providers::ModelSelector;
use axum::routing::{get, post};
use std::sync::Arc;

/// Shared, read-only state behind every chat request
pub struct ChatService {
    selector: ModelSelector,
    inference: InferenceConfig,
    exposure: ErrorExposure,
    middleware: ChatMiddlewareStack,
}

impl ChatService {
    pub fn new(selector: ModelSelector, inference: InferenceConfig, exposure: ErrorExposure) -> Self {
        Self {
            selector,
            inference,
            exposure,
            middleware: ChatMiddlewareStack::new(),
        }
    }

    /// Replace the default middleware stack
    pub fn with_middleware(mut self, middleware: ChatMiddlewareStack) -> Self {
        self.middleware = middleware;
        self
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn inference(&self) -> InferenceConfig {
        self.inference
    }

    pub fn exposure(&self) -> ErrorExposure {
        self.exposure
    }

    /// Create an Axum router for the chat service with middleware
    pub fn into_router(self) -> axum::Router {
        let middleware = self.middleware;

        let router = axum::Router::new()
            .route(paths::INDEX, get(index_handler))
            .route(paths::HEALTH, get(health_handler))
            .route(paths::CHAT, post(chat_handler))
            .with_state(Arc::new(self));

        middleware.apply_to_router(router)
    }
}
