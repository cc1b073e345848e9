//! Application wiring: provider construction, router assembly and serving
//!
//! Providers are built once at startup from [`Settings`](crate::config::Settings)
//! and handed to the chat service; nothing is initialized lazily or globally.

pub mod app;

pub use app::Application;
