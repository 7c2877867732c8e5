//! A chat widget controller backed by the Gemini API.
//!
//! [`ChatWidget`] keeps the transcript and the pending guard for one
//! conversation with an external [`ConversationService`].
//! [`GeminiService`] is the production service; the `axis-chat` binary
//! drives a widget from the terminal.

// Public modules
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod observability;
pub mod persona;
pub mod render;
pub mod service;
pub mod types;
pub mod widget;

// Re-exports
pub use client::Gemini;
pub use commands::{WidgetCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use persona::Persona;
pub use render::{PlainTextRenderer, Renderer};
pub use service::{ConversationService, GeminiService, GeminiSession};
pub use types::*;
pub use widget::{ChatWidget, Completion, Exchange, WidgetConfig, WidgetStats};
