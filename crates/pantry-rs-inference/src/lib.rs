//! Recipe inference against a hosted chat-completion endpoint.

pub mod chat;
pub mod client;
pub mod error;
pub mod prompt;

/// reqwest-backed chat-completion client.
pub use chat::ChatCompletionClient;
/// Inference client interface and display mapping.
pub use client::{FETCH_ERROR_TEXT, InferenceClient, NO_RECIPE_TEXT, display_text};
/// Inference error type.
pub use error::InferenceError;
