//! Error types for recipe inference.

/// Errors returned by inference clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// The endpoint answered without usable recipe text.
    #[error("no recipe content in response")]
    NoContent,
    /// The request could not be sent or the response body could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The endpoint answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response body was not a chat-completion document.
    #[error("decode error: {0}")]
    Decode(String),
    /// The HTTP client could not be constructed.
    #[error("client error: {0}")]
    Client(String),
}
