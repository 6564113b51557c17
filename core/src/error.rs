//! Error types for the Root insurance client.
//!
//! # Design
//! Caller misuse is caught before any request is built and surfaces as
//! `InvalidArgument`. Remote failures are split by status code: 400 is an
//! input rejection, 401/403 an authentication failure, and everything else
//! non-200 lands in `Api` with the status and the server's message.

use thiserror::Error;

/// Errors returned by `RootClient` build, parse and execute methods.
#[derive(Debug, Error)]
pub enum RootError {
    /// A parameter was malformed or a required companion field was missing.
    /// Detected locally; no request was sent.
    #[error("{0}")]
    InvalidArgument(String),

    /// The server returned 400.
    #[error("input error: {0}")]
    Input(String),

    /// The server returned 401 or 403.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// The server returned any other non-200 status.
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be parsed as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// Reading an attachment source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RootError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RootError::InvalidArgument(message.into())
    }

    /// The server-supplied message for remote errors, `None` otherwise.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            RootError::Input(message)
            | RootError::Authentication(message)
            | RootError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}
