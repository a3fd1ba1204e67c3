//! Error types for the client.
//!
//! Storage backends report [`StorageError`], which mirrors the usual
//! backend/encode/decode split of session stores. Everything else surfaces as
//! [`Error`], including HTTP failures carrying the server's `detail` message.

use reqwest::StatusCode;

/// Errors raised by a [`SessionStorage`](crate::store::SessionStorage) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying storage (database, preferences) failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A value could not be serialized before being written.
    #[error("failed to encode stored value: {0}")]
    Encode(String),

    /// A stored value could not be deserialized.
    #[error("failed to decode stored value: {0}")]
    Decode(String),
}

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The request never produced an HTTP response (connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("api error {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Api {
        status: StatusCode,
        detail: Option<String>,
    },

    /// A success response carried a body of the wrong shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server issued a token whose payload could not be decoded.
    #[error("received an undecodable session token")]
    InvalidToken,

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Message suitable for showing to the user who initiated the request.
    ///
    /// Returns the server-provided `detail` when there is one, otherwise
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
