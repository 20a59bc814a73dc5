//! Error types for the Snaptic API client.

use thiserror::Error;

/// Errors that can occur when interacting with the Snaptic API.
///
/// Every variant exposes the same `{message, status, response_body}` view
/// through [`message`](Self::message), [`status`](Self::status) and
/// [`response_body`](Self::response_body). Status and body are only present
/// for [`SnapticError::Api`].
#[derive(Debug, Error)]
pub enum SnapticError {
    /// Local validation failure: no usable credential mode, a note without an
    /// id passed to `edit_note`, an unreadable upload file, or no cached user.
    #[error("configuration error: {0}")]
    Config(String),

    /// The server answered with an HTTP status other than 200.
    #[error("API error (HTTP {status}): {}", String::from_utf8_lossy(.body))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for caller inspection.
        body: Vec<u8>,
    },

    /// The response was valid JSON but lacked a required key.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SnapticError {
    /// Human-readable description of the failure.
    pub fn message(&self) -> String {
        match self {
            Self::Api { status, .. } => format!("HTTP error {status}"),
            Self::Config(msg) | Self::MalformedResponse(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of the failed response, if the failure came from the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of the failed response, if the failure came from the server.
    pub fn response_body(&self) -> Option<&[u8]> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Convenience alias for `Result<T, SnapticError>`.
pub type Result<T> = std::result::Result<T, SnapticError>;
