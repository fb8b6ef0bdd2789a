use thiserror::Error;

/// Errors that can occur when talking to the remote blob store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The request never produced a response (DNS, connect, TLS, ...)
    #[error("Request error: {0}")]
    Request(String),

    /// The store answered with a non-success status
    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The store answered with a body we could not understand
    #[error("Invalid store response: {0}")]
    Decode(String),

    /// No usable credentials, or the token exchange failed
    #[error("Authentication error: {0}")]
    Auth(String),
}

/// Errors from the notification channel
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// The request never produced a response
    #[error("Request error: {0}")]
    Request(String),

    /// The email service rejected the message
    #[error("Email service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors surfaced by the gallery operations.
///
/// Each variant maps to exactly one HTTP status class at the handler boundary.
#[derive(Debug, Clone, Error)]
pub enum GalleryError {
    /// Bad or missing client input (HTTP 400)
    #[error("{0}")]
    Validation(String),

    /// The named doodle does not exist in the folder (HTTP 404)
    #[error("Doodle not found: {name}")]
    NotFound { name: String },

    /// The remote store failed (HTTP 500)
    #[error("Upstream error: {0}")]
    Upstream(#[from] StoreError),
}

impl GalleryError {
    /// Short machine-readable identifier used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            GalleryError::Validation(_) => "invalid_request",
            GalleryError::NotFound { .. } => "not_found",
            GalleryError::Upstream(_) => "upstream_error",
        }
    }
}
