//! HTTP request handlers for the doodle gallery.
//!
//! This module contains the Axum handlers for submitting, listing and
//! deleting doodles, plus liveness endpoints.
//!
//! # Endpoints
//!
//! - `POST /submit` - Store a new doodle
//! - `DELETE /delete/{filename}` - Delete a doodle by name
//! - `GET /` - Gallery page
//! - `GET /draw` - Drawing page
//! - `GET /test` - Liveness text
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::GalleryError;
use crate::gallery::GalleryService;
use crate::store::BlobStore;

use super::extract::JsonPayload;
use super::pages::{render_draw_page, render_gallery};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the gallery service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<B: BlobStore> {
    /// The gallery service backing every doodle endpoint
    pub gallery: Arc<GalleryService<B>>,
}

impl<B: BlobStore> AppState<B> {
    /// Create a new application state with the given gallery service.
    pub fn new(gallery: GalleryService<B>) -> Self {
        Self {
            gallery: Arc::new(gallery),
        }
    }
}

impl<B: BlobStore> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            gallery: Arc::clone(&self.gallery),
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /submit`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    /// PNG data URI from the drawing canvas
    #[serde(rename = "imageData", default)]
    pub image_data: Option<String>,
}

/// Successful `POST /submit` response.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,

    /// Store-provided link to the uploaded doodle
    #[serde(rename = "driveLink")]
    pub drive_link: String,
}

/// JSON error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "invalid_request")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// HTTP status for a gallery error.
pub fn status_for(error: &GalleryError) -> StatusCode {
    match error {
        GalleryError::Validation(_) => StatusCode::BAD_REQUEST,
        GalleryError::NotFound { .. } => StatusCode::NOT_FOUND,
        GalleryError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log an error at a level matching its severity:
/// - 5xx at ERROR
/// - 404 at DEBUG (common and expected)
/// - other 4xx at WARN
fn log_error(status: StatusCode, error: &GalleryError, operation: &str) {
    if status.is_server_error() {
        error!(
            error_type = error.kind(),
            status = status.as_u16(),
            operation = operation,
            "Server error: {}",
            error
        );
    } else if status == StatusCode::NOT_FOUND {
        debug!(
            error_type = error.kind(),
            status = status.as_u16(),
            operation = operation,
            "Resource not found: {}",
            error
        );
    } else {
        warn!(
            error_type = error.kind(),
            status = status.as_u16(),
            operation = operation,
            "Client error: {}",
            error
        );
    }
}

/// Gallery error rendered as a JSON [`ErrorResponse`].
///
/// Like [`TextError`], upstream failures get a fixed per-endpoint message.
#[derive(Debug)]
pub struct JsonError {
    pub error: GalleryError,
    pub operation: &'static str,
    pub upstream_message: &'static str,
}

impl JsonError {
    pub(crate) fn submit(error: GalleryError) -> Self {
        Self {
            error,
            operation: "submit",
            upstream_message: "Failed to upload doodle",
        }
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);
        log_error(status, &self.error, self.operation);

        let message = match &self.error {
            GalleryError::Upstream(_) => self.upstream_message.to_string(),
            other => other.to_string(),
        };

        let error_response = ErrorResponse::with_status(self.error.kind(), message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Gallery error rendered as a plain-text body.
///
/// Upstream failures are reported with a fixed per-endpoint message so store
/// internals are never echoed to the client.
#[derive(Debug)]
pub struct TextError {
    pub error: GalleryError,
    pub operation: &'static str,
    pub upstream_message: &'static str,
}

impl TextError {
    fn delete(error: GalleryError) -> Self {
        Self {
            error,
            operation: "delete",
            upstream_message: "Failed to delete doodle",
        }
    }

    fn gallery(error: GalleryError) -> Self {
        Self {
            error,
            operation: "gallery",
            upstream_message: "Failed to fetch doodles",
        }
    }
}

impl IntoResponse for TextError {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);
        log_error(status, &self.error, self.operation);

        let body = match &self.error {
            GalleryError::Validation(message) => message.clone(),
            GalleryError::NotFound { .. } => "File not found".to_string(),
            GalleryError::Upstream(_) => self.upstream_message.to_string(),
        };

        (status, body).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle doodle submissions.
///
/// # Endpoint
///
/// `POST /submit`
///
/// # Request
///
/// ```json
/// { "imageData": "data:image/png;base64,..." }
/// ```
///
/// # Response
///
/// - `200 OK`: `{ "message": "...", "driveLink": "https://..." }`
/// - `400 Bad Request`: `imageData` missing or not valid base64, or the body
///   is malformed JSON. A request without a JSON content type counts as
///   missing `imageData`.
/// - `500 Internal Server Error`: Upload to the store failed
pub async fn submit_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
    JsonPayload(request): JsonPayload<SubmitRequest>,
) -> Result<Json<SubmitResponse>, JsonError> {
    let created = state
        .gallery
        .create(request.image_data.as_deref())
        .await
        .map_err(JsonError::submit)?;

    Ok(Json(SubmitResponse {
        message: "Saved and uploaded successfully!".to_string(),
        drive_link: created.view_link,
    }))
}

/// Handle doodle deletion.
///
/// # Endpoint
///
/// `DELETE /delete/{filename}`
///
/// # Response
///
/// - `200 OK`: Plain-text confirmation
/// - `400 Bad Request`: Name does not end in `.png` or contains `..`
/// - `404 Not Found`: No doodle with that name
/// - `500 Internal Server Error`: Store lookup or deletion failed
pub async fn delete_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
    Path(filename): Path<String>,
) -> Result<&'static str, TextError> {
    state
        .gallery
        .delete(&filename)
        .await
        .map_err(TextError::delete)?;

    Ok("Deleted successfully!")
}

/// Handle gallery page requests.
///
/// # Endpoint
///
/// `GET /`
///
/// # Response
///
/// - `200 OK`: HTML page with one card per doodle
/// - `500 Internal Server Error`: Store listing failed
pub async fn gallery_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
) -> Result<Html<String>, TextError> {
    debug!("Handling gallery request");
    let doodles = state.gallery.list().await.map_err(TextError::gallery)?;
    Ok(Html(render_gallery(doodles)))
}

/// Serve the drawing page.
pub async fn draw_handler() -> Html<String> {
    Html(render_draw_page())
}

/// Liveness probe.
pub async fn test_handler() -> &'static str {
    "Server is alive!"
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
