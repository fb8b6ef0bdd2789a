//! Router configuration for the doodle gallery.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request body limits and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /                    - Gallery page
//! /draw                - Drawing page
//! /submit              - Store a doodle (POST)
//! /delete/{filename}   - Delete a doodle (DELETE)
//! /test                - Liveness text
//! /health              - Health check
//! ```
//!
//! # Example
//!
//! ```ignore
//! use doodle_gallery::gallery::GalleryService;
//! use doodle_gallery::server::{create_router, RouterConfig};
//!
//! let gallery = GalleryService::new(store, "folder-id");
//! let router = create_router(gallery, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_handler, draw_handler, gallery_handler, health_handler, submit_handler, test_handler,
    AppState,
};
use crate::gallery::GalleryService;
use crate::store::BlobStore;

/// Default maximum request body size (10 MB), enough for a canvas PNG data URI.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Maximum request body size in bytes
    pub body_limit: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    /// By default:
    /// - CORS allows any origin
    /// - Body limit is 10 MB
    /// - Tracing is enabled
    fn default() -> Self {
        Self {
            cors_origins: None,
            body_limit: DEFAULT_BODY_LIMIT,
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the maximum request body size in bytes.
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// # Arguments
///
/// * `gallery` - The gallery service backing the doodle endpoints
/// * `config` - Router configuration
pub fn create_router<B>(gallery: GalleryService<B>, config: RouterConfig) -> Router
where
    B: BlobStore + 'static,
{
    let app_state = AppState::new(gallery);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/", get(gallery_handler::<B>))
        .route("/draw", get(draw_handler))
        .route("/submit", post(submit_handler::<B>))
        .route("/delete/{filename}", delete(delete_handler::<B>))
        .route("/test", get(test_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
