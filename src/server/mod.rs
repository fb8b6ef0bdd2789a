//! HTTP server layer for the doodle gallery.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST /submit   DELETE /delete/{filename}   GET /         │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    pages    │  │        routes           │  │
//! │  │ (requests)  │  │   (HTML)    │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod extract;
pub mod handlers;
pub mod pages;
pub mod routes;

pub use extract::JsonPayload;
pub use handlers::{
    delete_handler, draw_handler, gallery_handler, health_handler, status_for, submit_handler,
    test_handler, AppState, ErrorResponse, HealthResponse, JsonError, SubmitRequest,
    SubmitResponse, TextError,
};
pub use pages::{html_escape, render_draw_page, render_gallery, EMPTY_GALLERY_PLACEHOLDER};
pub use routes::{create_router, RouterConfig, DEFAULT_BODY_LIMIT};
