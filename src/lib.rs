//! # Doodle Gallery
//!
//! A tiny server for sharing doodles. Drawings are stored as PNG files in a
//! single Google Drive folder; the server uploads, lists and deletes them and
//! renders the folder as an HTML gallery.
//!
//! The server holds no state of its own. The remote folder is the only source
//! of truth and every request re-queries it.
//!
//! ## Architecture
//!
//! - [`store`] - Blob store trait and the Google Drive backend
//! - [`gallery`] - Create/list/delete contract over a store
//! - [`notify`] - Optional new-doodle email notifications
//! - [`server`] - Axum-based HTTP server, routes and HTML pages
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use doodle_gallery::{create_router, DriveStore, GalleryService, OAuthCredentials, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let credentials = OAuthCredentials {
//!         access_token: Some("ya29...".to_string()),
//!         ..OAuthCredentials::default()
//!     };
//!     let store = DriveStore::new(credentials).unwrap();
//!     let gallery = GalleryService::new(store, "drive-folder-id");
//!     let router = create_router(gallery, RouterConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod gallery;
pub mod notify;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{CheckConfig, Cli, Command, ServeConfig, StoreArgs};
pub use error::{GalleryError, NotifyError, StoreError};
pub use gallery::{CreatedDoodle, DoodleImage, Doodles, GalleryService};
pub use notify::{EmailJsConfig, EmailJsNotifier, Notifier};
pub use server::{create_router, render_gallery, AppState, RouterConfig};
pub use store::{
    BlobStore, DriveEndpoints, DriveStore, ListQuery, OAuthCredentials, ObjectMetadata,
    RemoteObject, StoredObject,
};
