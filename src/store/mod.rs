//! Remote blob store layer.
//!
//! The gallery never touches storage directly: every create, list and delete
//! goes through the [`BlobStore`] trait. The shipped backend is Google Drive
//! ([`DriveStore`]); tests use an in-memory implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             GalleryService              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            BlobStore Trait              │
//! │   create / list / delete by store id    │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              DriveStore                 │
//! │   Drive v3 REST + OAuth2 token cache    │
//! └─────────────────────────────────────────┘
//! ```

mod blob_store;
mod drive;
mod oauth;

pub use blob_store::{BlobStore, ListQuery, ObjectMetadata, RemoteObject, StoredObject};
pub use drive::{
    build_list_query, build_multipart_body, escape_query_value, DriveEndpoints, DriveStore,
    DEFAULT_API_BASE, DEFAULT_UPLOAD_BASE,
};
pub use oauth::{OAuthCredentials, TokenProvider, DEFAULT_TOKEN_URL};
