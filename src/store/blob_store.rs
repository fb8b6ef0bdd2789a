use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Metadata sent alongside the object body on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Object name as it will appear in listings
    pub name: String,

    /// Folders the object belongs to
    pub parents: Vec<String>,

    /// Media type of the body
    pub mime_type: String,
}

impl ObjectMetadata {
    /// Metadata for a PNG placed in a single folder.
    pub fn png_in_folder(name: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: vec![folder_id.into()],
            mime_type: "image/png".to_string(),
        }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Store-assigned identifier
    pub id: String,

    /// Store-provided link for viewing the object
    pub view_link: String,
}

/// An object as returned by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub id: String,
    pub name: String,
    pub view_link: String,
}

/// Selection criteria for [`BlobStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Folder to list
    pub folder_id: String,

    /// Restrict the listing to objects with exactly this name
    pub name: Option<String>,
}

impl ListQuery {
    /// Every object in the folder.
    pub fn folder(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            name: None,
        }
    }

    /// Objects in the folder named exactly `name`.
    pub fn named(folder_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            name: Some(name.into()),
        }
    }
}

/// Trait for a remote store of named binary objects grouped in folders.
///
/// Implementations perform a single attempt per call. Retrying, caching and
/// ordering across concurrent calls are left to the caller (which does none
/// of them).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `body` with the given metadata.
    async fn create(
        &self,
        metadata: ObjectMetadata,
        body: Bytes,
    ) -> Result<StoredObject, StoreError>;

    /// List the objects matching `query`, oldest first.
    async fn list(&self, query: ListQuery) -> Result<Vec<RemoteObject>, StoreError>;

    /// Delete an object by its store identifier.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
