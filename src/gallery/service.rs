//! Gallery service: the create/list/delete contract over a [`BlobStore`].
//!
//! The service is stateless. Every call goes to the store exactly once (or
//! twice for delete: lookup then removal) and nothing is cached between calls.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use super::naming::{decode_png_data_uri, doodle_name_now, is_doodle_name, validate_delete_name};
use crate::error::GalleryError;
use crate::notify::{doodle_payload, Notifier};
use crate::store::{BlobStore, ListQuery, ObjectMetadata, RemoteObject};

/// A doodle that was just stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDoodle {
    pub name: String,
    pub remote_id: String,
    pub view_link: String,
}

/// A doodle as shown in the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoodleImage {
    pub name: String,
    pub remote_id: String,
    pub view_link: String,
}

/// Doodles in a folder listing.
///
/// Yields only objects whose names follow the image naming convention. The
/// sequence is consumed as it is iterated and cannot be restarted; call
/// [`GalleryService::list`] again for a fresh view of the store.
pub struct Doodles {
    inner: std::vec::IntoIter<RemoteObject>,
}

impl Iterator for Doodles {
    type Item = DoodleImage;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .find(|obj| is_doodle_name(&obj.name))
            .map(|obj| DoodleImage {
                name: obj.name,
                remote_id: obj.id,
                view_link: obj.view_link,
            })
    }
}

/// Create, list and delete doodles in one folder of a remote store.
pub struct GalleryService<B: BlobStore> {
    store: B,
    folder_id: String,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<B: BlobStore> GalleryService<B> {
    /// Create a service over `store`, scoped to `folder_id`.
    pub fn new(store: B, folder_id: impl Into<String>) -> Self {
        Self {
            store,
            folder_id: folder_id.into(),
            notifier: None,
        }
    }

    /// Notify `notifier` about every new doodle.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The folder this service operates on.
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// The underlying store.
    pub fn store(&self) -> &B {
        &self.store
    }

    /// Store a new doodle from a PNG data URI.
    ///
    /// # Errors
    ///
    /// - `Validation` if `image_data` is absent, empty or not valid base64
    /// - `Upstream` if the store rejects the upload
    pub async fn create(&self, image_data: Option<&str>) -> Result<CreatedDoodle, GalleryError> {
        let image_data = image_data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| GalleryError::Validation("Missing imageData".to_string()))?;

        let content = decode_png_data_uri(image_data)?;
        let name = doodle_name_now();
        let metadata = ObjectMetadata::png_in_folder(&name, &self.folder_id);

        debug!(name = %name, bytes = content.len(), "Uploading doodle");

        let stored = self.store.create(metadata, Bytes::from(content)).await?;

        info!(name = %name, id = %stored.id, "Doodle uploaded");

        let created = CreatedDoodle {
            name,
            remote_id: stored.id,
            view_link: stored.view_link,
        };

        self.notify(&created).await;

        Ok(created)
    }

    /// List the doodles currently in the folder.
    pub async fn list(&self) -> Result<Doodles, GalleryError> {
        let objects = self.store.list(ListQuery::folder(&self.folder_id)).await?;
        debug!(objects = objects.len(), "Listed folder");
        Ok(Doodles {
            inner: objects.into_iter(),
        })
    }

    /// Delete the doodle named `name`.
    ///
    /// When several objects share the name, the oldest one is deleted.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is not a `.png` name or contains `..`
    /// - `NotFound` if no object in the folder has that name
    /// - `Upstream` if the lookup or the deletion fails
    pub async fn delete(&self, name: &str) -> Result<(), GalleryError> {
        validate_delete_name(name)?;

        let matches = self
            .store
            .list(ListQuery::named(&self.folder_id, name))
            .await?;

        // Listings are oldest first
        let target = matches
            .into_iter()
            .find(|obj| obj.name == name)
            .ok_or_else(|| GalleryError::NotFound {
                name: name.to_string(),
            })?;

        self.store.delete(&target.id).await?;

        info!(name = %name, id = %target.id, "Doodle deleted");
        Ok(())
    }

    async fn notify(&self, created: &CreatedDoodle) {
        let Some(ref notifier) = self.notifier else {
            return;
        };

        let payload = doodle_payload(&created.name, &created.view_link);
        if let Err(e) = notifier.send(notifier.template_id(), payload).await {
            warn!(name = %created.name, "Failed to send doodle notification: {}", e);
        }
    }
}
