//! Doodle gallery operations.
//!
//! - [`GalleryService`] - create/list/delete over a [`BlobStore`](crate::store::BlobStore)
//! - naming helpers - data-URI decoding, timestamp names, deletion-name checks

mod naming;
mod service;

pub use naming::{
    decode_png_data_uri, doodle_name, doodle_name_now, is_doodle_name, validate_delete_name,
    IMAGE_EXTENSION, PNG_DATA_URI_PREFIX,
};
pub use service::{CreatedDoodle, DoodleImage, Doodles, GalleryService};
