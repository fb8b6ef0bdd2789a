use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::GalleryError;

/// Prefix of a PNG data URI as produced by `canvas.toDataURL("image/png")`.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Extension every doodle name carries.
pub const IMAGE_EXTENSION: &str = ".png";

/// Decode a PNG data URI into raw bytes.
///
/// A payload without the data-URI prefix is decoded as plain base64.
pub fn decode_png_data_uri(data: &str) -> Result<Vec<u8>, GalleryError> {
    let encoded = data.strip_prefix(PNG_DATA_URI_PREFIX).unwrap_or(data);

    STANDARD
        .decode(encoded.trim())
        .map_err(|e| GalleryError::Validation(format!("Invalid imageData: {}", e)))
}

/// Name for a doodle created at `millis` since the Unix epoch.
pub fn doodle_name(millis: u128) -> String {
    format!("doodle-{}{}", millis, IMAGE_EXTENSION)
}

/// Name for a doodle created now.
pub fn doodle_name_now() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    doodle_name(millis)
}

/// Whether a stored object counts as a gallery image.
pub fn is_doodle_name(name: &str) -> bool {
    name.ends_with(IMAGE_EXTENSION)
}

/// Check a user-supplied name before it is used as a deletion key.
pub fn validate_delete_name(name: &str) -> Result<(), GalleryError> {
    if !name.ends_with(IMAGE_EXTENSION) || name.contains("..") {
        return Err(GalleryError::Validation("Invalid filename".to_string()));
    }
    Ok(())
}
