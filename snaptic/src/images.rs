//! Image upload and download.
//!
//! ## `attach_image_to_note`: `POST /v1/images/<note_id>.json`
//!
//! `multipart/form-data` body with a single file part named `image`; the
//! part's `Content-Type` is guessed from the file name.
//!
//! ## `fetch_image_data`: `GET /viewImage.action?viewNodeId=<image_id>`
//!
//! Returns the raw image bytes. This path sits outside the `/v1` prefix.

use crate::client::SnapticClient;
use crate::endpoint;
use crate::error::{Result, SnapticError};
use crate::multipart::{self, FilePart};
use std::fs;
use std::path::Path;

/// Form field the server expects image uploads under.
const IMAGE_FIELD: &str = "image";

impl SnapticClient {
    /// Attach in-memory image bytes to a note. Returns the server's response body.
    pub fn attach_image_to_note(
        &self,
        filename: &str,
        data: &[u8],
        note_id: u64,
    ) -> Result<Vec<u8>> {
        let body = multipart::encode(&[FilePart {
            field: IMAGE_FIELD,
            filename,
            data,
        }]);
        tracing::debug!(note_id, filename, bytes = data.len(), "uploading image");
        self.dispatcher()
            .post_multipart(&endpoint::image_upload(note_id), body)
    }

    /// Read an image file from disk and attach it to a note.
    ///
    /// # Errors
    ///
    /// - [`SnapticError::Config`]: the file cannot be read
    /// - [`SnapticError::Api`]: the server rejected the upload
    pub fn attach_image_file(&self, path: &Path, note_id: u64) -> Result<Vec<u8>> {
        let data = fs::read(path).map_err(|e| {
            SnapticError::Config(format!("error reading {}: {e}", path.display()))
        })?;
        let filename = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
        self.attach_image_to_note(&filename, &data, note_id)
    }

    /// Download the raw bytes of an image.
    pub fn fetch_image_data(&self, image_id: u64) -> Result<Vec<u8>> {
        self.dispatcher().get(&endpoint::image_view(image_id))
    }
}
