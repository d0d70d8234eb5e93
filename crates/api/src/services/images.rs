//! Best-effort wrappers over [`ImageStore`]: failures are logged and
//! reported to the caller, never raised.

use folio_media::{ImageStore, ImageUpload, StoredImage};

/// Upload `image` if one was sent. A failed upload yields `None` so the
/// record can still be written without an image.
pub async fn try_upload(
    images: &dyn ImageStore,
    image: Option<ImageUpload>,
    folder: &str,
) -> Option<StoredImage> {
    let image = image?;
    let file_name = image.file_name.clone();

    match images.upload(image, folder).await {
        Ok(stored) => {
            tracing::info!(folder, reference = %stored.reference, "Image uploaded");
            Some(stored)
        }
        Err(e) => {
            tracing::warn!(folder, file_name = %file_name, error = %e, "Image upload failed, continuing without image");
            None
        }
    }
}

/// Ask the host to release `reference`. Returns a warning message when the
/// host did not confirm the delete.
pub async fn release(images: &dyn ImageStore, reference: &str) -> Option<String> {
    let outcome = images.delete(reference).await;
    if outcome.success {
        tracing::info!(reference, "Image released");
        None
    } else {
        tracing::warn!(reference, message = %outcome.message, "Image release failed");
        Some(format!("Image could not be deleted: {}", outcome.message))
    }
}
