//! Image store client.
//!
//! The media host is opaque: an upload takes bytes plus a name and yields a
//! public URL with a stable reference id; a delete takes that reference and
//! reports whether the host released the image.

pub mod cloudinary;

use async_trait::async_trait;
use serde::Serialize;

pub use cloudinary::{CloudinaryConfig, CloudinaryStore};

/// An image received from a client, ready to forward to the media host.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

/// Location of an image stored on the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public URL served to clients.
    pub url: String,
    /// Host-side id needed to delete the image later.
    pub reference: String,
}

/// Outcome of a delete request. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
}

impl DeleteOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Errors from the media host.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("Media host error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The host answered 2xx but the body lacked the expected fields.
    #[error("Unexpected media host response: {0}")]
    InvalidResponse(String),

    /// No media host credentials were configured.
    #[error("Media host is not configured")]
    NotConfigured,
}

/// External image storage.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `image` under `folder`.
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<StoredImage, MediaError>;

    /// Release a previously stored image. An empty reference is a failure.
    async fn delete(&self, reference: &str) -> DeleteOutcome;
}

/// Stand-in used when no media host credentials are configured: every
/// upload fails (so writes proceed without an image) and every delete
/// reports failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredStore;

#[async_trait]
impl ImageStore for UnconfiguredStore {
    async fn upload(&self, _image: ImageUpload, _folder: &str) -> Result<StoredImage, MediaError> {
        Err(MediaError::NotConfigured)
    }

    async fn delete(&self, reference: &str) -> DeleteOutcome {
        if reference.is_empty() {
            return DeleteOutcome::failed("No reference provided");
        }
        DeleteOutcome::failed(MediaError::NotConfigured.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_upload() -> ImageUpload {
        ImageUpload {
            bytes: vec![0x89, b'P', b'N', b'G'],
            file_name: "cover.png".into(),
            content_type: Some("image/png".into()),
        }
    }

    #[tokio::test]
    async fn unconfigured_store_rejects_uploads() {
        let err = UnconfiguredStore.upload(sample_upload(), "projects").await.unwrap_err();
        assert!(matches!(err, MediaError::NotConfigured));
    }

    #[tokio::test]
    async fn unconfigured_store_reports_failed_deletes() {
        let outcome = UnconfiguredStore.delete("projects/abc").await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Media host is not configured");

        let outcome = UnconfiguredStore.delete("").await;
        assert_eq!(outcome, DeleteOutcome::failed("No reference provided"));
    }
}
