//! Cloudinary implementation of [`ImageStore`].
//!
//! Uses the signed upload API:
//! `POST {api_base}/{cloud_name}/image/upload` and
//! `POST {api_base}/{cloud_name}/image/destroy`.
//! Requests are signed with SHA-256 over the alphabetically sorted
//! parameters followed by the API secret.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{DeleteOutcome, ImageStore, ImageUpload, MediaError, StoredImage};

/// Public Cloudinary API root.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Credentials and endpoint for a Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Load credentials from the environment.
    ///
    /// | Env Var                  | Default                            |
    /// |--------------------------|------------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`  | required                           |
    /// | `CLOUDINARY_API_KEY`     | required                           |
    /// | `CLOUDINARY_API_SECRET`  | required                           |
    /// | `CLOUDINARY_API_BASE`    | `https://api.cloudinary.com/v1_1`  |
    ///
    /// Returns `None` if any required variable is missing or empty.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Some(Self {
            cloud_name: var("CLOUDINARY_CLOUD_NAME")?,
            api_key: var("CLOUDINARY_API_KEY")?,
            api_secret: var("CLOUDINARY_API_SECRET")?,
            api_base: var("CLOUDINARY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }
}

/// Subset of the upload response we rely on.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

/// Body of a destroy response: `{"result": "ok" | "not found"}`.
#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// HTTP client for one Cloudinary account.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    async fn destroy(&self, reference: &str) -> Result<DestroyResponse, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", reference), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", reference),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("signature", signature.as_str()),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await?;

        parse_response(response).await
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<StoredImage, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let mut file = Part::bytes(image.bytes).file_name(image.file_name.clone());
        if let Some(content_type) = image.content_type.as_deref() {
            file = file.mime_str(content_type)?;
        }

        let form = Form::new()
            .part("file", file)
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        tracing::debug!(file_name = %image.file_name, folder, "Uploading image");

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = parse_response(response).await?;
        stored_image(body)
    }

    async fn delete(&self, reference: &str) -> DeleteOutcome {
        if reference.is_empty() {
            return DeleteOutcome::failed("No reference provided");
        }

        match self.destroy(reference).await {
            Ok(body) if body.result == "ok" => DeleteOutcome::ok(body.result),
            Ok(body) => DeleteOutcome::failed(body.result),
            Err(e) => {
                tracing::error!(reference, error = %e, "Image delete request failed");
                DeleteOutcome::failed(e.to_string())
            }
        }
    }
}

/// Compute the request signature: `k1=v1&k2=v2...` sorted by key, followed
/// by the secret, hashed with SHA-256 and hex encoded.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let hash = Sha256::digest(format!("{joined}{api_secret}").as_bytes());
    format!("{hash:x}")
}

fn stored_image(body: UploadResponse) -> Result<StoredImage, MediaError> {
    match (body.secure_url, body.public_id) {
        (Some(url), Some(reference)) if !url.is_empty() && !reference.is_empty() => {
            Ok(StoredImage { url, reference })
        }
        _ => Err(MediaError::InvalidResponse(
            "upload response missing secure_url or public_id".into(),
        )),
    }
}

/// Ensure a success status, then decode the JSON body.
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, MediaError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(MediaError::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
