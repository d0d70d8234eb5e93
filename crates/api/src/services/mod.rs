//! Orchestration of image host calls around persistence.
//!
//! Handlers decode requests; services decide the order of uploads, writes
//! and image releases so a failed step never leaves a dangling image.

pub mod images;
pub mod project;
pub mod project_details;

use serde::Serialize;

/// Response body for successful deletes.
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
    /// Set when the record was removed but its image could not be released.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
