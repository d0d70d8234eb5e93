//! Project entity model and DTOs.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::ProjectStatus;

/// A project row from the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub status: ProjectStatus,
    pub priority: i32,
    /// Public URL of the cover image, empty when there is none.
    pub image: String,
    /// Media host reference for `image`; empty exactly when `image` is.
    pub image_ref: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Defaults to `active` if omitted.
    pub status: Option<ProjectStatus>,
    /// Defaults to 5 if omitted.
    #[validate(range(min = 1, max = 10))]
    pub priority: Option<i32>,
    pub image: String,
    pub image_ref: String,
}

/// DTO for updating an existing project. All fields are optional.
///
/// `image` and `image_ref` are always supplied together.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    #[validate(range(min = 1, max = 10))]
    pub priority: Option<i32>,
    pub image: Option<String>,
    pub image_ref: Option<String>,
}
