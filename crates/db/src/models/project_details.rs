//! Project details entity model and DTOs.

use folio_core::sections::ContentSections;
use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_details` table.
///
/// Content sections are stored as one JSONB object and flattened into the
/// top level of the serialized entity.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub id: DbId,
    pub project_id: DbId,
    pub heading_name: String,
    pub main_image: String,
    pub main_image_ref: String,
    #[sqlx(json)]
    #[serde(flatten)]
    pub sections: ContentSections,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating project details. `sections` should already carry
/// defaults for every known section.
#[derive(Debug, Clone, Validate)]
pub struct CreateProjectDetails {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub heading_name: String,
    pub main_image: String,
    pub main_image_ref: String,
    pub sections: ContentSections,
}

/// DTO for updating project details.
///
/// Only sections present in `sections` are replaced; the others keep their
/// stored content.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateProjectDetails {
    #[validate(length(min = 1, max = 255))]
    pub heading_name: Option<String>,
    pub main_image: Option<String>,
    pub main_image_ref: Option<String>,
    pub sections: ContentSections,
}
