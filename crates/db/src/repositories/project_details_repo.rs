//! Repository for the `project_details` table.

use folio_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::project_details::{
    CreateProjectDetails, ProjectDetails, UpdateProjectDetails,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, heading_name, main_image, main_image_ref, \
    sections, created_at, updated_at";

/// Provides CRUD operations for project details.
pub struct ProjectDetailsRepo;

impl ProjectDetailsRepo {
    /// Insert new project details, returning the created row.
    ///
    /// Does not check that `project_id` exists; callers resolve the parent
    /// first.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectDetails,
    ) -> Result<ProjectDetails, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_details
                (project_id, heading_name, main_image, main_image_ref, sections)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectDetails>(&query)
            .bind(input.project_id)
            .bind(&input.heading_name)
            .bind(&input.main_image)
            .bind(&input.main_image_ref)
            .bind(Json(&input.sections))
            .fetch_one(pool)
            .await
    }

    /// Find project details by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectDetails>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_details WHERE id = $1");
        sqlx::query_as::<_, ProjectDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all project details ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectDetails>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_details ORDER BY created_at DESC, id");
        sqlx::query_as::<_, ProjectDetails>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the details belonging to one project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_details
             WHERE project_id = $1
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, ProjectDetails>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update project details. Only non-`None` fields in `input` are applied,
    /// and supplied sections replace their stored counterparts key by key.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectDetails,
    ) -> Result<Option<ProjectDetails>, sqlx::Error> {
        let query = format!(
            "UPDATE project_details SET
                heading_name = COALESCE($2, heading_name),
                main_image = COALESCE($3, main_image),
                main_image_ref = COALESCE($4, main_image_ref),
                sections = sections || $5,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectDetails>(&query)
            .bind(id)
            .bind(&input.heading_name)
            .bind(&input.main_image)
            .bind(&input.main_image_ref)
            .bind(Json(&input.sections))
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete project details by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_details WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
