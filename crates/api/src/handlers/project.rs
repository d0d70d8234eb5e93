//! Handlers for the `/projects` resource.
//!
//! Create and update accept `multipart/form-data` with the scalar fields
//! `name`, `status`, `priority` and an optional `image` file.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::project::parse_priority;
use folio_core::types::DbId;
use folio_db::models::project::Project;
use folio_db::models::status::ProjectStatus;

use crate::error::AppResult;
use crate::multipart::FormData;
use crate::services::project::{self, ProjectInput};
use crate::services::DeleteConfirmation;
use crate::state::AppState;

/// Image file field name.
const IMAGE_FIELD: &str = "image";

fn project_input(form: &FormData) -> AppResult<ProjectInput> {
    Ok(ProjectInput {
        name: form.text("name").map(str::to_string),
        status: form.text("status").map(str::parse::<ProjectStatus>).transpose()?,
        priority: form.text("priority").map(parse_priority).transpose()?,
    })
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Project>)> {
    let mut form = FormData::from_multipart(multipart).await?;
    let input = project_input(&form)?;
    let image = form.take_file(IMAGE_FIELD);

    let project = project::create(&state, input, image).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(project::list(&state).await?))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    Ok(Json(project::get(&state, id).await?))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Project>> {
    let mut form = FormData::from_multipart(multipart).await?;
    let input = project_input(&form)?;
    let image = form.take_file(IMAGE_FIELD);

    Ok(Json(project::update(&state, id, input, image).await?))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteConfirmation>> {
    Ok(Json(project::delete(&state, id).await?))
}
