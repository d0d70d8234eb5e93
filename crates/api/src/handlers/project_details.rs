//! Handlers for the `/project-details` resource.
//!
//! Create and update accept `multipart/form-data` with `projectId`,
//! `headingName`, an optional `mainImage` file and any content sections.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::types::DbId;
use folio_db::models::project_details::ProjectDetails;

use crate::error::{AppError, AppResult};
use crate::multipart::FormData;
use crate::services::project_details::{self, DetailsInput};
use crate::services::DeleteConfirmation;
use crate::state::AppState;

/// Main image file field name.
const MAIN_IMAGE_FIELD: &str = "mainImage";

fn details_input(form: &FormData) -> AppResult<DetailsInput> {
    let project_id = form
        .text("projectId")
        .map(|raw| {
            raw.trim()
                .parse::<DbId>()
                .map_err(|_| AppError::BadRequest(format!("Invalid projectId '{raw}'")))
        })
        .transpose()?;

    Ok(DetailsInput {
        project_id,
        heading_name: form.text("headingName").map(str::to_string),
        sections: form.sections()?,
    })
}

/// POST /api/project-details
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectDetails>)> {
    let mut form = FormData::from_multipart(multipart).await?;
    let input = details_input(&form)?;
    let image = form.take_file(MAIN_IMAGE_FIELD);

    let details = project_details::create(&state, input, image).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /api/project-details
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ProjectDetails>>> {
    Ok(Json(project_details::list(&state).await?))
}

/// GET /api/project-details/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetails>> {
    Ok(Json(project_details::get(&state, id).await?))
}

/// GET /api/projects/{id}/details
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectDetails>>> {
    Ok(Json(project_details::list_by_project(&state, project_id).await?))
}

/// PUT /api/project-details/{id}
///
/// A `projectId` field, if sent, is ignored.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<ProjectDetails>> {
    let mut form = FormData::from_multipart(multipart).await?;
    let input = DetailsInput {
        project_id: None,
        heading_name: form.text("headingName").map(str::to_string),
        sections: form.sections()?,
    };
    let image = form.take_file(MAIN_IMAGE_FIELD);

    Ok(Json(project_details::update(&state, id, input, image).await?))
}

/// DELETE /api/project-details/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteConfirmation>> {
    Ok(Json(project_details::delete(&state, id).await?))
}
