//! Project create/read/update/delete with image lifecycle.

use folio_core::error::CoreError;
use folio_core::project::{validate_priority, PROJECT_IMAGE_FOLDER};
use folio_core::types::DbId;
use folio_core::validation::{optional_text, require_text, validate_input};
use folio_db::models::project::{CreateProject, Project, UpdateProject};
use folio_db::models::status::ProjectStatus;
use folio_db::repositories::ProjectRepo;
use folio_media::ImageUpload;

use crate::error::{AppError, AppResult};
use crate::services::{images, DeleteConfirmation};
use crate::state::AppState;

/// Scalar fields decoded from a create or update form.
#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<i32>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// Create a project, uploading `image` first when one was sent.
pub async fn create(
    state: &AppState,
    input: ProjectInput,
    image: Option<ImageUpload>,
) -> AppResult<Project> {
    let name = require_text("Project name", input.name.as_deref())?;
    if let Some(priority) = input.priority {
        validate_priority(priority)?;
    }

    let mut create = CreateProject {
        name,
        status: input.status,
        priority: input.priority,
        image: String::new(),
        image_ref: String::new(),
    };
    validate_input(&create)?;

    state.db.ensure_available()?;

    let stored = images::try_upload(state.images.as_ref(), image, PROJECT_IMAGE_FOLDER).await;
    if let Some(stored) = &stored {
        create.image = stored.url.clone();
        create.image_ref = stored.reference.clone();
    }

    match state.db.execute(ProjectRepo::create(state.db.pool(), &create)).await {
        Ok(project) => {
            tracing::info!(project_id = %project.id, has_image = stored.is_some(), "Project created");
            Ok(project)
        }
        Err(e) => {
            if let Some(stored) = stored {
                images::release(state.images.as_ref(), &stored.reference).await;
            }
            Err(e.into())
        }
    }
}

pub async fn get(state: &AppState, id: DbId) -> AppResult<Project> {
    state
        .db
        .execute(ProjectRepo::find_by_id(state.db.pool(), id))
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn list(state: &AppState) -> AppResult<Vec<Project>> {
    Ok(state.db.execute(ProjectRepo::list(state.db.pool())).await?)
}

/// Apply the supplied fields to an existing project.
///
/// A new image replaces the old one only once the record is persisted; the
/// old image is then released. Any failure after the upload releases the
/// new image instead.
pub async fn update(
    state: &AppState,
    id: DbId,
    input: ProjectInput,
    image: Option<ImageUpload>,
) -> AppResult<Project> {
    let existing = get(state, id).await?;

    let name = optional_text("Project name", input.name.as_deref())?;
    if let Some(priority) = input.priority {
        validate_priority(priority)?;
    }

    let mut changes = UpdateProject {
        name,
        status: input.status,
        priority: input.priority,
        ..Default::default()
    };
    validate_input(&changes)?;

    let stored = images::try_upload(state.images.as_ref(), image, PROJECT_IMAGE_FOLDER).await;
    if let Some(stored) = &stored {
        changes.image = Some(stored.url.clone());
        changes.image_ref = Some(stored.reference.clone());
    }

    let result = state
        .db
        .execute(ProjectRepo::update(state.db.pool(), id, &changes))
        .await;

    match (result, stored) {
        (Ok(Some(project)), Some(_)) => {
            if !existing.image_ref.is_empty() {
                images::release(state.images.as_ref(), &existing.image_ref).await;
            }
            tracing::info!(project_id = %id, "Project updated with new image");
            Ok(project)
        }
        (Ok(Some(project)), None) => {
            tracing::info!(project_id = %id, "Project updated");
            Ok(project)
        }
        (Ok(None), stored) => {
            if let Some(stored) = stored {
                images::release(state.images.as_ref(), &stored.reference).await;
            }
            Err(not_found(id))
        }
        (Err(e), stored) => {
            if let Some(stored) = stored {
                images::release(state.images.as_ref(), &stored.reference).await;
            }
            Err(e.into())
        }
    }
}

/// Delete a project and release its image. The project's details are left
/// in place.
pub async fn delete(state: &AppState, id: DbId) -> AppResult<DeleteConfirmation> {
    let project = get(state, id).await?;

    let warning = if project.image_ref.is_empty() {
        None
    } else {
        images::release(state.images.as_ref(), &project.image_ref).await
    };

    let deleted = state
        .db
        .execute(ProjectRepo::delete(state.db.pool(), id))
        .await?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(project_id = %id, image_warning = warning.is_some(), "Project deleted");
    Ok(DeleteConfirmation {
        message: "Project deleted successfully".to_string(),
        warning,
    })
}
