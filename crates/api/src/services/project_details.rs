//! Project details create/read/update/delete with main image lifecycle.

use folio_core::error::CoreError;
use folio_core::project::DETAILS_IMAGE_FOLDER;
use folio_core::sections::ContentSections;
use folio_core::types::DbId;
use folio_core::validation::{optional_text, require_text, validate_input};
use folio_db::models::project_details::{
    CreateProjectDetails, ProjectDetails, UpdateProjectDetails,
};
use folio_db::repositories::{ProjectDetailsRepo, ProjectRepo};
use folio_media::ImageUpload;

use crate::error::{AppError, AppResult};
use crate::services::{images, DeleteConfirmation};
use crate::state::AppState;

/// Fields decoded from a create or update form.
#[derive(Debug, Clone, Default)]
pub struct DetailsInput {
    pub project_id: Option<DbId>,
    pub heading_name: Option<String>,
    pub sections: ContentSections,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ProjectDetails",
        id,
    })
}

/// Create details for an existing project.
///
/// The parent project is resolved before anything is uploaded; sections not
/// supplied are stored as empty objects.
pub async fn create(
    state: &AppState,
    input: DetailsInput,
    image: Option<ImageUpload>,
) -> AppResult<ProjectDetails> {
    let project_id = input
        .project_id
        .ok_or_else(|| CoreError::Validation("Project ID is required".into()))?;
    let heading_name = require_text("Heading name", input.heading_name.as_deref())?;

    let mut create = CreateProjectDetails {
        project_id,
        heading_name,
        main_image: String::new(),
        main_image_ref: String::new(),
        sections: input.sections.with_defaults(),
    };
    validate_input(&create)?;

    let parent_exists = state
        .db
        .execute(ProjectRepo::exists(state.db.pool(), project_id))
        .await?;
    if !parent_exists {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }));
    }

    let stored = images::try_upload(state.images.as_ref(), image, DETAILS_IMAGE_FOLDER).await;
    if let Some(stored) = &stored {
        create.main_image = stored.url.clone();
        create.main_image_ref = stored.reference.clone();
    }

    match state
        .db
        .execute(ProjectDetailsRepo::create(state.db.pool(), &create))
        .await
    {
        Ok(details) => {
            tracing::info!(
                details_id = %details.id,
                project_id = %project_id,
                has_image = stored.is_some(),
                "Project details created"
            );
            Ok(details)
        }
        Err(e) => {
            if let Some(stored) = stored {
                images::release(state.images.as_ref(), &stored.reference).await;
            }
            Err(e.into())
        }
    }
}

pub async fn get(state: &AppState, id: DbId) -> AppResult<ProjectDetails> {
    state
        .db
        .execute(ProjectDetailsRepo::find_by_id(state.db.pool(), id))
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn list(state: &AppState) -> AppResult<Vec<ProjectDetails>> {
    Ok(state
        .db
        .execute(ProjectDetailsRepo::list(state.db.pool()))
        .await?)
}

/// Details belonging to one project. An empty result is reported as
/// `NotFound` rather than an empty list.
pub async fn list_by_project(state: &AppState, project_id: DbId) -> AppResult<Vec<ProjectDetails>> {
    let details = state
        .db
        .execute(ProjectDetailsRepo::list_by_project(state.db.pool(), project_id))
        .await?;
    if details.is_empty() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project details for project",
            id: project_id,
        }));
    }
    Ok(details)
}

/// Apply the supplied fields and sections. The owning project never changes.
pub async fn update(
    state: &AppState,
    id: DbId,
    input: DetailsInput,
    image: Option<ImageUpload>,
) -> AppResult<ProjectDetails> {
    let existing = get(state, id).await?;

    let mut changes = UpdateProjectDetails {
        heading_name: optional_text("Heading name", input.heading_name.as_deref())?,
        sections: input.sections,
        ..Default::default()
    };
    validate_input(&changes)?;

    let stored = images::try_upload(state.images.as_ref(), image, DETAILS_IMAGE_FOLDER).await;
    if let Some(stored) = &stored {
        changes.main_image = Some(stored.url.clone());
        changes.main_image_ref = Some(stored.reference.clone());
    }

    let result = state
        .db
        .execute(ProjectDetailsRepo::update(state.db.pool(), id, &changes))
        .await;

    match (result, stored) {
        (Ok(Some(details)), Some(_)) => {
            if !existing.main_image_ref.is_empty() {
                images::release(state.images.as_ref(), &existing.main_image_ref).await;
            }
            tracing::info!(details_id = %id, "Project details updated with new image");
            Ok(details)
        }
        (Ok(Some(details)), None) => {
            tracing::info!(details_id = %id, sections = changes.sections.len(), "Project details updated");
            Ok(details)
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

pub async fn delete(state: &AppState, id: DbId) -> AppResult<DeleteConfirmation> {
    let details = get(state, id).await?;

    let warning = if details.main_image_ref.is_empty() {
        None
    } else {
        images::release(state.images.as_ref(), &details.main_image_ref).await
    };

    let deleted = state
        .db
        .execute(ProjectDetailsRepo::delete(state.db.pool(), id))
        .await?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(details_id = %id, image_warning = warning.is_some(), "Project details deleted");
    Ok(DeleteConfirmation {
        message: "Project details deleted successfully".to_string(),
        warning,
    })
}
