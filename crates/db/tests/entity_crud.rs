//! Integration tests for project and project-details repositories.
//!
//! Exercises the repository layer against a real database:
//! - Create with defaults
//! - Partial updates
//! - Section merging
//! - Check constraints
//! - Non-cascading delete

use assert_matches::assert_matches;
use folio_core::sections::ContentSections;
use folio_db::models::project::{CreateProject, UpdateProject};
use folio_db::models::project_details::{CreateProjectDetails, UpdateProjectDetails};
use folio_db::models::status::ProjectStatus;
use folio_db::repositories::{ProjectDetailsRepo, ProjectRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        status: None,
        priority: None,
        image: String::new(),
        image_ref: String::new(),
    }
}

fn new_details(project_id: uuid::Uuid, heading: &str) -> CreateProjectDetails {
    CreateProjectDetails {
        project_id,
        heading_name: heading.to_string(),
        main_image: String::new(),
        main_image_ref: String::new(),
        sections: ContentSections::new().with_defaults(),
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_applies_defaults(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Alpha")).await.unwrap();

    assert_eq!(project.name, "Alpha");
    assert_eq!(project.status, ProjectStatus::Active);
    assert_eq!(project.priority, 5);
    assert_eq!(project.image, "");
    assert_eq!(project.image_ref, "");
    assert_eq!(project.created_at, project.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_project_names_are_allowed(pool: PgPool) {
    let a = ProjectRepo::create(&pool, &new_project("Same")).await.unwrap();
    let b = ProjectRepo::create(&pool, &new_project("Same")).await.unwrap();
    assert_ne!(a.id, b.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_project_changes_only_supplied_fields(pool: PgPool) {
    let mut input = new_project("Original");
    input.priority = Some(8);
    let created = ProjectRepo::create(&pool, &input).await.unwrap();

    let updated = ProjectRepo::update(
        &pool,
        created.id,
        &UpdateProject {
            status: Some(ProjectStatus::Inactive),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Original");
    assert_eq!(updated.priority, 8);
    assert_eq!(updated.status, ProjectStatus::Inactive);
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_project_returns_none(pool: PgPool) {
    let result = ProjectRepo::update(&pool, uuid::Uuid::new_v4(), &UpdateProject::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn priority_out_of_range_violates_check(pool: PgPool) {
    let mut input = new_project("Too high");
    input.priority = Some(11);
    let err = ProjectRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23514"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mismatched_image_pair_violates_check(pool: PgPool) {
    let mut input = new_project("Half image");
    input.image = "https://img.example/a.png".to_string();
    let err = ProjectRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db)
        if db.constraint() == Some("ck_projects_image_pair"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_then_get_returns_identical_rows(pool: PgPool) {
    for name in ["P1", "P2", "P3"] {
        ProjectRepo::create(&pool, &new_project(name)).await.unwrap();
    }

    let listed = ProjectRepo::list(&pool).await.unwrap();
    assert_eq!(listed.len(), 3);
    for project in listed {
        let fetched = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
        assert_eq!(fetched, project);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_project_removes_row(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Gone")).await.unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(!ProjectRepo::exists(&pool, project.id).await.unwrap());
    assert!(!ProjectRepo::delete(&pool, project.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Project details
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_details_round_trips_sections(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Case")).await.unwrap();
    let mut input = new_details(project.id, "Heading");
    input
        .sections
        .insert("background", json!({"title": "Context", "backgroundList": ["a", "b"]}))
        .unwrap();

    let created = ProjectDetailsRepo::create(&pool, &input).await.unwrap();
    let fetched = ProjectDetailsRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(fetched.sections, input.sections);
    assert_eq!(fetched.sections.get("background").unwrap()["title"], "Context");
    assert!(fetched.sections.get("role").unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_details_replaces_only_supplied_sections(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Case")).await.unwrap();
    let mut input = new_details(project.id, "Heading");
    input.sections.insert("role", json!({"title": "Lead"})).unwrap();
    input.sections.insert("research", json!({"title": "Interviews"})).unwrap();
    let created = ProjectDetailsRepo::create(&pool, &input).await.unwrap();

    let mut sections = ContentSections::new();
    sections.insert("role", json!({"title": "Designer"})).unwrap();
    let updated = ProjectDetailsRepo::update(
        &pool,
        created.id,
        &UpdateProjectDetails {
            sections,
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.heading_name, "Heading");
    assert_eq!(updated.sections.get("role").unwrap()["title"], "Designer");
    assert_eq!(updated.sections.get("research").unwrap()["title"], "Interviews");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_by_project_filters_on_parent(pool: PgPool) {
    let a = ProjectRepo::create(&pool, &new_project("A")).await.unwrap();
    let b = ProjectRepo::create(&pool, &new_project("B")).await.unwrap();
    ProjectDetailsRepo::create(&pool, &new_details(a.id, "A1")).await.unwrap();
    ProjectDetailsRepo::create(&pool, &new_details(a.id, "A2")).await.unwrap();
    ProjectDetailsRepo::create(&pool, &new_details(b.id, "B1")).await.unwrap();

    let for_a = ProjectDetailsRepo::list_by_project(&pool, a.id).await.unwrap();
    assert_eq!(for_a.len(), 2);
    assert!(for_a.iter().all(|d| d.project_id == a.id));
    assert_eq!(ProjectDetailsRepo::list(&pool).await.unwrap().len(), 3);
}

/// Deleting a project does not cascade: its details stay behind, still
/// pointing at the removed project id.
#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_project_orphans_its_details(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Parent")).await.unwrap();
    let details = ProjectDetailsRepo::create(&pool, &new_details(project.id, "Child"))
        .await
        .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());

    let orphan = ProjectDetailsRepo::find_by_id(&pool, details.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(orphan.project_id, project.id);
}
