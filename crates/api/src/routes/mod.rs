pub mod health;
pub mod project;
pub mod project_details;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                          list, create
/// /projects/{id}                     get, update, delete
/// /projects/{id}/details             details for one project
/// /project-details                   list, create
/// /project-details/{id}              get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/project-details", project_details::router())
}
