//! Route definitions for the `/project-details` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::project_details;
use crate::state::AppState;

/// Routes mounted at `/project-details`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project_details::list).post(project_details::create))
        .route(
            "/{id}",
            get(project_details::get_by_id)
                .put(project_details::update)
                .delete(project_details::delete),
        )
}
