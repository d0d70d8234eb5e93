//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod project_details_repo;
pub mod project_repo;

pub use project_details_repo::ProjectDetailsRepo;
pub use project_repo::ProjectRepo;
