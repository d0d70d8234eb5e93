//! Domain types shared by the persistence, media and API crates.

pub mod error;
pub mod project;
pub mod sections;
pub mod types;
pub mod validation;
