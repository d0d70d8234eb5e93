use std::sync::Arc;
use std::time::Instant;

use folio_db::Database;
use folio_media::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database pool plus live availability flag.
    pub db: Database,
    /// External image host.
    pub images: Arc<dyn ImageStore>,
    pub config: Arc<ServerConfig>,
    /// Process start, reported by the health endpoint.
    pub started_at: Instant,
}
