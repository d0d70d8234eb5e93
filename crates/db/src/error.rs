use std::time::Duration;

/// Errors surfaced by the [`Database`](crate::Database) guard.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The store is known to be down; the query was not attempted.
    #[error("Database is unavailable")]
    Unavailable,

    /// The query did not complete within the configured bound.
    #[error("Database query timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

/// Whether a driver error means the connection itself is gone, as opposed
/// to a problem with the statement.
pub fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
