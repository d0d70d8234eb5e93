//! Availability- and timeout-aware access to the pool.

use std::future::Future;
use std::time::Duration;

use crate::error::is_connection_error;
use crate::{DbAvailability, DbError, DbPool};

/// Default upper bound on a single query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool handle paired with the live availability flag.
///
/// Cheap to clone; every clone shares the same pool and flag.
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
    availability: DbAvailability,
    query_timeout: Duration,
}

impl Database {
    pub fn new(pool: DbPool, availability: DbAvailability, query_timeout: Duration) -> Self {
        Self {
            pool,
            availability,
            query_timeout,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn availability(&self) -> &DbAvailability {
        &self.availability
    }

    pub fn is_available(&self) -> bool {
        self.availability.is_available()
    }

    /// Fail fast when the store is known to be down.
    pub fn ensure_available(&self) -> Result<(), DbError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(DbError::Unavailable)
        }
    }

    /// Run a repository call under the availability check and query timeout.
    ///
    /// Connection-level driver failures flip the availability flag so later
    /// calls fail fast instead of waiting on a dead pool.
    pub async fn execute<T, F>(&self, query: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        self.ensure_available()?;

        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if is_connection_error(&e) => {
                self.availability.mark_disconnected(&e.to_string());
                Err(DbError::Unavailable)
            }
            Ok(Err(e)) => Err(DbError::Query(e)),
            Err(_) => {
                tracing::warn!(timeout_ms = self.query_timeout.as_millis() as u64, "Query timed out");
                Err(DbError::Timeout(self.query_timeout))
            }
        }
    }
}
