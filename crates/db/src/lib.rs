//! Persistence layer: connection management, availability tracking and
//! repositories for projects and project details.

pub mod availability;
pub mod database;
pub mod error;
pub mod models;
pub mod monitor;
pub mod repositories;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub use availability::DbAvailability;
pub use database::Database;
pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// How long a caller waits for a pooled connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    pool_options().connect(database_url).await
}

/// Create a pool that defers connecting until first use.
///
/// Only fails if the URL itself cannot be parsed.
pub fn create_lazy_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    pool_options().connect_lazy(database_url)
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Fixed-delay retry schedule for the startup connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Pause between attempts (not exponential).
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Total number of connection attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, 5000)
    }
}

/// Result of [`connect_with_retry`].
pub struct Connection {
    pub pool: DbPool,
    pub availability: DbAvailability,
    /// Attempts made before connecting or giving up.
    pub attempts: u32,
}

/// Connect to the database, retrying with a fixed delay.
///
/// When every attempt fails the process keeps running: a lazily-connecting
/// pool is returned and availability starts out `false`, so requests fail
/// fast until the monitor observes the database coming back.
///
/// Only an unparseable URL is reported as an error.
pub async fn connect_with_retry(
    database_url: &str,
    policy: &RetryPolicy,
) -> Result<Connection, sqlx::Error> {
    let safe_url = mask_credentials(database_url);
    let mut attempts = 0;

    while attempts < policy.max_attempts() {
        attempts += 1;
        tracing::info!(url = %safe_url, attempt = attempts, "Connecting to database");

        match create_pool(database_url).await {
            Ok(pool) => {
                tracing::info!(attempt = attempts, "Database connected");
                return Ok(Connection {
                    pool,
                    availability: DbAvailability::new(true),
                    attempts,
                });
            }
            Err(e) => {
                let remaining = policy.max_attempts() - attempts;
                tracing::warn!(error = %e, remaining, "Database connection attempt failed");
                if remaining > 0 {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    tracing::warn!(
        attempts,
        "Database unreachable, continuing without a connection"
    );
    Ok(Connection {
        pool: create_lazy_pool(database_url)?,
        availability: DbAvailability::new(false),
        attempts,
    })
}

/// Replace the user/password portion of a connection URL with asterisks.
pub fn mask_credentials(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    match rest.rfind('@') {
        Some(at) if rest[..at].contains(':') => {
            format!("{}*****:*****@{}", &url[..scheme_end + 3], &rest[at + 1..])
        }
        _ => url.to_string(),
    }
}
