//! Background connectivity monitor.
//!
//! Pings the database on a fixed interval and feeds the result into the
//! shared [`DbAvailability`]: a failed ping is treated as a disconnect, a
//! successful one after an outage as a reconnect.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{health_check, DbAvailability, DbPool};

/// Shortest accepted ping interval. Also bounds each ping's timeout.
pub const MIN_MONITOR_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn the monitor loop. It runs until `cancel` is triggered.
///
/// `interval` is raised to [`MIN_MONITOR_INTERVAL`] if shorter.
pub fn spawn_monitor(
    pool: DbPool,
    availability: DbAvailability,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let interval = interval.max(MIN_MONITOR_INTERVAL);
    tokio::spawn(async move {
        tracing::debug!(interval_secs = interval.as_secs(), "Database monitor started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            ping_once(&pool, &availability, interval).await;
        }
        tracing::debug!("Database monitor stopped");
    })
}

/// Ping once and update `availability` with the outcome.
pub async fn ping_once(pool: &DbPool, availability: &DbAvailability, timeout: Duration) {
    match tokio::time::timeout(timeout, health_check(pool)).await {
        Ok(Ok(())) => availability.mark_connected(),
        Ok(Err(e)) => availability.mark_disconnected(&e.to_string()),
        Err(_) => availability.mark_disconnected("health check timed out"),
    }
}
