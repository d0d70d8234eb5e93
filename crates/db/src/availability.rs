//! Live database availability flag.
//!
//! One [`DbAvailability`] is created per process by the startup connect
//! routine and shared (cheaply cloned) with the connection monitor, the
//! [`Database`](crate::Database) guard and the health endpoint. State changes
//! are published on a `watch` channel so other tasks can react to them.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct DbAvailability {
    state: Arc<watch::Sender<bool>>,
}

impl DbAvailability {
    pub fn new(available: bool) -> Self {
        let (state, _) = watch::channel(available);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn is_available(&self) -> bool {
        *self.state.borrow()
    }

    /// Record a successful connection. Logs only on a state change.
    pub fn mark_connected(&self) {
        let was_available = self.state.send_replace(true);
        if !was_available {
            tracing::info!("Database connection restored");
        }
    }

    /// Record a connection error or disconnect. Logs only on a state change.
    pub fn mark_disconnected(&self, reason: &str) {
        let was_available = self.state.send_replace(false);
        if was_available {
            tracing::warn!(reason, "Database connection lost");
        }
    }

    /// Receive every subsequent availability change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}
