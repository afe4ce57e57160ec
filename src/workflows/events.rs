//! Best-effort event broadcast between open views.
//!
//! Delivery is fire-and-forget: a missed event only leaves another view
//! stale until its next reload, which re-fetches ground truth from the
//! backend. Send errors (no subscribers) are ignored.

use taskdeck_models::UserId;
use tokio::sync::broadcast;

/// Notification that a user's brand assignments changed.
#[derive(Debug, Clone)]
pub struct AssignmentChanged {
    pub company_name: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AssignmentChanged>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AssignmentChanged> {
        self.tx.subscribe()
    }

    /// Publish without waiting for or checking delivery.
    pub fn publish(&self, event: AssignmentChanged) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}
