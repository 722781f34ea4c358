//! Notification primitives.
//!
//! Projectors publish toasts through a [`NotificationHub`]; rendering
//! belongs to the UI layer, which subscribes to the hub. Publishing with
//! no subscribers is a no-op.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;

/// Standard toast duration.
pub const TOAST_SHORT: Duration = Duration::from_secs(5);
/// Longer duration used when a transfer session opens.
pub const TOAST_LONG: Duration = Duration::from_secs(10);

/// Icon references understood by the UI layer.
pub mod icon {
    pub const TRANSFER: &str = "bi-arrow-left-right";
    pub const REBOOT: &str = "bi-bootstrap-reboot";
    pub const ETHERNET: &str = "bi-ethernet";
    pub const INFO_CIRCLE: &str = "bi-info-circle";
    pub const EXCLAMATION_CIRCLE: &str = "bi-exclamation-circle";
    pub const EXCLAMATION_TRIANGLE: &str = "bi-exclamation-triangle";
    pub const CHECK_CIRCLE: &str = "bi-check-circle";
    pub const X_OCTAGON: &str = "bi-x-octagon";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
    Secondary,
}

#[derive(Clone, Debug, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub icon: &'static str,
    pub body: String,
    pub duration: Duration,
}

impl Notification {
    pub fn new(
        severity: Severity,
        icon: &'static str,
        body: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            severity,
            icon,
            body: body.into(),
            duration,
        }
    }
}

/// Broadcast fan-out for notifications.
#[derive(Clone, Debug)]
pub struct NotificationHub {
    tx: broadcast::Sender<Notification>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Publish a notification. Dropped silently when nobody listens.
    pub fn publish(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(64)
    }
}
