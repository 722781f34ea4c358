//! The event/state projection engine.
//!
//! Both modem channels end up here: the dispatcher classifies inbound
//! messages and the projectors fold them into the [`StateStore`], firing
//! notifications along the way. The engine never drives the modem's
//! protocol; it mirrors what the modem reports and renders the
//! consequences.

mod dispatch;
mod reset;
mod snapshot;
mod transfer;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use riglink_core::api::ModemApi;
use riglink_core::notify::{Notification, NotificationHub, Severity};
use riglink_state::{overall_health, StateStore};

/// Delay before a finished transfer's progress display is cleared,
/// giving the UI time to show completion before the gauge empties.
pub const TRANSFER_RESET_DELAY: Duration = Duration::from_secs(5);

pub struct ProjectionEngine {
    pub(crate) store: Arc<StateStore>,
    pub(crate) notifier: NotificationHub,
    pub(crate) api: Arc<dyn ModemApi>,
    pub(crate) reset_delay: Duration,
}

impl ProjectionEngine {
    pub fn new(store: Arc<StateStore>, notifier: NotificationHub, api: Arc<dyn ModemApi>) -> Self {
        Self {
            store,
            notifier,
            api,
            reset_delay: TRANSFER_RESET_DELAY,
        }
    }

    /// Override the delayed-reset window. Test hook.
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn notifier(&self) -> &NotificationHub {
        &self.notifier
    }

    pub(crate) fn notify(
        &self,
        severity: Severity,
        icon: &'static str,
        body: String,
        duration: Duration,
    ) {
        self.notifier
            .publish(Notification::new(severity, icon, body, duration));
    }

    /// Bulk refresh: fetch every snapshot the modem exposes and run it
    /// through the same projectors the live channels feed.
    ///
    /// The fetches are independent and update disjoint state, so their
    /// completion order does not matter. A failed fetch is a logged
    /// no-op, never an error.
    pub async fn load_all_data(&self) {
        match self.api.modem_state().await {
            Ok(snapshot) => self.apply_state_snapshot(snapshot),
            Err(err) => tracing::debug!(%err, "modem state fetch skipped"),
        }
        match self.api.radio_status().await {
            Ok(snapshot) => self.apply_radio_snapshot(snapshot),
            Err(err) => tracing::debug!(%err, "radio status fetch skipped"),
        }
        match self.api.sys_info().await {
            Ok(info) => self.store.mutate(|s| {
                s.api_version = info.api_version;
                s.modem_version = info.modem_version;
                s.os_info = info.os_info;
                s.runtime_info = info.runtime_info;
            }),
            Err(err) => tracing::debug!(%err, "system info fetch skipped"),
        }
        match self.api.messages().await {
            Ok(blob) => self.store.mutate(|s| s.messages = blob),
            Err(err) => tracing::debug!(%err, "message list fetch skipped"),
        }
        match self.api.audio_devices().await {
            Ok(devices) => self.store.mutate(|s| s.audio_devices = devices),
            Err(err) => tracing::debug!(%err, "audio device enumeration skipped"),
        }
        match self.api.serial_devices().await {
            Ok(devices) => self.store.mutate(|s| s.serial_devices = devices),
            Err(err) => tracing::debug!(%err, "serial device enumeration skipped"),
        }
        self.store.mutate(|s| s.last_refresh = Some(Utc::now()));

        let health = overall_health(&self.store);
        tracing::debug!(health, "bulk refresh complete");
    }
}
