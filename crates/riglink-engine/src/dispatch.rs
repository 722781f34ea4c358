//! Top-level routing for both inbound channels.
//!
//! Classification happens once at the boundary (`EventFrame::classify`);
//! from there routing is a match, so exactly one category is processed
//! per message. Unparsable text is the only error; everything else
//! either projects or drops with a diagnostic.

use riglink_core::errors::DispatchError;
use riglink_core::frames::{
    EventFrame, FrameHandlerFrame, FrameHandlerKind, ModemLifecycle, StateMessage,
};
use riglink_core::notify::{icon, Severity, TOAST_SHORT};
use riglink_state::ConnectionStatus;

use crate::ProjectionEngine;

impl ProjectionEngine {
    /// Route one message from the state channel.
    pub fn dispatch_state(&self, raw: &str) -> Result<(), DispatchError> {
        match serde_json::from_str(raw)? {
            StateMessage::State(snapshot) => self.apply_state_snapshot(snapshot),
            StateMessage::Radio(snapshot) => self.apply_radio_snapshot(snapshot),
            StateMessage::Other => tracing::trace!("unrecognized state message dropped"),
        }
        Ok(())
    }

    /// Route one message from the event channel.
    pub async fn dispatch_event(&self, raw: &str) -> Result<(), DispatchError> {
        let value = serde_json::from_str(raw)?;
        match EventFrame::classify(value) {
            EventFrame::Scatter(blob) => self.store.mutate(|s| s.scatter = blob),
            EventFrame::MessageDbChanged => self.refresh_messages().await,
            EventFrame::Ptt(active) => self.store.mutate(|s| s.ptt_active = active),
            EventFrame::Modem(lifecycle) => self.apply_modem_lifecycle(lifecycle).await,
            EventFrame::HelloClient => self.apply_hello_client().await,
            EventFrame::FrameHandler(frame) => self.apply_frame_handler(frame),
            EventFrame::Arq(frame) => self.apply_arq_event(frame),
            EventFrame::Unrecognized(value) => {
                tracing::trace!(message = %value, "unrecognized event message dropped");
            }
        }
        Ok(())
    }

    async fn refresh_messages(&self) {
        tracing::debug!("message database changed, refetching");
        match self.api.messages().await {
            Ok(blob) => self.store.mutate(|s| s.messages = blob),
            Err(err) => tracing::debug!(%err, "message list fetch skipped"),
        }
    }

    async fn apply_modem_lifecycle(&self, lifecycle: ModemLifecycle) {
        match lifecycle {
            ModemLifecycle::Started => {
                self.notify(
                    Severity::Success,
                    icon::TRANSFER,
                    "Modem started".into(),
                    TOAST_SHORT,
                );
                self.load_all_data().await;
            }
            ModemLifecycle::Stopped => {
                self.notify(
                    Severity::Warning,
                    icon::TRANSFER,
                    "Modem stopped".into(),
                    TOAST_SHORT,
                );
            }
            ModemLifecycle::Restarted => {
                self.notify(
                    Severity::Secondary,
                    icon::REBOOT,
                    "Modem restarted".into(),
                    TOAST_SHORT,
                );
                self.load_all_data().await;
            }
            ModemLifecycle::Failed => {
                self.notify(
                    Severity::Danger,
                    icon::REBOOT,
                    "Modem startup failed, check the configuration".into(),
                    TOAST_SHORT,
                );
            }
        }
    }

    async fn apply_hello_client(&self) {
        self.notify(
            Severity::Success,
            icon::ETHERNET,
            "Connected to server".into(),
            TOAST_SHORT,
        );
        self.store
            .mutate(|s| s.connection = ConnectionStatus::Connected);
        self.load_all_data().await;
    }

    fn apply_frame_handler(&self, frame: FrameHandlerFrame) {
        let Some(kind) = frame.kind() else {
            tracing::debug!(label = %frame.received, "unrecognized frame-handler sub-event dropped");
            return;
        };
        let (severity, icon, body) = match kind {
            FrameHandlerKind::Cq => (
                Severity::Info,
                icon::INFO_CIRCLE,
                format!(
                    "CQ received from {} (SNR {}, grid {})",
                    frame.dxcallsign, frame.snr, frame.gridsquare
                ),
            ),
            FrameHandlerKind::Qrv => (
                Severity::Info,
                icon::INFO_CIRCLE,
                format!(
                    "QRV received from {} (SNR {}, grid {})",
                    frame.dxcallsign, frame.snr, frame.gridsquare
                ),
            ),
            FrameHandlerKind::Ping => (
                Severity::Warning,
                icon::EXCLAMATION_CIRCLE,
                format!("PING received from {} (SNR {})", frame.dxcallsign, frame.snr),
            ),
            FrameHandlerKind::PingAck => (
                Severity::Success,
                icon::CHECK_CIRCLE,
                format!(
                    "PING_ACK received from {} (SNR {}, grid {})",
                    frame.dxcallsign, frame.snr, frame.gridsquare
                ),
            ),
        };
        self.notify(severity, icon, body, TOAST_SHORT);
    }
}
