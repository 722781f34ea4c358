//! Projector for ARQ transfer session events.
//!
//! The modem runs the ARQ protocol; this module only mirrors the session
//! state it reports. One shared set of progress counters backs both
//! directions: the modem never runs more than one session per direction,
//! and in practice not more than one at a time.

use riglink_core::frames::{
    ArqFrame, ArqTransfer, InboundTransferState, OutboundTransferState,
};
use riglink_core::notify::{icon, Severity, TOAST_LONG, TOAST_SHORT};
use riglink_state::TransferHistograms;

use crate::ProjectionEngine;

impl ProjectionEngine {
    /// Apply one ARQ event. Outbound is evaluated before inbound, so
    /// when an event carries both payloads the `receiving` flag ends up
    /// reflecting the inbound one.
    pub(crate) fn apply_arq_event(&self, frame: ArqFrame) {
        if let Some(outbound) = frame.outbound {
            self.apply_outbound_transfer(outbound);
        }
        if let Some(inbound) = frame.inbound {
            self.apply_inbound_transfer(inbound);
        }
    }

    fn apply_outbound_transfer(&self, transfer: ArqTransfer) {
        self.store.mutate(|s| s.receiving = false);

        let Some(state) = OutboundTransferState::from_label(&transfer.state) else {
            tracing::trace!(label = %transfer.state, "unrecognized outbound transfer state dropped");
            return;
        };

        match state {
            OutboundTransferState::New => {
                self.notify(
                    Severity::Success,
                    icon::CHECK_CIRCLE,
                    format!(
                        "New transmission with {} (session {}, {} bytes total)",
                        transfer.remote, transfer.session_id, transfer.total_bytes
                    ),
                    TOAST_LONG,
                );
                self.store.mutate(|s| {
                    s.remote_station = Some(transfer.remote.clone());
                    s.reset_transfer_counters();
                    s.transfer_generation += 1;
                });
            }
            OutboundTransferState::OpenSent => {
                // No counter update here; usable byte counts only exist
                // this early on the acknowledging side.
                self.notify(
                    Severity::Info,
                    icon::CHECK_CIRCLE,
                    format!(
                        "Opening transmission with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_LONG,
                );
            }
            OutboundTransferState::InfoSent => {
                tracing::debug!(
                    session_id = transfer.session_id,
                    "INFO_SENT carries no projection yet"
                );
            }
            OutboundTransferState::BurstSent => {
                self.notify(
                    Severity::Info,
                    icon::INFO_CIRCLE,
                    format!(
                        "Ongoing transmission with {} ({} of {} bytes)",
                        transfer.remote, transfer.received_bytes, transfer.total_bytes
                    ),
                    TOAST_SHORT,
                );
                self.apply_burst_statistics(&transfer);
            }
            OutboundTransferState::Aborting => {
                tracing::debug!(
                    session_id = transfer.session_id,
                    "ABORTING carries no projection yet"
                );
            }
            OutboundTransferState::Aborted => {
                self.notify(
                    Severity::Danger,
                    icon::EXCLAMATION_TRIANGLE,
                    format!(
                        "Transmission aborted with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_SHORT,
                );
                self.store.mutate(|s| s.reset_transfer_counters());
            }
            OutboundTransferState::Ended => {
                self.notify(
                    Severity::Success,
                    icon::INFO_CIRCLE,
                    format!(
                        "Transmission ended with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_SHORT,
                );
                self.store.mutate(|s| {
                    s.set_transfer_progress(transfer.received_bytes, transfer.total_bytes)
                });
                self.schedule_transfer_reset();
            }
            OutboundTransferState::Failed => {
                self.notify(
                    Severity::Danger,
                    icon::X_OCTAGON,
                    format!(
                        "Transmission failed with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_SHORT,
                );
                // Unlike ENDED, the counters keep their last value until
                // the delayed reset clears them.
                self.schedule_transfer_reset();
            }
        }
    }

    fn apply_inbound_transfer(&self, transfer: ArqTransfer) {
        self.store.mutate(|s| s.receiving = true);

        let Some(state) = InboundTransferState::from_label(&transfer.state) else {
            tracing::trace!(label = %transfer.state, "unrecognized inbound transfer state dropped");
            return;
        };

        match state {
            InboundTransferState::New => {
                self.notify(
                    Severity::Info,
                    icon::INFO_CIRCLE,
                    format!(
                        "New transmission with {} (session {}, {} bytes total)",
                        transfer.remote, transfer.session_id, transfer.total_bytes
                    ),
                    TOAST_LONG,
                );
                self.store.mutate(|s| {
                    s.remote_station = Some(transfer.remote.clone());
                    s.reset_transfer_counters();
                    s.transfer_generation += 1;
                });
            }
            InboundTransferState::OpenAckSent => {
                self.notify(
                    Severity::Info,
                    icon::TRANSFER,
                    format!(
                        "Confirming transmission with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_SHORT,
                );
                self.store.mutate(|s| {
                    s.set_transfer_progress(transfer.received_bytes, transfer.total_bytes)
                });
            }
            InboundTransferState::InfoAckSent => {
                self.notify(
                    Severity::Info,
                    icon::INFO_CIRCLE,
                    format!(
                        "Opening transmission with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_SHORT,
                );
                self.store.mutate(|s| {
                    s.set_transfer_progress(transfer.received_bytes, transfer.total_bytes)
                });
            }
            InboundTransferState::BurstReplySent => {
                self.notify(
                    Severity::Info,
                    icon::INFO_CIRCLE,
                    format!(
                        "Ongoing transmission with {} ({} of {} bytes)",
                        transfer.remote, transfer.received_bytes, transfer.total_bytes
                    ),
                    TOAST_SHORT,
                );
                self.apply_burst_statistics(&transfer);
            }
            InboundTransferState::Ended => {
                self.notify(
                    Severity::Info,
                    icon::INFO_CIRCLE,
                    format!(
                        "Transmission ended with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_SHORT,
                );
                self.store.mutate(|s| {
                    s.set_transfer_progress(transfer.received_bytes, transfer.total_bytes)
                });
                self.schedule_transfer_reset();
            }
            InboundTransferState::Aborted => {
                // Counters deliberately keep their pre-event values; only
                // the outbound side zeroes on abort.
                self.notify(
                    Severity::Danger,
                    icon::X_OCTAGON,
                    format!(
                        "Transmission aborted with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_SHORT,
                );
            }
            InboundTransferState::Failed => {
                self.notify(
                    Severity::Danger,
                    icon::X_OCTAGON,
                    format!(
                        "Transmission failed with {} (session {})",
                        transfer.remote, transfer.session_id
                    ),
                    TOAST_SHORT,
                );
                self.schedule_transfer_reset();
            }
        }
    }

    /// Burst progress: counters, metric series, and speed tier. The
    /// histogram series replace the previous ones outright.
    fn apply_burst_statistics(&self, transfer: &ArqTransfer) {
        self.store.mutate(|s| {
            s.set_transfer_progress(transfer.received_bytes, transfer.total_bytes);
            s.histograms = TransferHistograms {
                time: transfer.statistics.time_histogram.clone(),
                bpm: transfer.statistics.bpm_histogram.clone(),
                snr: transfer.statistics.snr_histogram.clone(),
            };
            s.speed_level = transfer.speed_level;
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use riglink_client::mock::MockModemApi;
    use riglink_core::frames::EventFrame;
    use riglink_core::ids::Callsign;
    use riglink_core::notify::{NotificationHub, Severity};
    use riglink_state::StateStore;
    use serde_json::json;
    use tokio::sync::broadcast;

    use super::*;

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(
            Arc::new(StateStore::new()),
            NotificationHub::new(16),
            Arc::new(MockModemApi::default()),
        )
    }

    fn arq_frame(value: serde_json::Value) -> ArqFrame {
        match EventFrame::classify(value) {
            EventFrame::Arq(frame) => frame,
            other => panic!("expected arq frame, got {other:?}"),
        }
    }

    fn outbound(state: &str, received: f64, total: f64) -> ArqFrame {
        arq_frame(json!({
            "type": "arq",
            "arq-transfer-outbound": {
                "session_id": 7,
                "dxcall": "DJ2LS-0",
                "state": state,
                "received_bytes": received,
                "total_bytes": total
            }
        }))
    }

    fn inbound(state: &str, received: f64, total: f64) -> ArqFrame {
        arq_frame(json!({
            "type": "arq",
            "arq-transfer-inbound": {
                "session_id": 9,
                "dxcall": "AA0AA",
                "state": state,
                "received_bytes": received,
                "total_bytes": total
            }
        }))
    }

    fn drain(rx: &mut broadcast::Receiver<riglink_core::notify::Notification>) -> Vec<Severity> {
        let mut out = Vec::new();
        while let Ok(n) = rx.try_recv() {
            out.push(n.severity);
        }
        out
    }

    #[tokio::test]
    async fn new_outbound_resets_counters_and_records_station() {
        let engine = engine();
        engine
            .store()
            .mutate(|s| s.set_transfer_progress(300.0, 600.0));
        let mut rx = engine.notifier().subscribe();

        engine.apply_arq_event(outbound("NEW", 0.0, 500.0));

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 0.0);
        assert_eq!(state.transfer_bytes, 0.0);
        assert_eq!(state.remote_station, Some(Callsign::from_raw("DJ2LS-0")));
        assert_eq!(state.transfer_generation, 1);
        assert!(!state.receiving);
        assert_eq!(drain(&mut rx), [Severity::Success]);
    }

    #[tokio::test]
    async fn open_sent_notifies_without_touching_counters() {
        let engine = engine();
        engine
            .store()
            .mutate(|s| s.set_transfer_progress(100.0, 400.0));
        let mut rx = engine.notifier().subscribe();

        engine.apply_arq_event(outbound("OPEN_SENT", 250.0, 500.0));

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 25.0);
        assert_eq!(state.transfer_bytes, 100.0);
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn open_ack_sent_updates_counters() {
        let engine = engine();

        engine.apply_arq_event(inbound("OPEN_ACK_SENT", 250.0, 500.0));

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 50.0);
        assert_eq!(state.transfer_bytes, 250.0);
        assert!(state.receiving);
    }

    #[tokio::test]
    async fn info_sent_is_a_silent_no_op() {
        let engine = engine();
        let mut rx = engine.notifier().subscribe();
        let before = engine.store().snapshot();

        engine.apply_arq_event(outbound("INFO_SENT", 250.0, 500.0));

        let after = engine.store().snapshot();
        assert_eq!(after.transfer_percent, before.transfer_percent);
        assert_eq!(after.transfer_bytes, before.transfer_bytes);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn burst_sent_copies_histograms_and_speed_level() {
        let engine = engine();
        let frame = arq_frame(json!({
            "type": "arq",
            "arq-transfer-outbound": {
                "session_id": 7,
                "dxcall": "DJ2LS-0",
                "state": "BURST_SENT",
                "received_bytes": 250.0,
                "total_bytes": 500.0,
                "speed_level": 2,
                "statistics": {
                    "time_histogram": [1.0, 2.0],
                    "bpm_histogram": [120.0, 180.0],
                    "snr_histogram": [3.5, 4.0]
                }
            }
        }));

        engine.apply_arq_event(frame);

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 50.0);
        assert_eq!(state.histograms.time, [1.0, 2.0]);
        assert_eq!(state.histograms.bpm, [120.0, 180.0]);
        assert_eq!(state.histograms.snr, [3.5, 4.0]);
        assert_eq!(state.speed_level, 2);
    }

    #[tokio::test]
    async fn outbound_aborted_zeroes_counters_immediately() {
        let engine = engine();
        engine
            .store()
            .mutate(|s| s.set_transfer_progress(250.0, 500.0));
        let mut rx = engine.notifier().subscribe();

        engine.apply_arq_event(outbound("ABORTED", 250.0, 500.0));

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 0.0);
        assert_eq!(state.transfer_bytes, 0.0);
        assert_eq!(drain(&mut rx), [Severity::Danger]);
    }

    #[tokio::test]
    async fn inbound_aborted_leaves_counters_untouched() {
        let engine = engine();
        engine
            .store()
            .mutate(|s| s.set_transfer_progress(250.0, 500.0));
        let mut rx = engine.notifier().subscribe();

        engine.apply_arq_event(inbound("ABORTED", 250.0, 500.0));

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 50.0);
        assert_eq!(state.transfer_bytes, 250.0);
        assert_eq!(drain(&mut rx), [Severity::Danger]);
    }

    #[tokio::test(start_paused = true)]
    async fn ended_shows_completion_then_resets_after_delay() {
        let engine = engine();

        engine.apply_arq_event(outbound("ENDED", 500.0, 500.0));

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 100.0);
        assert_eq!(state.transfer_bytes, 500.0);

        tokio::time::sleep(crate::TRANSFER_RESET_DELAY + Duration::from_millis(100)).await;

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 0.0);
        assert_eq!(state.transfer_bytes, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_resets_after_delay_without_updating_first() {
        let engine = engine();
        engine
            .store()
            .mutate(|s| s.set_transfer_progress(100.0, 1000.0));

        engine.apply_arq_event(inbound("FAILED", 400.0, 500.0));

        // Counters keep their pre-event values through the delay window.
        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 10.0);
        assert_eq!(state.transfer_bytes, 100.0);

        tokio::time::sleep(crate::TRANSFER_RESET_DELAY + Duration::from_millis(100)).await;

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 0.0);
        assert_eq!(state.transfer_bytes, 0.0);
    }

    #[tokio::test]
    async fn unknown_state_label_is_a_no_op() {
        let engine = engine();
        let mut rx = engine.notifier().subscribe();
        engine
            .store()
            .mutate(|s| s.set_transfer_progress(250.0, 500.0));

        engine.apply_arq_event(outbound("WARMING_UP", 0.0, 0.0));

        let state = engine.store().snapshot();
        assert_eq!(state.transfer_percent, 50.0);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn both_directions_leave_receiving_true() {
        let engine = engine();
        let frame = arq_frame(json!({
            "type": "arq",
            "arq-transfer-outbound": {
                "session_id": 7, "dxcall": "DJ2LS-0", "state": "BURST_SENT",
                "received_bytes": 100.0, "total_bytes": 500.0
            },
            "arq-transfer-inbound": {
                "session_id": 9, "dxcall": "AA0AA", "state": "BURST_REPLY_SENT",
                "received_bytes": 200.0, "total_bytes": 400.0
            }
        }));

        engine.apply_arq_event(frame);

        let state = engine.store().snapshot();
        // Outbound ran first; inbound won the flag and the counters.
        assert!(state.receiving);
        assert_eq!(state.transfer_percent, 50.0);
        assert_eq!(state.transfer_bytes, 200.0);
    }
}
