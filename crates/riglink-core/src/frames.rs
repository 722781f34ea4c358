//! Wire frames for the two modem channels.
//!
//! The modem delivers JSON text over two WebSocket channels: a `state`
//! channel carrying periodic modem/radio snapshots and an `event` channel
//! carrying everything else. Both are decoded exactly once at the
//! boundary into the tagged types below; routing downstream is a plain
//! match over variants. `EventFrame::classify` encodes the fixed
//! precedence order of the event channel: first match wins, one category
//! per message.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::Callsign;

fn nan() -> f64 {
    f64::NAN
}

// ─── State channel ──────────────────────────────────────────────────────

/// One message on the state channel.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StateMessage {
    #[serde(rename = "state-change", alias = "state")]
    State(StateSnapshot),
    #[serde(rename = "radio-change", alias = "radio")]
    Radio(RadioSnapshot),
    /// Any other type label; dropped by the dispatcher.
    #[serde(other)]
    Other,
}

/// Periodic modem state snapshot.
///
/// Missing numeric fields decode to NaN and flow through to the derived
/// state unchanged; missing flags decode to false.
#[derive(Clone, Debug, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub is_modem_busy: bool,
    #[serde(default)]
    pub channel_busy: bool,
    #[serde(default)]
    pub channel_busy_slot: Vec<bool>,
    #[serde(default)]
    pub is_codec2_traffic: bool,
    #[serde(default)]
    pub is_modem_running: bool,
    #[serde(default = "nan")]
    pub audio_dbfs: f64,
    #[serde(default)]
    pub radio_status: bool,
    #[serde(default)]
    pub is_beacon_running: bool,
    #[serde(default)]
    pub is_away_from_key: bool,
    /// Keyed activity log; insertion order is meaningful and preserved.
    #[serde(default)]
    pub activities: IndexMap<String, ActivityRecord>,
}

/// Periodic radio snapshot.
#[derive(Clone, Debug, Deserialize)]
pub struct RadioSnapshot {
    #[serde(default = "nan")]
    pub s_meter_strength: f64,
    #[serde(default)]
    pub radio_status: bool,
    #[serde(default = "nan")]
    pub radio_frequency: f64,
    #[serde(default)]
    pub radio_mode: String,
    #[serde(default = "nan")]
    pub radio_swr: f64,
    #[serde(default)]
    pub radio_tuner: bool,
    #[serde(default = "nan")]
    pub radio_rf_level: f64,
}

/// One entry of the modem's activity log. Immutable once received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub direction: ActivityDirection,
    #[serde(default)]
    pub origin: Option<Callsign>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default = "nan")]
    pub snr: f64,
    #[serde(default, rename = "activity_type")]
    pub activity_kind: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityDirection {
    Sent,
    Received,
}

// ─── Event channel ──────────────────────────────────────────────────────

/// One classified message from the event channel.
#[derive(Clone, Debug)]
pub enum EventFrame {
    /// Scatter-plot payload, stored verbatim.
    Scatter(Value),
    /// The modem's message database changed; refetch the list.
    MessageDbChanged,
    /// PTT line state, including explicit false.
    Ptt(bool),
    /// Modem lifecycle transition.
    Modem(ModemLifecycle),
    /// Server greeting after the connection is established.
    HelloClient,
    /// Broadcast frame heard on the channel (CQ, PING, ...).
    FrameHandler(FrameHandlerFrame),
    /// ARQ transfer progress, at most one payload per direction.
    Arq(ArqFrame),
    /// Matched no known shape; dropped by the dispatcher.
    Unrecognized(Value),
}

impl EventFrame {
    /// Classify a parsed event message.
    ///
    /// Probes fields in the channel's fixed precedence order: `scatter`,
    /// `message-db`, `ptt`, `modem`, then the `type` discriminator.
    /// A field that is present but carries an unknown value falls through
    /// to the next probe, matching the channel's documented behavior.
    pub fn classify(value: Value) -> Self {
        if let Some(scatter) = value.get("scatter") {
            // The scatter payload arrives double-encoded as a JSON string.
            let decoded = match scatter {
                Value::String(raw) => {
                    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
                }
                other => other.clone(),
            };
            return Self::Scatter(decoded);
        }

        if value.get("message-db").and_then(Value::as_str) == Some("changed") {
            return Self::MessageDbChanged;
        }

        if let Some(ptt) = value.get("ptt").and_then(Value::as_bool) {
            return Self::Ptt(ptt);
        }

        if let Some(lifecycle) = value
            .get("modem")
            .and_then(Value::as_str)
            .and_then(ModemLifecycle::from_label)
        {
            return Self::Modem(lifecycle);
        }

        let type_label = value
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned);
        match type_label.as_deref() {
            Some("hello-client") => Self::HelloClient,
            Some("frame-handler") => match serde_json::from_value(value.clone()) {
                Ok(frame) => Self::FrameHandler(frame),
                Err(_) => Self::Unrecognized(value),
            },
            Some("arq") => match serde_json::from_value(value.clone()) {
                Ok(frame) => Self::Arq(frame),
                Err(_) => Self::Unrecognized(value),
            },
            _ => Self::Unrecognized(value),
        }
    }
}

/// Modem lifecycle transitions reported on the event channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModemLifecycle {
    Started,
    Stopped,
    Restarted,
    Failed,
}

impl ModemLifecycle {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "started" => Some(Self::Started),
            "stopped" => Some(Self::Stopped),
            "restarted" => Some(Self::Restarted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A broadcast frame heard on the channel.
#[derive(Clone, Debug, Deserialize)]
pub struct FrameHandlerFrame {
    /// Raw sub-event label; see [`FrameHandlerFrame::kind`].
    pub received: String,
    #[serde(default)]
    pub dxcallsign: Callsign,
    #[serde(default = "nan")]
    pub snr: f64,
    #[serde(default)]
    pub gridsquare: String,
}

impl FrameHandlerFrame {
    /// Parse the sub-event label; unknown labels yield `None` and are
    /// dropped by the dispatcher.
    pub fn kind(&self) -> Option<FrameHandlerKind> {
        FrameHandlerKind::from_label(&self.received)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameHandlerKind {
    Cq,
    Qrv,
    Ping,
    PingAck,
}

impl FrameHandlerKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "CQ" => Some(Self::Cq),
            "QRV" => Some(Self::Qrv),
            "PING" => Some(Self::Ping),
            "PING_ACK" => Some(Self::PingAck),
            _ => None,
        }
    }
}

/// ARQ event payload. A single event may carry either direction, both,
/// or neither; the projector evaluates outbound first.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ArqFrame {
    #[serde(default, rename = "arq-transfer-outbound")]
    pub outbound: Option<ArqTransfer>,
    #[serde(default, rename = "arq-transfer-inbound")]
    pub inbound: Option<ArqTransfer>,
}

/// Reported state of one transfer session. The modem drives the
/// protocol; this is a mirror of what it tells us.
#[derive(Clone, Debug, Deserialize)]
pub struct ArqTransfer {
    #[serde(default)]
    pub session_id: u32,
    #[serde(default, rename = "dxcall")]
    pub remote: Callsign,
    /// Raw state label; parsed per direction by the projector.
    pub state: String,
    #[serde(default)]
    pub received_bytes: f64,
    #[serde(default)]
    pub total_bytes: f64,
    #[serde(default)]
    pub statistics: ArqStatistics,
    #[serde(default)]
    pub speed_level: i64,
}

/// Per-transfer metric series, replaced wholesale on every burst.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArqStatistics {
    #[serde(default)]
    pub time_histogram: Vec<f64>,
    #[serde(default)]
    pub bpm_histogram: Vec<f64>,
    #[serde(default)]
    pub snr_histogram: Vec<f64>,
}

/// Outbound transfer session states, in protocol order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutboundTransferState {
    New,
    OpenSent,
    InfoSent,
    BurstSent,
    Aborting,
    Aborted,
    Ended,
    Failed,
}

impl OutboundTransferState {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "NEW" => Some(Self::New),
            "OPEN_SENT" => Some(Self::OpenSent),
            "INFO_SENT" => Some(Self::InfoSent),
            "BURST_SENT" => Some(Self::BurstSent),
            "ABORTING" => Some(Self::Aborting),
            "ABORTED" => Some(Self::Aborted),
            "ENDED" => Some(Self::Ended),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Inbound transfer session states. The label set overlaps the outbound
/// one but is not identical, so the two enums stay separate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InboundTransferState {
    New,
    OpenAckSent,
    InfoAckSent,
    BurstReplySent,
    Ended,
    Aborted,
    Failed,
}

impl InboundTransferState {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "NEW" => Some(Self::New),
            "OPEN_ACK_SENT" => Some(Self::OpenAckSent),
            "INFO_ACK_SENT" => Some(Self::InfoAckSent),
            "BURST_REPLY_SENT" => Some(Self::BurstReplySent),
            "ENDED" => Some(Self::Ended),
            "ABORTED" => Some(Self::Aborted),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_message_accepts_both_type_labels() {
        for label in ["state-change", "state"] {
            let msg: StateMessage =
                serde_json::from_value(json!({"type": label, "audio_dbfs": -20.0})).unwrap();
            assert!(matches!(msg, StateMessage::State(_)), "label {label}");
        }
        for label in ["radio-change", "radio"] {
            let msg: StateMessage =
                serde_json::from_value(json!({"type": label, "radio_swr": 1.0})).unwrap();
            assert!(matches!(msg, StateMessage::Radio(_)), "label {label}");
        }
    }

    #[test]
    fn state_message_unknown_type_is_other() {
        let msg: StateMessage = serde_json::from_value(json!({"type": "fft"})).unwrap();
        assert!(matches!(msg, StateMessage::Other));
    }

    #[test]
    fn state_snapshot_missing_numeric_decodes_to_nan() {
        let msg: StateMessage = serde_json::from_value(json!({"type": "state"})).unwrap();
        let StateMessage::State(snap) = msg else {
            panic!("expected state snapshot");
        };
        assert!(snap.audio_dbfs.is_nan());
        assert!(!snap.is_modem_running);
    }

    #[test]
    fn activities_preserve_insertion_order() {
        let raw = r#"{
            "type": "state",
            "activities": {
                "a1": {"direction": "received", "origin": "DJ2LS-0", "timestamp": 1},
                "a2": {"direction": "sent", "timestamp": 2},
                "a3": {"direction": "received", "origin": "AA0AA", "timestamp": 3}
            }
        }"#;
        let msg: StateMessage = serde_json::from_str(raw).unwrap();
        let StateMessage::State(snap) = msg else {
            panic!("expected state snapshot");
        };
        let keys: Vec<&str> = snap.activities.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a1", "a2", "a3"]);
    }

    #[test]
    fn classify_scatter_wins_over_ptt() {
        let frame = EventFrame::classify(json!({"scatter": "[1, 2]", "ptt": true}));
        let EventFrame::Scatter(blob) = frame else {
            panic!("scatter must take precedence");
        };
        assert_eq!(blob, json!([1, 2]));
    }

    #[test]
    fn classify_scatter_decodes_double_encoded_payload() {
        let frame = EventFrame::classify(json!({"scatter": "{\"points\": [0.5]}"}));
        let EventFrame::Scatter(blob) = frame else {
            panic!("expected scatter");
        };
        assert_eq!(blob, json!({"points": [0.5]}));
    }

    #[test]
    fn classify_message_db_changed() {
        assert!(matches!(
            EventFrame::classify(json!({"message-db": "changed"})),
            EventFrame::MessageDbChanged
        ));
        // Any other value falls through to unrecognized.
        assert!(matches!(
            EventFrame::classify(json!({"message-db": "stale"})),
            EventFrame::Unrecognized(_)
        ));
    }

    #[test]
    fn classify_ptt_includes_explicit_false() {
        assert!(matches!(
            EventFrame::classify(json!({"ptt": false})),
            EventFrame::Ptt(false)
        ));
        assert!(matches!(
            EventFrame::classify(json!({"ptt": true})),
            EventFrame::Ptt(true)
        ));
    }

    #[test]
    fn classify_modem_lifecycle_labels() {
        assert!(matches!(
            EventFrame::classify(json!({"modem": "started"})),
            EventFrame::Modem(ModemLifecycle::Started)
        ));
        assert!(matches!(
            EventFrame::classify(json!({"modem": "failed"})),
            EventFrame::Modem(ModemLifecycle::Failed)
        ));
    }

    #[test]
    fn classify_unknown_modem_label_falls_through_to_type() {
        let frame = EventFrame::classify(json!({"modem": "sleeping", "type": "hello-client"}));
        assert!(matches!(frame, EventFrame::HelloClient));
    }

    #[test]
    fn classify_frame_handler() {
        let frame = EventFrame::classify(json!({
            "type": "frame-handler",
            "received": "CQ",
            "dxcallsign": "DJ2LS-0",
            "snr": 5.5,
            "gridsquare": "JN48"
        }));
        let EventFrame::FrameHandler(fh) = frame else {
            panic!("expected frame-handler");
        };
        assert_eq!(fh.kind(), Some(FrameHandlerKind::Cq));
        assert_eq!(fh.dxcallsign.as_str(), "DJ2LS-0");
        assert_eq!(fh.gridsquare, "JN48");
    }

    #[test]
    fn frame_handler_unknown_sub_label_has_no_kind() {
        let fh = FrameHandlerFrame {
            received: "BEACON".into(),
            dxcallsign: Callsign::default(),
            snr: f64::NAN,
            gridsquare: String::new(),
        };
        assert_eq!(fh.kind(), None);
    }

    #[test]
    fn classify_arq_with_both_directions() {
        let frame = EventFrame::classify(json!({
            "type": "arq",
            "arq-transfer-outbound": {"session_id": 1, "dxcall": "AA0AA", "state": "BURST_SENT"},
            "arq-transfer-inbound": {"session_id": 2, "dxcall": "DJ2LS-0", "state": "NEW"}
        }));
        let EventFrame::Arq(arq) = frame else {
            panic!("expected arq");
        };
        assert_eq!(arq.outbound.unwrap().session_id, 1);
        assert_eq!(arq.inbound.unwrap().remote.as_str(), "DJ2LS-0");
    }

    #[test]
    fn arq_transfer_defaults_byte_counters_to_zero() {
        let transfer: ArqTransfer =
            serde_json::from_value(json!({"state": "NEW", "dxcall": "AA0AA"})).unwrap();
        assert_eq!(transfer.received_bytes, 0.0);
        assert_eq!(transfer.total_bytes, 0.0);
        assert_eq!(transfer.statistics, ArqStatistics::default());
    }

    #[test]
    fn classify_unrecognized_shapes() {
        assert!(matches!(
            EventFrame::classify(json!({"type": "mystery"})),
            EventFrame::Unrecognized(_)
        ));
        assert!(matches!(
            EventFrame::classify(json!({})),
            EventFrame::Unrecognized(_)
        ));
    }

    #[test]
    fn transfer_state_labels_parse_per_direction() {
        assert_eq!(
            OutboundTransferState::from_label("OPEN_SENT"),
            Some(OutboundTransferState::OpenSent)
        );
        assert_eq!(
            InboundTransferState::from_label("OPEN_ACK_SENT"),
            Some(InboundTransferState::OpenAckSent)
        );
        // Labels from the other direction's set do not cross over.
        assert_eq!(OutboundTransferState::from_label("OPEN_ACK_SENT"), None);
        assert_eq!(InboundTransferState::from_label("BURST_SENT"), None);
        assert_eq!(OutboundTransferState::from_label("WARMING_UP"), None);
    }
}
