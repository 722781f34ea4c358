use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use riglink_core::api::{AudioDevice, SerialDevice};
use riglink_core::frames::ActivityRecord;
use riglink_core::ids::Callsign;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
}

/// Per-transfer metric series mirrored from the modem's statistics
/// payload. Replaced wholesale on every burst, never appended.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TransferHistograms {
    pub time: Vec<f64>,
    pub bpm: Vec<f64>,
    pub snr: Vec<f64>,
}

/// Everything the UI renders, written only by the projection engine.
///
/// Signal metrics default to NaN: a NaN on screen means the modem never
/// reported that reading, which is distinct from a zero reading.
#[derive(Clone, Debug, Serialize)]
pub struct ModemState {
    // Connection / runtime
    pub connection: ConnectionStatus,
    pub modem_busy: bool,
    pub channel_busy: bool,
    pub channel_busy_slots: Vec<bool>,
    pub codec_traffic: bool,
    pub modem_running: bool,
    pub beacon_running: bool,
    pub away_from_key: bool,
    pub ptt_active: bool,
    pub update_available: bool,

    // Signal metrics
    pub audio_dbfs: f64,
    pub audio_level_percent: f64,
    pub s_meter_db: f64,
    pub s_meter_percent: f64,
    pub swr_raw: f64,
    pub swr_percent: f64,
    pub rf_level: f64,
    pub frequency: f64,
    pub mode: String,
    pub tuner_active: bool,
    pub radio_present: bool,

    // Transfer session
    pub remote_station: Option<Callsign>,
    pub transfer_percent: f64,
    pub transfer_bytes: f64,
    pub histograms: TransferHistograms,
    pub speed_level: i64,
    pub receiving: bool,
    /// Bumped when a NEW transfer opens; keys the delayed counter reset.
    pub transfer_generation: u64,

    // Derived collections
    pub activities: Vec<(String, ActivityRecord)>,
    pub heard_stations: Vec<ActivityRecord>,
    pub scatter: Value,
    pub messages: Value,

    // Bulk-load extras
    pub api_version: String,
    pub modem_version: String,
    pub os_info: String,
    pub runtime_info: String,
    pub audio_devices: Vec<AudioDevice>,
    pub serial_devices: Vec<SerialDevice>,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Default for ModemState {
    fn default() -> Self {
        Self {
            connection: ConnectionStatus::Disconnected,
            modem_busy: false,
            channel_busy: false,
            channel_busy_slots: Vec::new(),
            codec_traffic: false,
            modem_running: false,
            beacon_running: false,
            away_from_key: false,
            ptt_active: false,
            update_available: false,
            audio_dbfs: f64::NAN,
            audio_level_percent: f64::NAN,
            s_meter_db: f64::NAN,
            s_meter_percent: f64::NAN,
            swr_raw: f64::NAN,
            swr_percent: f64::NAN,
            rf_level: f64::NAN,
            frequency: f64::NAN,
            mode: String::new(),
            tuner_active: false,
            radio_present: false,
            remote_station: None,
            transfer_percent: 0.0,
            transfer_bytes: 0.0,
            histograms: TransferHistograms::default(),
            speed_level: 0,
            receiving: false,
            transfer_generation: 0,
            activities: Vec::new(),
            heard_stations: Vec::new(),
            scatter: Value::Null,
            messages: Value::Null,
            api_version: String::new(),
            modem_version: String::new(),
            os_info: String::new(),
            runtime_info: String::new(),
            audio_devices: Vec::new(),
            serial_devices: Vec::new(),
            last_refresh: None,
        }
    }
}

impl ModemState {
    /// Set the transfer progress pair from reported byte counters.
    ///
    /// Invariant: percent and the byte counter are only ever written
    /// together. A zero or unreported total yields zero percent.
    pub fn set_transfer_progress(&mut self, received_bytes: f64, total_bytes: f64) {
        self.transfer_percent = if total_bytes > 0.0 {
            (received_bytes / total_bytes * 100.0).round()
        } else {
            0.0
        };
        self.transfer_bytes = received_bytes;
    }

    /// Zero the transfer progress pair.
    pub fn reset_transfer_counters(&mut self) {
        self.transfer_percent = 0.0;
        self.transfer_bytes = 0.0;
    }
}

/// Single-writer wrapper around [`ModemState`].
///
/// Mutations happen under the write lock and are published as snapshots
/// through a watch channel; the UI holds a receiver and re-renders on
/// change.
pub struct StateStore {
    state: RwLock<ModemState>,
    tx: watch::Sender<ModemState>,
}

impl StateStore {
    pub fn new() -> Self {
        let state = ModemState::default();
        let (tx, _) = watch::channel(state.clone());
        Self {
            state: RwLock::new(state),
            tx,
        }
    }

    /// Apply a mutation and publish the resulting snapshot.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut ModemState) -> R) -> R {
        let mut state = self.state.write();
        let out = f(&mut state);
        self.tx.send_replace(state.clone());
        out
    }

    /// Read without publishing.
    pub fn read<R>(&self, f: impl FnOnce(&ModemState) -> R) -> R {
        f(&self.state.read())
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> ModemState {
        self.state.read().clone()
    }

    /// Observe state snapshots as they are published.
    pub fn subscribe(&self) -> watch::Receiver<ModemState> {
        self.tx.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
