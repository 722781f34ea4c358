//! Canned `ModemApi` for deterministic tests without a live modem.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use riglink_core::api::{ApiError, AudioDevice, ModemApi, SerialDevice, SysInfo};
use riglink_core::frames::{RadioSnapshot, StateSnapshot};

/// Per-endpoint call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    modem_state: AtomicUsize,
    radio_status: AtomicUsize,
    sys_info: AtomicUsize,
    messages: AtomicUsize,
    audio_devices: AtomicUsize,
    serial_devices: AtomicUsize,
}

impl CallCounts {
    pub fn modem_state(&self) -> usize {
        self.modem_state.load(Ordering::Relaxed)
    }

    pub fn radio_status(&self) -> usize {
        self.radio_status.load(Ordering::Relaxed)
    }

    pub fn sys_info(&self) -> usize {
        self.sys_info.load(Ordering::Relaxed)
    }

    pub fn messages(&self) -> usize {
        self.messages.load(Ordering::Relaxed)
    }

    pub fn audio_devices(&self) -> usize {
        self.audio_devices.load(Ordering::Relaxed)
    }

    pub fn serial_devices(&self) -> usize {
        self.serial_devices.load(Ordering::Relaxed)
    }
}

/// Mock api with pre-programmed responses. Snapshot endpoints return an
/// error until a canned value is set, mirroring an unreachable modem.
#[derive(Default)]
pub struct MockModemApi {
    pub state: Mutex<Option<StateSnapshot>>,
    pub radio: Mutex<Option<RadioSnapshot>>,
    pub info: Mutex<Option<SysInfo>>,
    pub message_blob: Mutex<Value>,
    pub audio: Mutex<Vec<AudioDevice>>,
    pub serial: Mutex<Vec<SerialDevice>>,
    pub calls: CallCounts,
}

fn unavailable(what: &str) -> ApiError {
    ApiError::Transport(format!("mock: no canned {what}"))
}

#[async_trait]
impl ModemApi for MockModemApi {
    async fn modem_state(&self) -> Result<StateSnapshot, ApiError> {
        self.calls.modem_state.fetch_add(1, Ordering::Relaxed);
        self.state
            .lock()
            .clone()
            .ok_or_else(|| unavailable("modem state"))
    }

    async fn radio_status(&self) -> Result<RadioSnapshot, ApiError> {
        self.calls.radio_status.fetch_add(1, Ordering::Relaxed);
        self.radio
            .lock()
            .clone()
            .ok_or_else(|| unavailable("radio status"))
    }

    async fn sys_info(&self) -> Result<SysInfo, ApiError> {
        self.calls.sys_info.fetch_add(1, Ordering::Relaxed);
        self.info
            .lock()
            .clone()
            .ok_or_else(|| unavailable("system info"))
    }

    async fn messages(&self) -> Result<Value, ApiError> {
        self.calls.messages.fetch_add(1, Ordering::Relaxed);
        Ok(self.message_blob.lock().clone())
    }

    async fn audio_devices(&self) -> Result<Vec<AudioDevice>, ApiError> {
        self.calls.audio_devices.fetch_add(1, Ordering::Relaxed);
        Ok(self.audio.lock().clone())
    }

    async fn serial_devices(&self) -> Result<Vec<SerialDevice>, ApiError> {
        self.calls.serial_devices.fetch_add(1, Ordering::Relaxed);
        Ok(self.serial.lock().clone())
    }
}
