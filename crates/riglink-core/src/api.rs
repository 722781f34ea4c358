//! The `ModemApi` collaborator trait.
//!
//! The modem exposes a REST surface next to its WebSocket channels; the
//! engine uses it for bulk snapshot fetches and device enumeration. The
//! trait is the seam: `riglink-client` ships the HTTP implementation
//! and a canned mock for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::frames::{RadioSnapshot, StateSnapshot};

/// Errors surfaced by `ModemApi` implementations. Callers performing a
/// bulk refresh treat every variant as a logged no-op.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected status {status}")]
    Status { status: u16 },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Version and host details reported by the modem.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SysInfo {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub modem_version: String,
    #[serde(default)]
    pub os_info: String,
    #[serde(default)]
    pub runtime_info: String,
}

/// Audio peripheral known to the modem host. Opaque to the engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AudioDevice {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub input: bool,
    #[serde(default)]
    pub output: bool,
}

/// Serial peripheral known to the modem host. Opaque to the engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SerialDevice {
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub description: String,
}

/// REST accessors for bulk snapshots and device enumeration.
#[async_trait]
pub trait ModemApi: Send + Sync {
    async fn modem_state(&self) -> Result<StateSnapshot, ApiError>;
    async fn radio_status(&self) -> Result<RadioSnapshot, ApiError>;
    async fn sys_info(&self) -> Result<SysInfo, ApiError>;
    /// Raw message list; reprocessing belongs to the messages collaborator.
    async fn messages(&self) -> Result<Value, ApiError>;
    async fn audio_devices(&self) -> Result<Vec<AudioDevice>, ApiError>;
    async fn serial_devices(&self) -> Result<Vec<SerialDevice>, ApiError>;
}
