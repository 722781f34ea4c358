//! HTTP implementation of the `ModemApi` trait.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use riglink_core::api::{ApiError, AudioDevice, ModemApi, SerialDevice, SysInfo};
use riglink_core::frames::{RadioSnapshot, StateSnapshot};

/// REST client for the modem's HTTP surface.
pub struct HttpModemApi {
    base: String,
    http: reqwest::Client,
}

impl HttpModemApi {
    /// `base` is the scheme://host:port root, with or without a
    /// trailing slash.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_owned();
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ModemApi for HttpModemApi {
    async fn modem_state(&self) -> Result<StateSnapshot, ApiError> {
        self.get_json("/api/modem/state").await
    }

    async fn radio_status(&self) -> Result<RadioSnapshot, ApiError> {
        self.get_json("/api/radio").await
    }

    async fn sys_info(&self) -> Result<SysInfo, ApiError> {
        self.get_json("/api/info").await
    }

    async fn messages(&self) -> Result<Value, ApiError> {
        self.get_json("/api/messages").await
    }

    async fn audio_devices(&self) -> Result<Vec<AudioDevice>, ApiError> {
        self.get_json("/api/devices/audio").await
    }

    async fn serial_devices(&self) -> Result<Vec<SerialDevice>, ApiError> {
        self.get_json("/api/devices/serial").await
    }
}
