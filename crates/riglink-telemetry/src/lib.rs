//! Tracing setup for the riglink binary.
//!
//! Console logging through an env-filtered fmt layer, plus an optional
//! non-blocking daily-rolling file sink. `RUST_LOG` overrides the
//! configured filter. The returned guard must stay alive for the
//! process lifetime or buffered file output is lost.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Default filter directive, e.g. `info` or `riglink_engine=debug`.
    pub log_filter: String,
    /// When set, logs are additionally written to daily-rolling files
    /// in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            log_dir: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to create log directory: {0}")]
    LogDir(#[from] std::io::Error),
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Keeps the non-blocking appender flushing until dropped.
pub struct TelemetryGuard {
    _appender: Option<WorkerGuard>,
}

/// Install the global subscriber.
pub fn init(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "riglink.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .try_init()
                .map_err(|err| TelemetryError::Init(err.to_string()))?;
            Ok(TelemetryGuard {
                _appender: Some(guard),
            })
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .try_init()
                .map_err(|err| TelemetryError::Init(err.to_string()))?;
            Ok(TelemetryGuard { _appender: None })
        }
    }
}
