use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use riglink_client::{run_channel, Channel, HttpModemApi};
use riglink_core::notify::NotificationHub;
use riglink_engine::ProjectionEngine;
use riglink_state::StateStore;
use riglink_telemetry::TelemetryConfig;

/// Client for a remote HF modem: mirrors the modem's state and event
/// channels into a local observable state model.
#[derive(Debug, Parser)]
#[command(name = "riglink", version)]
struct Args {
    /// Modem host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Modem port.
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Also write logs to daily-rolling files in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _telemetry = riglink_telemetry::init(&TelemetryConfig {
        log_filter: "info".into(),
        log_dir: args.log_dir.clone(),
    })?;

    tracing::info!(host = %args.host, port = args.port, "starting riglink");

    let store = Arc::new(StateStore::new());
    store.mutate(|s| {
        s.update_available = std::env::var("RIGLINK_UPDATE_AVAILABLE")
            .map(|v| v == "1")
            .unwrap_or(false);
    });

    let hub = NotificationHub::default();
    let mut toasts = hub.subscribe();
    // Headless toast rendering: a UI would subscribe here instead.
    tokio::spawn(async move {
        while let Ok(toast) = toasts.recv().await {
            tracing::info!(severity = ?toast.severity, "{}", toast.body);
        }
    });

    let api = Arc::new(HttpModemApi::new(format!(
        "http://{}:{}",
        args.host, args.port
    )));
    let engine = Arc::new(ProjectionEngine::new(Arc::clone(&store), hub, api));

    engine.load_all_data().await;

    let ws_base = format!("ws://{}:{}", args.host, args.port);
    let states = tokio::spawn(run_channel(
        Arc::clone(&engine),
        ws_base.clone(),
        Channel::States,
    ));
    let events = tokio::spawn(run_channel(engine, ws_base, Channel::Events));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
        outcome = states => {
            if let Ok(Err(err)) = outcome {
                tracing::error!(%err, "state channel ended");
            }
        }
        outcome = events => {
            if let Ok(Err(err)) = outcome {
                tracing::error!(%err, "event channel ended");
            }
        }
    }

    Ok(())
}
