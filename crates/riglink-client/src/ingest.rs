//! WebSocket ingest for the two modem channels.

use std::sync::Arc;

use futures::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use riglink_core::notify::{icon, Notification, Severity, TOAST_SHORT};
use riglink_engine::ProjectionEngine;
use riglink_state::ConnectionStatus;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("websocket connect failed: {0}")]
    Connect(String),
    #[error("websocket stream failed: {0}")]
    Stream(String),
}

/// The modem's two notification channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    States,
    Events,
}

impl Channel {
    pub fn path(self) -> &'static str {
        match self {
            Self::States => "/states",
            Self::Events => "/events",
        }
    }
}

fn channel_url(ws_base: &str, channel: Channel) -> String {
    format!("{}{}", ws_base.trim_end_matches('/'), channel.path())
}

/// Consume one channel until the peer closes or the stream fails.
///
/// Malformed messages are logged and dropped; they never end the loop.
/// Reconnection policy belongs to the caller; this function only marks
/// the connection lost and returns.
pub async fn run_channel(
    engine: Arc<ProjectionEngine>,
    ws_base: String,
    channel: Channel,
) -> Result<(), IngestError> {
    let url = channel_url(&ws_base, channel);
    let (stream, _) = match connect_async(url.as_str()).await {
        Ok(connected) => connected,
        Err(err) => {
            mark_connection_lost(&engine);
            return Err(IngestError::Connect(err.to_string()));
        }
    };
    tracing::info!(url = %url, ?channel, "channel connected");

    let (_write, mut read) = stream.split();
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let outcome = match channel {
                    Channel::States => engine.dispatch_state(text.as_str()),
                    Channel::Events => engine.dispatch_event(text.as_str()).await,
                };
                if let Err(err) = outcome {
                    tracing::warn!(%err, ?channel, "dropped inbound message");
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                mark_connection_lost(&engine);
                return Err(IngestError::Stream(err.to_string()));
            }
        }
    }

    tracing::info!(?channel, "channel closed by peer");
    mark_connection_lost(&engine);
    Ok(())
}

fn mark_connection_lost(engine: &ProjectionEngine) {
    engine
        .store()
        .mutate(|s| s.connection = ConnectionStatus::Disconnected);
    engine.notifier().publish(Notification::new(
        Severity::Danger,
        icon::ETHERNET,
        "Connection to the modem failed",
        TOAST_SHORT,
    ));
}
