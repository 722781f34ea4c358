//! Transport collaborators for the riglink engine: the HTTP
//! implementation of `ModemApi`, the WebSocket channel ingest, and a
//! canned mock for tests and offline development.

mod http;
mod ingest;
pub mod mock;

pub use http::HttpModemApi;
pub use ingest::{run_channel, Channel, IngestError};
