//! Shared types for the riglink client: wire frames for both modem
//! channels, the callsign newtype, notification primitives, the
//! `ModemApi` collaborator trait, and the dispatch error taxonomy.

pub mod api;
pub mod errors;
pub mod frames;
pub mod ids;
pub mod notify;
