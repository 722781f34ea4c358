//! Observable state model for the riglink client.
//!
//! [`StateStore`] is the single-writer home of everything the UI renders:
//! projectors mutate it, subscribers observe snapshots through a watch
//! channel. The heard-station registry builder and the health aggregator
//! live here because they are pure functions of (and writers into) this
//! state.

mod health;
mod heard;
mod store;

pub use health::overall_health;
pub use heard::rebuild_heard_stations;
pub use store::{ConnectionStatus, ModemState, StateStore, TransferHistograms};
