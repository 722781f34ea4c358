//! Delayed clearing of the transfer progress display.

use std::sync::Arc;

use crate::ProjectionEngine;

impl ProjectionEngine {
    /// Schedule the progress pair to be zeroed after the display delay.
    ///
    /// The task captures the transfer generation at schedule time and
    /// no-ops if a new transfer has opened since. A stale reset must
    /// never clear a fresh session's counters.
    pub(crate) fn schedule_transfer_reset(&self) {
        let store = Arc::clone(&self.store);
        let generation = store.read(|s| s.transfer_generation);
        let delay = self.reset_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.mutate(|s| {
                if s.transfer_generation == generation {
                    s.reset_transfer_counters();
                } else {
                    tracing::trace!(generation, "stale transfer reset skipped");
                }
            });
        });
    }
}
