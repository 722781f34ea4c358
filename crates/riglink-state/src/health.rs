use crate::store::{ConnectionStatus, StateStore};

/// Compute the overall severity score: 0 is healthy, higher is worse.
///
/// Checks are additive and evaluated against the state as it stood on
/// entry. A dead connection additionally forces the running and
/// radio-present flags low, since those readings cannot be trusted
/// without a live link; the next call then scores them as degraded too.
pub fn overall_health(store: &StateStore) -> u32 {
    let mut health = 0;
    store.mutate(|state| {
        let disconnected = state.connection != ConnectionStatus::Connected;
        if disconnected {
            health += 5;
        }
        if !state.modem_running {
            health += 3;
        }
        if !state.radio_present {
            health += 2;
        }
        if state.update_available {
            health += 1;
        }
        if disconnected {
            state.modem_running = false;
            state.radio_present = false;
        }
    });
    health
}
