use std::collections::HashMap;

use riglink_core::frames::{ActivityDirection, ActivityRecord};
use riglink_core::ids::Callsign;

/// Rebuild the heard-station registry from the activity log.
///
/// Only received records with a known origin qualify. The registry keeps
/// the most recent record per origin: a strictly newer timestamp replaces
/// the stored record wholesale, an equal or older one leaves it in place,
/// and entries are never deleted. The result is sorted most recent first.
pub fn rebuild_heard_stations(
    activities: &[(String, ActivityRecord)],
    registry: &mut Vec<ActivityRecord>,
) {
    let mut by_origin: HashMap<Callsign, usize> = registry
        .iter()
        .enumerate()
        .filter_map(|(slot, record)| record.origin.clone().map(|origin| (origin, slot)))
        .collect();

    for (_, record) in activities {
        if record.direction != ActivityDirection::Received {
            continue;
        }
        let Some(origin) = record.origin.clone() else {
            continue;
        };
        match by_origin.get(&origin) {
            Some(&slot) => {
                if registry[slot].timestamp < record.timestamp {
                    registry[slot] = record.clone();
                }
            }
            None => {
                by_origin.insert(origin, registry.len());
                registry.push(record.clone());
            }
        }
    }

    registry.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
