//! Projectors for the periodic modem and radio snapshots.

use riglink_core::frames::{ActivityRecord, RadioSnapshot, StateSnapshot};
use riglink_state::{rebuild_heard_stations, ConnectionStatus};

use crate::ProjectionEngine;

/// `20*log10` dB figure mapped onto a 0-100 display percentage.
fn db_to_percent(db: f64) -> f64 {
    (10f64.powf(db / 20.0) * 100.0).round()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// SWR maps linearly onto [0, 100] over the meter's 0-6 range. A reading
/// outside that range renders as zero percent: a bogus reading must look
/// empty, not pegged.
fn swr_to_percent(raw: f64) -> f64 {
    if (0.0..=6.0).contains(&raw) {
        round2(raw / 6.0 * 100.0)
    } else {
        0.0
    }
}

/// RF drive level moves in steps of 5.
fn snap_rf_level(value: f64) -> f64 {
    (value / 5.0).round() * 5.0
}

impl ProjectionEngine {
    /// Fold a modem state snapshot into the store. A snapshot arriving
    /// at all proves the link is up, so the connection is marked
    /// Connected here. The activity log is replaced wholesale, newest
    /// entry first, and the heard-station registry rebuilt from it.
    pub(crate) fn apply_state_snapshot(&self, snapshot: StateSnapshot) {
        let StateSnapshot {
            is_modem_busy,
            channel_busy,
            channel_busy_slot,
            is_codec2_traffic,
            is_modem_running,
            audio_dbfs,
            radio_status,
            is_beacon_running,
            is_away_from_key,
            activities,
        } = snapshot;

        let activities: Vec<(String, ActivityRecord)> = activities.into_iter().rev().collect();

        self.store.mutate(move |s| {
            s.connection = ConnectionStatus::Connected;
            s.modem_busy = is_modem_busy;
            s.channel_busy = channel_busy;
            s.channel_busy_slots = channel_busy_slot;
            s.codec_traffic = is_codec2_traffic;
            s.modem_running = is_modem_running;
            s.audio_dbfs = audio_dbfs.round();
            s.audio_level_percent = db_to_percent(audio_dbfs);
            s.radio_present = radio_status;
            s.beacon_running = is_beacon_running;
            s.away_from_key = is_away_from_key;
            s.activities = activities;
            rebuild_heard_stations(&s.activities, &mut s.heard_stations);
        });
    }

    /// Fold a radio snapshot into the store.
    pub(crate) fn apply_radio_snapshot(&self, snapshot: RadioSnapshot) {
        let RadioSnapshot {
            s_meter_strength,
            radio_status,
            radio_frequency,
            radio_mode,
            radio_swr,
            radio_tuner,
            radio_rf_level,
        } = snapshot;

        self.store.mutate(move |s| {
            s.s_meter_db = s_meter_strength.round();
            s.s_meter_percent = db_to_percent(s_meter_strength);
            s.radio_present = radio_status;
            s.frequency = radio_frequency;
            s.mode = radio_mode;
            s.swr_raw = round2(radio_swr);
            s.swr_percent = swr_to_percent(radio_swr);
            s.tuner_active = radio_tuner;
            s.rf_level = snap_rf_level(radio_rf_level);
        });
    }
}
