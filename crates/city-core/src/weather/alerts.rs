//! Streaks, Season Firsts and Alerts

use std::collections::BTreeSet;

use city_events::{
    Front, Season, StreakCategory, StreakSnapshot, WeatherAlert, WeatherObservation,
};

use crate::state::{WeatherHistoryEntry, WeatherTrackingState};

pub const HEAT_WAVE_DAYS: u32 = 6;
pub const PROLONGED_RAIN_DAYS: u32 = 4;
pub const PROLONGED_RAIN_INTENSITY: f64 = 0.35;
pub const STORM_ADVISORY_INTENSITY: f64 = 0.7;
pub const STORM_ADVISORY_WIND: f64 = 28.0;
pub const COLD_SNAP_DAYS: u32 = 5;
pub const FOG_ADVISORY_DAYS: u32 = 3;

/// Extends or restarts the category streak, records history, and returns the
/// season-first flags newly set this cycle.
pub fn update_tracking(
    tracking: &mut WeatherTrackingState,
    observation: &WeatherObservation,
    season: Season,
) -> (StreakSnapshot, Vec<String>) {
    let category = observation.kind.streak_category();

    if tracking.streak_category == Some(category) {
        tracking.streak_days = tracking.streak_days.saturating_add(1);
    } else {
        tracking.streak_category = Some(category);
        tracking.streak_days = 1;
    }

    if tracking.season != Some(season) {
        tracking.season_firsts.clear();
        tracking.season = Some(season);
    }
    let key = format!("{}:{}", season, category);
    let mut firsts = Vec::new();
    if tracking.season_firsts.insert(key.clone()) {
        firsts.push(key);
    }

    tracking.record(WeatherHistoryEntry {
        cycle: observation.cycle,
        kind: observation.kind,
        temperature: observation.temperature,
        category,
    });

    let streak = StreakSnapshot {
        category,
        days: tracking.streak_days,
    };
    (streak, firsts)
}

/// Alerts implied by the current streak and conditions.
pub fn evaluate_alerts(
    streak: StreakSnapshot,
    observation: &WeatherObservation,
) -> BTreeSet<WeatherAlert> {
    let mut alerts = BTreeSet::new();
    let days = streak.days;
    let intensity = observation.precipitation.intensity;

    if streak.category == StreakCategory::Hot && days >= HEAT_WAVE_DAYS {
        alerts.insert(WeatherAlert::HeatWave);
    }
    if streak.category == StreakCategory::Rain
        && days >= PROLONGED_RAIN_DAYS
        && intensity >= PROLONGED_RAIN_INTENSITY
    {
        alerts.insert(WeatherAlert::ProlongedRain);
    }
    if observation.front == Front::Storm
        && intensity >= STORM_ADVISORY_INTENSITY
        && observation.wind.speed >= STORM_ADVISORY_WIND
    {
        alerts.insert(WeatherAlert::StormAdvisory);
    }
    if matches!(streak.category, StreakCategory::Cold | StreakCategory::Snow)
        && days >= COLD_SNAP_DAYS
    {
        alerts.insert(WeatherAlert::ColdSnap);
    }
    let fog_streak = streak.category == StreakCategory::Fog && days >= FOG_ADVISORY_DAYS;
    let marine_streak =
        observation.front == Front::Marine && observation.front_streak >= FOG_ADVISORY_DAYS;
    if fog_streak || marine_streak {
        alerts.insert(WeatherAlert::FogAdvisory);
    }

    alerts
}
