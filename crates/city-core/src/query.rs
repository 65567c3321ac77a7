//! Read accessors for collaborators that generate citizen events and story
//! seeds. Nothing here mutates state.

use city_events::{
    ActivityAverages, CapacitySnapshot, ClusterSummary, Front, MetricVector,
    PrecipitationType, StorySignalBreakdown, WeatherAlert, WeatherReport,
};

use crate::state::WorldState;

/// Upper bound on the transit delay multiplier.
pub const TRANSIT_MODIFIER_MAX: f64 = 2.0;
pub const CRIME_MODIFIER_MIN: f64 = 0.7;
pub const CRIME_MODIFIER_MAX: f64 = 1.3;

/// Named cluster vector, or the city vector when the name is absent or
/// unknown. Neutral before the first cycle.
pub fn cluster_dynamics(state: &WorldState, name: Option<&str>) -> MetricVector {
    state
        .dynamics
        .as_ref()
        .map(|d| *d.cluster_or_city(name))
        .unwrap_or_default()
}

/// Named neighborhood vector with the same fallbacks as [`cluster_dynamics`].
pub fn neighborhood_dynamics(state: &WorldState, name: Option<&str>) -> MetricVector {
    state
        .dynamics
        .as_ref()
        .map(|d| *d.neighborhood_or_city(name))
        .unwrap_or_default()
}

/// Multiplier on transit delays for the day's weather.
///
/// | condition                     | adds  |
/// |-------------------------------|-------|
/// | precipitation >= 0.7          | 0.35  |
/// | precipitation >= 0.3          | 0.15  |
/// | any precipitation             | 0.05  |
/// | snow on the ground            | 0.30  |
/// | wind >= 30 mph                | 0.15  |
/// | wind >= 20 mph                | 0.05  |
/// | visibility <= 1 mile          | 0.25  |
/// | visibility <= 3 miles         | 0.10  |
/// | STORM front                   | 0.10  |
/// | storm advisory                | 0.10  |
pub fn transit_weather_modifier(report: &WeatherReport) -> f64 {
    let obs = &report.observation;
    let mut modifier: f64 = 1.0;

    let p = obs.precipitation.intensity;
    if p >= 0.7 {
        modifier += 0.35;
    } else if p >= 0.3 {
        modifier += 0.15;
    } else if p > 0.0 {
        modifier += 0.05;
    }
    if obs.precipitation.kind == PrecipitationType::Snow {
        modifier += 0.30;
    }

    if obs.wind.speed >= 30.0 {
        modifier += 0.15;
    } else if obs.wind.speed >= 20.0 {
        modifier += 0.05;
    }

    if obs.visibility <= 1.0 {
        modifier += 0.25;
    } else if obs.visibility <= 3.0 {
        modifier += 0.10;
    }

    if obs.front == Front::Storm {
        modifier += 0.10;
    }
    if report.has_alert(WeatherAlert::StormAdvisory) {
        modifier += 0.10;
    }

    modifier.min(TRANSIT_MODIFIER_MAX)
}

/// Multiplier on street-crime rates. Heat pushes it up, heavy rain and cold
/// keep people indoors.
pub fn crime_weather_modifier(report: &WeatherReport) -> f64 {
    let obs = &report.observation;
    let mut modifier: f64 = 1.0;

    if obs.temperature >= 85.0 {
        modifier *= 1.10;
    } else if obs.temperature <= 40.0 {
        modifier *= 0.90;
    }
    if report.has_alert(WeatherAlert::HeatWave) {
        modifier *= 1.08;
    }
    if obs.front == Front::Heat {
        modifier *= 1.03;
    }

    let p = obs.precipitation.intensity;
    if p >= 0.5 {
        modifier *= 0.85;
    } else if p > 0.0 {
        modifier *= 0.95;
    }
    if obs.wind.speed >= 30.0 {
        modifier *= 0.95;
    }
    if obs.visibility <= 3.0 {
        // cover of fog
        modifier *= 1.04;
    }

    modifier.clamp(CRIME_MODIFIER_MIN, CRIME_MODIFIER_MAX)
}

/// Cluster membership, adjacency and capacity sensitivity.
pub fn cluster_table() -> Vec<ClusterSummary> {
    crate::dynamics::cluster_table()
}

pub fn activity_averages(state: &WorldState) -> Option<ActivityAverages> {
    state.dynamics.as_ref().map(|d| d.activity)
}

pub fn capacity_snapshot(state: &WorldState) -> Option<CapacitySnapshot> {
    state.dynamics.as_ref().map(|d| d.capacity)
}

pub fn story_signals(state: &WorldState) -> Option<&StorySignalBreakdown> {
    state.dynamics.as_ref().map(|d| &d.story_signals)
}
