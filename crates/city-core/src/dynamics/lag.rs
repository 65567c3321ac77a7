//! Lag Drags
//!
//! Decaying accumulators for the lingering effect of bad weather and
//! congestion. Each decays before it receives this cycle's increments.

use city_events::{
    Cluster, HolidayPriority, Metric, MetricVector, WeatherObservation, WeatherType,
};

use crate::state::LagState;

pub const TOURISM_DECAY: f64 = 0.84;
pub const PUBLIC_SPACE_DECAY: f64 = 0.82;
pub const NIGHTLIFE_DECAY: f64 = 0.83;
pub const HANGOVER_DECAY: f64 = 0.82;

/// Impact at which a day counts as a storm for lag purposes.
pub const STORM_IMPACT: f64 = 1.4;
const RELIEF: f64 = 0.03;
const MAJOR_HOLIDAY_HANGOVER: f64 = 0.05;
/// Extra drag for the clusters that feel it most.
const CLUSTER_BIAS: f64 = 0.03;

pub fn decay(lag: &mut LagState) {
    lag.tourism_drag *= TOURISM_DECAY;
    lag.public_space_drag *= PUBLIC_SPACE_DECAY;
    lag.nightlife_drag *= NIGHTLIFE_DECAY;
    lag.congestion_hangover *= HANGOVER_DECAY;
}

/// Dry, mild, light wind.
fn is_mild(obs: &WeatherObservation) -> bool {
    matches!(obs.kind, WeatherType::Clear | WeatherType::PartlyCloudy)
        && (60.0..=80.0).contains(&obs.temperature)
        && obs.wind.speed < 15.0
        && !obs.precipitation.is_falling()
}

/// Decays, then adds this cycle's weather and holiday increments.
pub fn update(lag: &mut LagState, obs: &WeatherObservation, priority: HolidayPriority) {
    decay(lag);

    if obs.impact >= STORM_IMPACT {
        lag.tourism_drag += 0.08;
        lag.public_space_drag += 0.10;
        lag.nightlife_drag += 0.06;
    }
    let p = obs.precipitation.intensity.clamp(0.0, 1.0);
    if p > 0.0 {
        lag.public_space_drag += 0.06 * p;
        lag.tourism_drag += 0.03 * p;
        lag.nightlife_drag += 0.03 * p;
    }
    if obs.wind.speed >= 30.0 {
        lag.public_space_drag += 0.04;
        lag.tourism_drag += 0.02;
    }
    if obs.visibility <= 3.0 {
        lag.tourism_drag += 0.03;
        lag.nightlife_drag += 0.02;
    }
    if obs.kind == WeatherType::Fog {
        lag.public_space_drag += 0.02;
    }
    if is_mild(obs) {
        lag.tourism_drag -= RELIEF;
        lag.public_space_drag -= RELIEF;
        lag.nightlife_drag -= RELIEF;
    }
    if priority == HolidayPriority::Major {
        lag.congestion_hangover += MAJOR_HOLIDAY_HANGOVER;
    }

    lag.clamp_all();
}

/// Applies the three metric drags to a cluster vector.
pub fn apply(v: &mut MetricVector, lag: &LagState, cluster: Cluster) {
    let bias = |drag: f64| {
        if drag > 0.0 {
            (drag + CLUSTER_BIAS).min(LagState::DRAG_MAX)
        } else {
            drag
        }
    };
    let tourism = match cluster {
        Cluster::WaterfrontWest => bias(lag.tourism_drag),
        _ => lag.tourism_drag,
    };
    let nightlife = match cluster {
        Cluster::DowntownCore => bias(lag.nightlife_drag),
        _ => lag.nightlife_drag,
    };
    v.scale(Metric::Tourism, 1.0 - tourism);
    v.scale(Metric::PublicSpaces, 1.0 - lag.public_space_drag);
    v.scale(Metric::Nightlife, 1.0 - nightlife);
}
