//! Capacity and Congestion
//!
//! Peak demand across clusters against configured capacity, the congestion
//! hangover it leaves, and the friction it applies back to each cluster.

use std::collections::BTreeMap;

use city_events::{CapacitySnapshot, Cluster, Metric, MetricVector};

use super::clusters::definition;
use crate::config::CapacityConfig;
use crate::state::LagState;

pub const TRANSIT_COEF: f64 = 0.38;
pub const VENUE_COEF: f64 = 0.32;
pub const ROAD_COEF: f64 = 0.32;
pub const TRANSIT_CAP: f64 = 0.30;
pub const VENUE_CAP: f64 = 0.25;
pub const ROAD_CAP: f64 = 0.25;

/// Transit plus road congestion that leaves a hangover.
pub const HANGOVER_TRIGGER: f64 = 0.28;
pub const HANGOVER_STEP: f64 = 0.08;
pub const FRICTION_MAX: f64 = 0.6;

/// Congestion for one demand/capacity pair.
pub fn congestion(demand: f64, capacity: f64, coef: f64, cap: f64) -> f64 {
    ((demand - capacity) * coef).clamp(0.0, cap)
}

/// Demand and congestion from the post-lag cluster vectors.
pub fn measure(
    clusters: &BTreeMap<Cluster, MetricVector>,
    capacity: &CapacityConfig,
    hangover: f64,
) -> CapacitySnapshot {
    let peak = |metric: Metric| {
        clusters
            .values()
            .map(|v| v.get(metric))
            .fold(f64::NEG_INFINITY, f64::max)
            .max(0.0)
    };
    let peak_traffic = peak(Metric::Traffic);
    let peak_nightlife = peak(Metric::Nightlife);
    let peak_tourism = peak(Metric::Tourism);

    let transit_demand = (peak_traffic + peak_nightlife) / 2.0;
    let venue_demand = peak_nightlife;
    let road_demand = peak_traffic;

    CapacitySnapshot {
        transit_capacity: capacity.transit_capacity,
        venue_capacity: capacity.venue_capacity,
        road_capacity: capacity.road_capacity,
        transit_demand,
        venue_demand,
        road_demand,
        peak_tourism,
        transit_congestion: congestion(transit_demand, capacity.transit_capacity, TRANSIT_COEF, TRANSIT_CAP),
        venue_congestion: congestion(venue_demand, capacity.venue_capacity, VENUE_COEF, VENUE_CAP),
        road_congestion: congestion(road_demand, capacity.road_capacity, ROAD_COEF, ROAD_CAP),
        congestion_hangover: hangover,
    }
}

/// Adds to the hangover when transit and roads are jammed together.
pub fn update_hangover(snapshot: &mut CapacitySnapshot, lag: &mut LagState, cycle: u64) {
    if snapshot.transit_congestion + snapshot.road_congestion >= HANGOVER_TRIGGER {
        lag.congestion_hangover =
            (lag.congestion_hangover + HANGOVER_STEP).min(LagState::HANGOVER_MAX);
        tracing::debug!(
            "Congestion hangover at cycle {} now {:.2}",
            cycle,
            lag.congestion_hangover
        );
    }
    snapshot.congestion_hangover = lag.congestion_hangover;
}

/// Friction felt by one cluster: all three congestions plus the hangover.
pub fn cluster_friction(snapshot: &CapacitySnapshot, cluster: Cluster) -> f64 {
    let load = snapshot.total_congestion() + snapshot.congestion_hangover;
    (load * definition(cluster).capacity_sensitivity).clamp(0.0, FRICTION_MAX)
}

/// Graduated penalties for a friction level.
pub fn apply_friction(v: &mut MetricVector, friction: f64) {
    if friction <= 0.0 {
        return;
    }
    v.scale(Metric::Traffic, 1.0 - 0.20 * friction);
    v.scale(Metric::Nightlife, 1.0 - 0.12 * friction);
    v.scale(Metric::Tourism, 1.0 - 0.10 * friction);
    v.scale(Metric::PublicSpaces, 1.0 - 0.08 * friction);
    v.shift(Metric::Sentiment, -0.12 * friction);
}
