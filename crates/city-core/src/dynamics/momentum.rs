//! Bleed, Aggregate and Momentum
//!
//! Single-pass sentiment bleed between adjacent clusters, the weighted city
//! aggregate, and momentum smoothing against last cycle's published vector.

use std::collections::BTreeMap;

use city_events::{Cluster, Metric, MetricVector};

use super::clusters::definition;
use crate::config::MomentumConfig;

/// Moves each cluster's sentiment toward its neighbors' mean.
///
/// Reads come from a snapshot taken before the pass, so the result does not
/// depend on iteration order.
pub fn bleed_sentiment(clusters: &mut BTreeMap<Cluster, MetricVector>, factor: f64) {
    let before: BTreeMap<Cluster, f64> = clusters.iter().map(|(c, v)| (*c, v.sentiment)).collect();
    for (cluster, vector) in clusters.iter_mut() {
        let neighbors: Vec<f64> = definition(*cluster)
            .adjacent
            .iter()
            .filter_map(|n| before.get(n).copied())
            .collect();
        if neighbors.is_empty() {
            continue;
        }
        let neighbor_avg = neighbors.iter().sum::<f64>() / neighbors.len() as f64;
        let old = vector.sentiment;
        vector.set(Metric::Sentiment, old + (neighbor_avg - old) * factor);
    }
}

/// Weighted mean of the cluster vectors. Falls back to neutral when no
/// cluster carries weight.
pub fn city_aggregate(clusters: &BTreeMap<Cluster, MetricVector>) -> MetricVector {
    let total_weight: f64 = clusters.keys().map(|c| definition(*c).city_weight).sum();
    if total_weight <= 0.0 {
        return MetricVector::neutral();
    }
    let mut city = MetricVector::neutral();
    for metric in Metric::ALL {
        let weighted: f64 = clusters
            .iter()
            .map(|(c, v)| v.get(metric) * definition(*c).city_weight)
            .sum();
        city.set(metric, weighted / total_weight);
    }
    city
}

/// `m * previous + (1 - m) * raw` per metric; raw passes through when there
/// is no previous vector.
pub fn blend(
    raw: &MetricVector,
    previous: Option<&MetricVector>,
    config: &MomentumConfig,
    shock_active: bool,
) -> MetricVector {
    let Some(previous) = previous else {
        return *raw;
    };
    let mut out = *raw;
    for metric in Metric::ALL {
        let m = config.effective_factor(metric, shock_active);
        out.set(metric, m * previous.get(metric) + (1.0 - m) * raw.get(metric));
    }
    out
}
