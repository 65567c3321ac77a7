//! City Dynamics Output Types
//!
//! Clusters and the per-cycle vectors, congestion and signal breakdowns
//! published by the aggregator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::inputs::SeedDomain;
use crate::metrics::MetricVector;

/// One of the five geographic groupings of neighborhoods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cluster {
    DowntownCore,
    WaterfrontWest,
    LakeCorridor,
    NorthHills,
    EastOakland,
}

impl Cluster {
    pub const ALL: [Cluster; 5] = [
        Cluster::DowntownCore,
        Cluster::WaterfrontWest,
        Cluster::LakeCorridor,
        Cluster::NorthHills,
        Cluster::EastOakland,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Cluster::DowntownCore => "DOWNTOWN_CORE",
            Cluster::WaterfrontWest => "WATERFRONT_WEST",
            Cluster::LakeCorridor => "LAKE_CORRIDOR",
            Cluster::NorthHills => "NORTH_HILLS",
            Cluster::EastOakland => "EAST_OAKLAND",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_uppercase();
        Self::ALL.iter().copied().find(|c| c.name() == upper)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Membership and adjacency for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster: Cluster,
    pub neighborhoods: Vec<String>,
    pub adjacent: Vec<Cluster>,
    pub capacity_sensitivity: f64,
}

/// Demand versus capacity for the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CapacitySnapshot {
    pub transit_capacity: f64,
    pub venue_capacity: f64,
    pub road_capacity: f64,
    pub transit_demand: f64,
    pub venue_demand: f64,
    pub road_demand: f64,
    /// Busiest cluster tourism; read by hosts, not by the congestion terms
    #[serde(default)]
    pub peak_tourism: f64,
    pub transit_congestion: f64,
    pub venue_congestion: f64,
    pub road_congestion: f64,
    pub congestion_hangover: f64,
}

impl CapacitySnapshot {
    pub fn total_congestion(&self) -> f64 {
        self.transit_congestion + self.venue_congestion + self.road_congestion
    }
}

/// Lingering weather and congestion drags after this cycle's update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LagSnapshot {
    pub tourism_drag: f64,
    pub public_space_drag: f64,
    pub nightlife_drag: f64,
    pub congestion_hangover: f64,
}

/// Rolling averages over the recent activity window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ActivityAverages {
    pub events: f64,
    pub story_seeds: f64,
    pub media: f64,
    pub crime: f64,
    pub shocks: f64,
    /// Entries the averages were taken over
    pub window: usize,
}

/// Story-seed weight split by the buckets the aggregator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DomainWeights {
    pub culture: f64,
    pub community: f64,
    pub business: f64,
    pub nightlife: f64,
    /// CIVIC and SAFETY share one bucket
    pub civic_safety: f64,
    pub general: f64,
}

impl DomainWeights {
    pub fn add(&mut self, domain: SeedDomain, weight: f64) {
        match domain {
            SeedDomain::Culture => self.culture += weight,
            SeedDomain::Community => self.community += weight,
            SeedDomain::Business => self.business += weight,
            SeedDomain::Nightlife => self.nightlife += weight,
            SeedDomain::Civic | SeedDomain::Safety => self.civic_safety += weight,
            SeedDomain::General => self.general += weight,
        }
    }

    pub fn total(&self) -> f64 {
        self.culture + self.community + self.business + self.nightlife + self.civic_safety + self.general
    }
}

/// Where story-seed weight landed this cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorySignalBreakdown {
    pub by_cluster: BTreeMap<Cluster, DomainWeights>,
    pub by_neighborhood: BTreeMap<String, f64>,
    pub by_domain: DomainWeights,
    /// Weight from seeds with no or unknown neighborhood
    pub unplaced: f64,
}

impl StorySignalBreakdown {
    pub fn cluster(&self, cluster: Cluster) -> DomainWeights {
        self.by_cluster.get(&cluster).copied().unwrap_or_default()
    }

    pub fn neighborhood(&self, name: &str) -> f64 {
        self.by_neighborhood.get(name).copied().unwrap_or(0.0)
    }

    /// Cluster with the most total weight, if any seed was placed.
    pub fn hottest_cluster(&self) -> Option<Cluster> {
        self.by_cluster
            .iter()
            .filter(|(_, w)| w.total() > 0.0)
            .max_by(|a, b| a.1.total().total_cmp(&b.1.total()))
            .map(|(c, _)| *c)
    }
}

/// Everything the aggregator publishes for a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsReport {
    pub cycle: u64,
    /// Published (momentum-smoothed) city vector
    pub city: MetricVector,
    /// City vector before momentum smoothing
    pub raw_city: MetricVector,
    pub clusters: BTreeMap<Cluster, MetricVector>,
    pub neighborhoods: BTreeMap<String, MetricVector>,
    pub capacity: CapacitySnapshot,
    pub lag: LagSnapshot,
    pub activity: ActivityAverages,
    pub story_signals: StorySignalBreakdown,
    pub shock_active: bool,
    pub momentum_applied: bool,
}

impl DynamicsReport {
    /// Named cluster vector, falling back to the city vector.
    pub fn cluster_or_city(&self, name: Option<&str>) -> &MetricVector {
        name.and_then(Cluster::from_name)
            .and_then(|c| self.clusters.get(&c))
            .unwrap_or(&self.city)
    }

    /// Named neighborhood vector, falling back to the city vector.
    pub fn neighborhood_or_city(&self, name: Option<&str>) -> &MetricVector {
        name.and_then(|n| self.neighborhoods.get(n))
            .unwrap_or(&self.city)
    }
}
