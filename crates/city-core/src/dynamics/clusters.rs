//! Cluster Definitions
//!
//! Five fixed geographic clusters. Twelve neighborhoods, each in exactly one
//! cluster; symmetric adjacency for sentiment bleed.

use city_events::{Cluster, ClusterSummary};

use super::modifiers::Modifier;

pub struct ClusterDefinition {
    pub cluster: Cluster,
    pub neighborhoods: &'static [&'static str],
    /// Static per-metric multipliers
    pub weights: Modifier,
    /// Scales capacity friction
    pub capacity_sensitivity: f64,
    pub adjacent: &'static [Cluster],
    /// Share of the city aggregate
    pub city_weight: f64,
}

pub const CLUSTERS: [ClusterDefinition; 5] = [
    ClusterDefinition {
        cluster: Cluster::DowntownCore,
        neighborhoods: &["Downtown", "Uptown", "KONO"],
        weights: Modifier::new(1.10, 1.05, 1.05, 1.08, 1.00, 1.05, 0.95, 0.0),
        capacity_sensitivity: 1.2,
        adjacent: &[Cluster::WaterfrontWest, Cluster::LakeCorridor, Cluster::NorthHills],
        city_weight: 0.28,
    },
    ClusterDefinition {
        cluster: Cluster::WaterfrontWest,
        neighborhoods: &["Jack London", "West Oakland"],
        weights: Modifier::new(1.00, 0.98, 1.08, 1.05, 0.97, 1.00, 0.97, 0.0),
        capacity_sensitivity: 1.0,
        adjacent: &[Cluster::DowntownCore],
        city_weight: 0.18,
    },
    ClusterDefinition {
        cluster: Cluster::LakeCorridor,
        neighborhoods: &["Lake Merritt", "Adams Point", "Grand Lake"],
        weights: Modifier::new(0.97, 1.00, 1.02, 0.98, 1.10, 1.02, 1.05, 0.0),
        capacity_sensitivity: 0.9,
        adjacent: &[Cluster::DowntownCore, Cluster::NorthHills, Cluster::EastOakland],
        city_weight: 0.22,
    },
    ClusterDefinition {
        cluster: Cluster::NorthHills,
        neighborhoods: &["Rockridge", "Temescal"],
        weights: Modifier::new(0.95, 1.05, 0.97, 1.00, 1.02, 1.08, 1.02, 0.0),
        capacity_sensitivity: 0.8,
        adjacent: &[Cluster::DowntownCore, Cluster::LakeCorridor],
        city_weight: 0.17,
    },
    ClusterDefinition {
        cluster: Cluster::EastOakland,
        neighborhoods: &["Fruitvale", "Laurel"],
        weights: Modifier::new(1.00, 0.97, 0.92, 0.97, 0.98, 1.00, 1.08, 0.0),
        capacity_sensitivity: 1.0,
        adjacent: &[Cluster::LakeCorridor],
        city_weight: 0.15,
    },
];

pub fn definition(cluster: Cluster) -> &'static ClusterDefinition {
    match cluster {
        Cluster::DowntownCore => &CLUSTERS[0],
        Cluster::WaterfrontWest => &CLUSTERS[1],
        Cluster::LakeCorridor => &CLUSTERS[2],
        Cluster::NorthHills => &CLUSTERS[3],
        Cluster::EastOakland => &CLUSTERS[4],
    }
}

/// Cluster a neighborhood belongs to; names match exactly or ignoring case.
pub fn cluster_of(neighborhood: &str) -> Option<Cluster> {
    let name = neighborhood.trim();
    CLUSTERS
        .iter()
        .find(|def| def.neighborhoods.iter().any(|n| n.eq_ignore_ascii_case(name)))
        .map(|def| def.cluster)
}

/// Canonical spelling of a neighborhood name.
pub fn canonical_neighborhood(neighborhood: &str) -> Option<&'static str> {
    let name = neighborhood.trim();
    all_neighborhoods().find(|n| n.eq_ignore_ascii_case(name))
}

/// Every neighborhood in cluster order.
pub fn all_neighborhoods() -> impl Iterator<Item = &'static str> {
    CLUSTERS.iter().flat_map(|def| def.neighborhoods.iter().copied())
}

/// Membership, adjacency and sensitivity for every cluster.
pub fn cluster_table() -> Vec<ClusterSummary> {
    CLUSTERS
        .iter()
        .map(|def| ClusterSummary {
            cluster: def.cluster,
            neighborhoods: def.neighborhoods.iter().map(|n| n.to_string()).collect(),
            adjacent: def.adjacent.to_vec(),
            capacity_sensitivity: def.capacity_sensitivity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_twelve_neighborhoods_partitioned_once() {
        let all: Vec<_> = all_neighborhoods().collect();
        let unique: BTreeSet<_> = all.iter().collect();
        assert_eq!(all.len(), 12);
        assert_eq!(unique.len(), 12);
        for def in &CLUSTERS {
            assert!((2..=4).contains(&def.neighborhoods.len()));
        }
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        for def in &CLUSTERS {
            for other in def.adjacent {
                assert!(
                    definition(*other).adjacent.contains(&def.cluster),
                    "{} -> {} not mirrored",
                    def.cluster,
                    other
                );
            }
        }
    }

    #[test]
    fn test_city_weights_sum_to_one() {
        let total: f64 = CLUSTERS.iter().map(|d| d.city_weight).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_definition_lookup_matches_table() {
        for cluster in Cluster::ALL {
            assert_eq!(definition(cluster).cluster, cluster);
        }
    }

    #[test]
    fn test_cluster_of() {
        assert_eq!(cluster_of("Jack London"), Some(Cluster::WaterfrontWest));
        assert_eq!(cluster_of("kono"), Some(Cluster::DowntownCore));
        assert_eq!(cluster_of("Nowhere"), None);
        assert_eq!(canonical_neighborhood(" fruitvale "), Some("Fruitvale"));
    }

    #[test]
    fn test_microclimates_cover_every_neighborhood() {
        for name in all_neighborhoods() {
            assert!(crate::weather::microclimate::profile_for(name).is_some(), "{name}");
        }
    }

    #[test]
    fn test_cluster_table() {
        let table = cluster_table();
        assert_eq!(table.len(), 5);
        assert_eq!(table[2].adjacent.len(), 3);
    }
}
