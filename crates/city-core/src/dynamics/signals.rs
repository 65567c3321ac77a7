//! Neighborhood Signals
//!
//! Demographic, economic, crime, activity and story-seed inputs, and the
//! threshold-tiered effects each has on a cluster.

use std::collections::BTreeMap;

use city_events::{
    ActivityAverages, CitySignals, Cluster, Demographics, DomainWeights, StorySeed,
    StorySignalBreakdown,
};

use super::clusters::{canonical_neighborhood, cluster_of};
use super::modifiers::Modifier;

/// Per-neighborhood signals a host may or may not provide.
///
/// Every method defaults to `None`, which the aggregator treats as neutral.
pub trait NeighborhoodSignals {
    fn demographics(&self, _neighborhood: &str) -> Option<Demographics> {
        None
    }

    /// Economic mood, 0-100 with 50 as neutral.
    fn economic_mood(&self, _neighborhood: &str) -> Option<f64> {
        None
    }

    fn crime_count(&self, _neighborhood: &str) -> Option<u32> {
        None
    }
}

/// Host maps are keyed however the host spelled the name; an exact key wins,
/// then any key equal ignoring case and surrounding whitespace.
fn lookup<'m, V>(map: &'m BTreeMap<String, V>, neighborhood: &str) -> Option<&'m V> {
    map.get(neighborhood).or_else(|| {
        let name = neighborhood.trim();
        map.iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

impl NeighborhoodSignals for CitySignals {
    fn demographics(&self, neighborhood: &str) -> Option<Demographics> {
        lookup(&self.demographics, neighborhood).copied()
    }

    fn economic_mood(&self, neighborhood: &str) -> Option<f64> {
        lookup(&self.economic_mood, neighborhood)
            .copied()
            .filter(|m| m.is_finite())
    }

    fn crime_count(&self, neighborhood: &str) -> Option<u32> {
        lookup(&self.crime, neighborhood).copied()
    }
}

/// Neutral economic mood.
pub const NEUTRAL_ECONOMY: f64 = 50.0;

/// Tier lookup: the first threshold the value reaches wins.
fn tier<T: Copy>(value: f64, tiers: &[(f64, T)]) -> Option<T> {
    tiers.iter().find(|(threshold, _)| value >= *threshold).map(|(_, t)| *t)
}

// ---------------------------------------------------------------------------
// Demographics
// ---------------------------------------------------------------------------

/// Mean ratios across the neighborhoods that report; `None` when none do.
pub fn average_demographics<'a>(
    signals: Option<&dyn NeighborhoodSignals>,
    neighborhoods: impl IntoIterator<Item = &'a str>,
) -> Option<Demographics> {
    let signals = signals?;
    let mut sum = Demographics::default();
    let mut n = 0usize;
    for name in neighborhoods {
        if let Some(d) = signals.demographics(name) {
            sum.unemployment += d.unemployment;
            sum.sickness += d.sickness;
            sum.students += d.students;
            sum.seniors += d.seniors;
            n += 1;
        }
    }
    if n == 0 {
        return None;
    }
    let div = n as f64;
    Some(Demographics {
        unemployment: sum.unemployment / div,
        sickness: sum.sickness / div,
        students: sum.students / div,
        seniors: sum.seniors / div,
    })
}

pub fn demographic_modifier(d: &Demographics) -> Modifier {
    let mut m = Modifier::NONE;
    if let Some((retail, sentiment)) = tier(d.unemployment, &[(0.12, (0.92, -0.06)), (0.08, (0.96, -0.03))]) {
        m.retail *= retail;
        m.sentiment += sentiment;
    }
    if let Some((public, nightlife, community, sentiment)) = tier(
        d.sickness,
        &[(0.10, (0.92, 0.94, 0.95, -0.04)), (0.05, (0.96, 0.97, 1.0, 0.0))],
    ) {
        m.public_spaces *= public;
        m.nightlife *= nightlife;
        m.community_engagement *= community;
        m.sentiment += sentiment;
    }
    if let Some((nightlife, cultural)) = tier(d.students, &[(0.25, (1.08, 1.05)), (0.15, (1.04, 1.0))]) {
        m.nightlife *= nightlife;
        m.cultural_activity *= cultural;
    }
    if let Some((nightlife, community, public)) = tier(
        d.seniors,
        &[(0.25, (0.95, 1.06, 1.03)), (0.18, (1.0, 1.03, 1.0))],
    ) {
        m.nightlife *= nightlife;
        m.community_engagement *= community;
        m.public_spaces *= public;
    }
    m
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// Mean economic mood across reporting neighborhoods, neutral when none do.
pub fn average_economic_mood<'a>(
    signals: Option<&dyn NeighborhoodSignals>,
    neighborhoods: impl IntoIterator<Item = &'a str>,
) -> f64 {
    let Some(signals) = signals else {
        return NEUTRAL_ECONOMY;
    };
    let (sum, n) = neighborhoods
        .into_iter()
        .filter_map(|name| signals.economic_mood(name))
        .fold((0.0, 0usize), |(s, n), m| (s + m, n + 1));
    if n == 0 {
        NEUTRAL_ECONOMY
    } else {
        sum / n as f64
    }
}

pub fn economy_modifier(mood: f64) -> Modifier {
    let mut m = Modifier::NONE;
    if mood >= 70.0 {
        m.retail = 1.10;
        m.nightlife = 1.05;
        m.sentiment = 0.06;
    } else if mood >= 60.0 {
        m.retail = 1.05;
        m.sentiment = 0.03;
    } else if mood <= 30.0 {
        m.retail = 0.88;
        m.nightlife = 0.95;
        m.sentiment = -0.08;
    } else if mood <= 40.0 {
        m.retail = 0.94;
        m.sentiment = -0.04;
    }
    m
}

// ---------------------------------------------------------------------------
// Observed activity
// ---------------------------------------------------------------------------

pub fn activity_modifier(avg: &ActivityAverages) -> Modifier {
    let mut m = Modifier::NONE;
    if let Some((cultural, community, sentiment)) =
        tier(avg.events, &[(8.0, (1.08, 1.06, 0.03)), (4.0, (1.04, 1.03, 0.0))])
    {
        m.cultural_activity *= cultural;
        m.community_engagement *= community;
        m.sentiment += sentiment;
    }
    if let Some((tourism, sentiment)) = tier(avg.media, &[(10.0, (1.05, 0.02)), (5.0, (1.02, 0.0))]) {
        m.tourism *= tourism;
        m.sentiment += sentiment;
    }
    if let Some(community) = tier(avg.story_seeds, &[(8.0, 1.05), (4.0, 1.02)]) {
        m.community_engagement *= community;
    }
    if let Some((public, sentiment)) = tier(avg.shocks, &[(1.0, (0.95, -0.06)), (0.5, (1.0, -0.03))]) {
        m.public_spaces *= public;
        m.sentiment += sentiment;
    }
    if let Some((nightlife, tourism, public, sentiment)) = tier(
        avg.crime,
        &[(10.0, (0.92, 0.94, 0.93, -0.05)), (5.0, (0.96, 0.97, 0.97, -0.02))],
    ) {
        m.nightlife *= nightlife;
        m.tourism *= tourism;
        m.public_spaces *= public;
        m.sentiment += sentiment;
    }
    m
}

// ---------------------------------------------------------------------------
// Story seeds
// ---------------------------------------------------------------------------

/// Buckets seed weight by cluster and domain, by neighborhood and city-wide.
pub fn story_signal_breakdown(seeds: &[StorySeed]) -> StorySignalBreakdown {
    let mut breakdown = StorySignalBreakdown::default();
    for cluster in Cluster::ALL {
        breakdown.by_cluster.insert(cluster, DomainWeights::default());
    }
    for seed in seeds {
        let weight = seed.weight();
        breakdown.by_domain.add(seed.domain, weight);

        let placed = seed
            .neighborhood
            .as_deref()
            .and_then(canonical_neighborhood)
            .and_then(|name| cluster_of(name).map(|c| (name, c)));
        match placed {
            Some((name, cluster)) => {
                *breakdown.by_neighborhood.entry(name.to_string()).or_insert(0.0) += weight;
                breakdown.by_cluster.entry(cluster).or_default().add(seed.domain, weight);
            }
            None => breakdown.unplaced += weight,
        }
    }
    breakdown
}

/// Strong and mild bucket thresholds.
pub const STORY_STRONG: f64 = 6.0;
pub const STORY_MILD: f64 = 3.0;

pub fn story_modifier(weights: &DomainWeights) -> Modifier {
    let level = |w: f64| tier(w, &[(STORY_STRONG, 2u8), (STORY_MILD, 1u8)]).unwrap_or(0);
    let mut m = Modifier::NONE;
    match level(weights.culture) {
        2 => m.cultural_activity *= 1.12,
        1 => m.cultural_activity *= 1.06,
        _ => {}
    }
    match level(weights.community) {
        2 => {
            m.community_engagement *= 1.12;
            m.sentiment += 0.03;
        }
        1 => {
            m.community_engagement *= 1.06;
            m.sentiment += 0.015;
        }
        _ => {}
    }
    match level(weights.business) {
        2 => m.retail *= 1.10,
        1 => m.retail *= 1.05,
        _ => {}
    }
    match level(weights.nightlife) {
        2 => m.nightlife *= 1.12,
        1 => m.nightlife *= 1.06,
        _ => {}
    }
    match level(weights.civic_safety) {
        2 => {
            m.public_spaces *= 0.94;
            m.sentiment -= 0.06;
        }
        1 => {
            m.public_spaces *= 0.97;
            m.sentiment -= 0.03;
        }
        _ => {}
    }
    m
}

// ---------------------------------------------------------------------------
// Crime
// ---------------------------------------------------------------------------

/// Summed crime for a set of neighborhoods; missing counts read as zero.
pub fn crime_total<'a>(
    signals: Option<&dyn NeighborhoodSignals>,
    neighborhoods: impl IntoIterator<Item = &'a str>,
) -> u32 {
    signals.map_or(0, |s| {
        neighborhoods
            .into_iter()
            .map(|n| s.crime_count(n).unwrap_or(0))
            .fold(0u32, u32::saturating_add)
    })
}

pub fn crime_ripple_modifier(count: u32) -> Modifier {
    let (nightlife, tourism, public, sentiment) = match count {
        0 => return Modifier::NONE,
        1..=2 => (0.95, 0.96, 0.96, -0.05),
        3..=5 => (0.85, 0.88, 0.88, -0.15),
        _ => (0.78, 0.82, 0.82, -0.22),
    };
    let mut m = Modifier::NONE;
    m.nightlife = nightlife;
    m.tourism = tourism;
    m.public_spaces = public;
    m.sentiment = sentiment;
    m
}
