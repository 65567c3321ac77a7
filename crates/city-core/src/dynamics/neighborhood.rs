//! Neighborhood Derivation
//!
//! Each neighborhood starts from its bled cluster vector and takes small
//! local adjustments. Neighborhoods never feed back into their cluster.

use city_events::{Demographics, MetricVector, Microclimate, StorySignalBreakdown};

use super::modifiers::Modifier;
use super::signals::NeighborhoodSignals;

/// City temperature above which the warmer neighborhoods empty their parks.
const HOT_CITY_F: f64 = 80.0;
const WARM_OFFSET_F: f64 = 1.5;

fn microclimate_modifier(micro: Option<&Microclimate>, city_temperature: f64) -> Modifier {
    let mut m = Modifier::NONE;
    let Some(micro) = micro else {
        return m;
    };
    if micro.fog {
        m.public_spaces *= 0.94;
        m.tourism *= 0.97;
    }
    let offset = micro.temperature - city_temperature;
    if city_temperature >= HOT_CITY_F && offset > WARM_OFFSET_F {
        m.public_spaces *= 0.96;
    }
    m
}

fn story_weight_modifier(weight: f64) -> Modifier {
    let mut m = Modifier::NONE;
    if weight >= 3.0 {
        m.cultural_activity = 1.04;
        m.community_engagement = 1.04;
        m.sentiment = 0.02;
    } else if weight >= 1.0 {
        m.community_engagement = 1.02;
    }
    m
}

fn local_demographic_modifier(d: &Demographics) -> Modifier {
    let mut m = Modifier::NONE;
    if d.unemployment >= 0.12 {
        m.retail *= 0.95;
        m.sentiment -= 0.03;
    }
    if d.students >= 0.25 {
        m.nightlife *= 1.04;
    }
    if d.seniors >= 0.25 {
        m.community_engagement *= 1.03;
    }
    m
}

fn local_economy_modifier(mood: f64) -> Modifier {
    let mut m = Modifier::NONE;
    if mood >= 70.0 {
        m.retail = 1.05;
        m.sentiment = 0.02;
    } else if mood <= 30.0 {
        m.retail = 0.94;
        m.sentiment = -0.03;
    }
    m
}

fn local_crime_modifier(count: u32) -> Modifier {
    let mut m = Modifier::NONE;
    match count {
        0 => {}
        1..=2 => {
            m.public_spaces = 0.98;
            m.sentiment = -0.01;
        }
        _ => {
            m.nightlife = 0.94;
            m.public_spaces = 0.94;
            m.sentiment = -0.04;
        }
    }
    m
}

/// Inputs a neighborhood reads beyond its cluster vector.
pub struct LocalContext<'a> {
    pub microclimates: &'a [Microclimate],
    pub city_temperature: f64,
    pub story_signals: &'a StorySignalBreakdown,
    pub signals: Option<&'a dyn NeighborhoodSignals>,
}

/// Derives one neighborhood's vector from its cluster's.
pub fn derive(name: &str, cluster_vector: &MetricVector, ctx: &LocalContext<'_>) -> MetricVector {
    let mut v = *cluster_vector;

    let micro = ctx.microclimates.iter().find(|m| m.neighborhood == name);
    microclimate_modifier(micro, ctx.city_temperature).apply(&mut v);
    story_weight_modifier(ctx.story_signals.neighborhood(name)).apply(&mut v);

    if let Some(signals) = ctx.signals {
        if let Some(d) = signals.demographics(name) {
            local_demographic_modifier(&d).apply(&mut v);
        }
        if let Some(mood) = signals.economic_mood(name) {
            local_economy_modifier(mood).apply(&mut v);
        }
        if let Some(count) = signals.crime_count(name) {
            local_crime_modifier(count).apply(&mut v);
        }
    }

    v.clamp_all();
    v
}
