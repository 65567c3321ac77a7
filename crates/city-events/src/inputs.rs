//! Cycle Inputs
//!
//! Signals supplied by the host for one cycle. Every field other than the
//! calendar is optional; absent signals resolve to neutral values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::calendar::CycleCalendar;

/// Population ratios for one neighborhood, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Demographics {
    pub unemployment: f64,
    pub sickness: f64,
    pub students: f64,
    pub seniors: f64,
}

/// Per-neighborhood signal maps keyed by neighborhood name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CitySignals {
    pub demographics: BTreeMap<String, Demographics>,
    /// Economic mood, 0-100 with 50 as neutral
    pub economic_mood: BTreeMap<String, f64>,
    pub crime: BTreeMap<String, u32>,
}

impl CitySignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demographics(mut self, neighborhood: impl Into<String>, d: Demographics) -> Self {
        self.demographics.insert(neighborhood.into(), d);
        self
    }

    pub fn with_economic_mood(mut self, neighborhood: impl Into<String>, mood: f64) -> Self {
        self.economic_mood.insert(neighborhood.into(), mood);
        self
    }

    pub fn with_crime(mut self, neighborhood: impl Into<String>, count: u32) -> Self {
        self.crime.insert(neighborhood.into(), count);
        self
    }
}

/// Coverage domain for story seeds and world events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeedDomain {
    Culture,
    Community,
    Business,
    Nightlife,
    Civic,
    Safety,
    #[default]
    #[serde(other)]
    General,
}

impl fmt::Display for SeedDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedDomain::Culture => "CULTURE",
            SeedDomain::Community => "COMMUNITY",
            SeedDomain::Business => "BUSINESS",
            SeedDomain::Nightlife => "NIGHTLIFE",
            SeedDomain::Civic => "CIVIC",
            SeedDomain::Safety => "SAFETY",
            SeedDomain::General => "GENERAL",
        };
        write!(f, "{}", name)
    }
}

/// A narrative prompt produced upstream that carries weight in a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySeed {
    #[serde(default)]
    pub domain: SeedDomain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    /// 1 (low) to 3 (high); other values weigh as 1
    #[serde(default = "default_priority")]
    pub priority: u8,
}

fn default_priority() -> u8 {
    1
}

impl StorySeed {
    pub fn new(domain: SeedDomain, neighborhood: Option<&str>, priority: u8) -> Self {
        Self {
            domain,
            neighborhood: neighborhood.map(str::to_string),
            priority,
        }
    }

    /// Signal weight contributed by this seed.
    pub fn weight(&self) -> f64 {
        match self.priority {
            3 => 3.0,
            2 => 2.0,
            _ => 1.0,
        }
    }
}

/// Something that happened in the world this cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub domain: SeedDomain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    /// Shock events shorten momentum memory
    #[serde(default)]
    pub shock: bool,
}

impl WorldEvent {
    pub fn new(description: impl Into<String>, domain: SeedDomain) -> Self {
        Self {
            description: description.into(),
            domain,
            neighborhood: None,
            shock: false,
        }
    }

    pub fn in_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    pub fn as_shock(mut self) -> Self {
        self.shock = true;
        self
    }
}

/// Partial capacity override; unset fields keep the configured value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CapacityOverride {
    pub transit_capacity: Option<f64>,
    pub venue_capacity: Option<f64>,
    pub road_capacity: Option<f64>,
}

/// Everything the host hands the engines for a single cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CycleInputs {
    /// Top-level context; a cycle without it is a no-op
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CycleCalendar>,
    #[serde(default)]
    pub signals: CitySignals,
    #[serde(default)]
    pub world_events: Vec<WorldEvent>,
    #[serde(default)]
    pub story_seeds: Vec<StorySeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<CapacityOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u32>,
    #[serde(default)]
    pub reset_momentum: bool,
    /// Explicit shock flag, in addition to shock world events
    #[serde(default)]
    pub shock: bool,
}

impl CycleInputs {
    pub fn new(calendar: CycleCalendar) -> Self {
        Self {
            calendar: Some(calendar),
            ..Self::default()
        }
    }

    pub fn with_signals(mut self, signals: CitySignals) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_story_seeds(mut self, seeds: Vec<StorySeed>) -> Self {
        self.story_seeds = seeds;
        self
    }

    pub fn with_world_events(mut self, events: Vec<WorldEvent>) -> Self {
        self.world_events = events;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Number of shock signals this cycle (events plus the explicit flag).
    pub fn shock_count(&self) -> u32 {
        let from_events = self.world_events.iter().filter(|e| e.shock).count() as u32;
        from_events + u32::from(self.shock)
    }
}
