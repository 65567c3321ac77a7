//! Weather Types
//!
//! Fronts, observations, mood, alerts and microclimates published once per cycle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Multi-day weather regime driving the front state machine.
///
/// Serialized as the uppercase name. Deserialization ignores case, and a name
/// that is not a known front reads back as `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Front {
    #[default]
    Clear,
    Overcast,
    Rain,
    Storm,
    Marine,
    Windy,
    Heat,
    Cold,
}

impl Front {
    /// All fronts in transition-table order.
    pub const ALL: [Front; 8] = [
        Front::Clear,
        Front::Overcast,
        Front::Rain,
        Front::Storm,
        Front::Marine,
        Front::Windy,
        Front::Heat,
        Front::Cold,
    ];

    /// Row/column index in the transition table.
    pub fn index(self) -> usize {
        match self {
            Front::Clear => 0,
            Front::Overcast => 1,
            Front::Rain => 2,
            Front::Storm => 3,
            Front::Marine => 4,
            Front::Windy => 5,
            Front::Heat => 6,
            Front::Cold => 7,
        }
    }

    /// Front for a table index; out-of-range indices fall back to `Clear`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

impl From<String> for Front {
    fn from(name: String) -> Self {
        let name = name.trim();
        Front::ALL
            .into_iter()
            .find(|front| front.to_string().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }
}

impl fmt::Display for Front {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Front::Clear => "CLEAR",
            Front::Overcast => "OVERCAST",
            Front::Rain => "RAIN",
            Front::Storm => "STORM",
            Front::Marine => "MARINE",
            Front::Windy => "WINDY",
            Front::Heat => "HEAT",
            Front::Cold => "COLD",
        };
        write!(f, "{}", name)
    }
}

/// Categorical weather for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherType {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Thunderstorm,
    Windy,
    Hot,
    Cold,
    Snow,
}

impl WeatherType {
    /// Coarse category used for streak tracking.
    pub fn streak_category(self) -> StreakCategory {
        match self {
            WeatherType::Clear | WeatherType::PartlyCloudy => StreakCategory::Clear,
            WeatherType::Overcast => StreakCategory::Cloudy,
            WeatherType::Fog => StreakCategory::Fog,
            WeatherType::Drizzle | WeatherType::Rain | WeatherType::HeavyRain => {
                StreakCategory::Rain
            }
            WeatherType::Thunderstorm => StreakCategory::Storm,
            WeatherType::Windy => StreakCategory::Wind,
            WeatherType::Hot => StreakCategory::Hot,
            WeatherType::Cold => StreakCategory::Cold,
            WeatherType::Snow => StreakCategory::Snow,
        }
    }
}

/// Nine-way normalization of weather types for streaks and season firsts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakCategory {
    Clear,
    Cloudy,
    Fog,
    Rain,
    Storm,
    Wind,
    Hot,
    Cold,
    Snow,
}

impl fmt::Display for StreakCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreakCategory::Clear => "clear",
            StreakCategory::Cloudy => "cloudy",
            StreakCategory::Fog => "fog",
            StreakCategory::Rain => "rain",
            StreakCategory::Storm => "storm",
            StreakCategory::Wind => "wind",
            StreakCategory::Hot => "hot",
            StreakCategory::Cold => "cold",
            StreakCategory::Snow => "snow",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrecipitationType {
    #[default]
    None,
    Drizzle,
    Rain,
    Snow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Precipitation {
    #[serde(rename = "type")]
    pub kind: PrecipitationType,
    /// 0.0 (none) to 1.0 (extreme)
    pub intensity: f64,
}

impl Precipitation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_falling(&self) -> bool {
        self.kind != PrecipitationType::None && self.intensity > 0.0
    }
}

/// Eight-point compass heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    const ORDER: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    /// Quantizes a heading in degrees to the nearest of eight points.
    pub fn from_degrees(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let sector = ((normalized / 45.0).round() as usize) % 8;
        Self::ORDER[sector]
    }

    /// Heading of this point in degrees.
    pub fn degrees(self) -> f64 {
        Self::ORDER.iter().position(|&p| p == self).unwrap_or(0) as f64 * 45.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Miles per hour
    pub speed: f64,
    /// Quantized heading in degrees
    pub direction_deg: f64,
    pub direction: CompassPoint,
}

/// The day's weather, recomputed each cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub cycle: u64,
    /// Degrees Fahrenheit
    pub temperature: f64,
    #[serde(rename = "type")]
    pub kind: WeatherType,
    /// 0 = no disruption; typically at most ~2
    pub impact: f64,
    /// Percent, 15-98
    pub humidity: f64,
    pub wind: Wind,
    pub precipitation: Precipitation,
    /// Miles, 1-10
    pub visibility: f64,
    pub front: Front,
    pub front_strength: f64,
    pub front_streak: u32,
}

/// Dominant emotional tone the weather sets for the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryMood {
    Energized,
    Content,
    Cozy,
    Subdued,
    Nostalgic,
    Restless,
    Irritable,
    Anxious,
}

/// Comfort index and the mood vector derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMood {
    pub comfort_index: f64,
    pub primary_mood: PrimaryMood,
    pub energy_level: f64,
    pub social_inclination: f64,
    pub irritability_factor: f64,
    pub conflict_potential: f64,
    pub creativity_boost: f64,
    pub nostalgia_factor: f64,
    pub perfect_weather: bool,
}

/// Multi-day advisories recomputed every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherAlert {
    HeatWave,
    ProlongedRain,
    StormAdvisory,
    ColdSnap,
    FogAdvisory,
}

/// Local conditions for one neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microclimate {
    pub neighborhood: String,
    pub temperature: f64,
    pub fog: bool,
    pub fog_probability: f64,
}

/// Current streak of one weather category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSnapshot {
    pub category: StreakCategory,
    pub days: u32,
}

/// Everything the weather simulator publishes for a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub observation: WeatherObservation,
    pub mood: WeatherMood,
    pub alerts: BTreeSet<WeatherAlert>,
    pub streak: StreakSnapshot,
    /// Season-first flags recorded this cycle, e.g. `fall:rain`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub season_firsts: Vec<String>,
    pub microclimates: Vec<Microclimate>,
}

impl WeatherReport {
    pub fn has_alert(&self, alert: WeatherAlert) -> bool {
        self.alerts.contains(&alert)
    }

    pub fn microclimate(&self, neighborhood: &str) -> Option<&Microclimate> {
        self.microclimates
            .iter()
            .find(|m| m.neighborhood == neighborhood)
    }
}
