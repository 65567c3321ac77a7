//! Shared data types for the city world-dynamics simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for the engine crate and for any downstream consumer
//! that reads published cycle reports.

pub mod calendar;
pub mod dynamics;
pub mod inputs;
pub mod metrics;
pub mod snapshot;
pub mod weather;

// Re-export calendar types
pub use calendar::{
    CycleCalendar, Holiday, HolidayPriority, ParseCalendarError, Season, SportsPhase,
    MONTHS_PER_YEAR,
};

// Re-export metric types
pub use metrics::{Metric, MetricVector, METRIC_MAX, METRIC_MIN, SENTIMENT_MAX, SENTIMENT_MIN};

// Re-export weather types
pub use weather::{
    CompassPoint, Front, Microclimate, Precipitation, PrecipitationType, PrimaryMood,
    StreakCategory, StreakSnapshot, WeatherAlert, WeatherMood, WeatherObservation, WeatherReport,
    WeatherType, Wind,
};

// Re-export input types
pub use inputs::{
    CapacityOverride, CitySignals, CycleInputs, Demographics, SeedDomain, StorySeed, WorldEvent,
};

// Re-export dynamics types
pub use dynamics::{
    ActivityAverages, CapacitySnapshot, Cluster, ClusterSummary, DomainWeights, DynamicsReport,
    LagSnapshot, StorySignalBreakdown,
};

pub use snapshot::CycleReport;
