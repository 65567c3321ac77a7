//! World State
//!
//! The single per-world record the engines mutate once per cycle. Each engine
//! owns a disjoint set of fields; every persistent structure starts as `None`
//! and is default-constructed the first cycle it is touched.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use city_events::{
    ActivityAverages, CycleCalendar, DynamicsReport, Front, LagSnapshot, MetricVector, Season,
    StreakCategory, WeatherAlert, WeatherReport, WeatherType,
};

/// Maximum entries kept in the front history.
pub const FRONT_HISTORY_LEN: usize = 10;
/// Maximum entries kept in the weather history.
pub const WEATHER_HISTORY_LEN: usize = 7;
/// Default activity ring buffer capacity.
pub const ACTIVITY_HISTORY_LEN: usize = 12;
/// Default rolling window for activity averages.
pub const ACTIVITY_WINDOW: usize = 6;

/// Initial front strength for a fresh world.
pub const INITIAL_FRONT_STRENGTH: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontHistoryEntry {
    pub cycle: u64,
    pub front: Front,
    pub strength: f64,
}

/// Persistent front state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontTrackingState {
    pub front_state: Front,
    /// Consecutive cycles in the current front, at least 1
    pub front_streak: u32,
    pub front_strength: f64,
    pub last_transition_cycle: u64,
    pub history: VecDeque<FrontHistoryEntry>,
}

impl Default for FrontTrackingState {
    fn default() -> Self {
        Self {
            front_state: Front::Clear,
            front_streak: 1,
            front_strength: INITIAL_FRONT_STRENGTH,
            last_transition_cycle: 0,
            history: VecDeque::new(),
        }
    }
}

impl FrontTrackingState {
    pub fn record(&mut self, cycle: u64) {
        self.history.push_back(FrontHistoryEntry {
            cycle,
            front: self.front_state,
            strength: self.front_strength,
        });
        while self.history.len() > FRONT_HISTORY_LEN {
            self.history.pop_front();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherHistoryEntry {
    pub cycle: u64,
    pub kind: WeatherType,
    pub temperature: f64,
    pub category: StreakCategory,
}

/// Persistent streak and season-first bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeatherTrackingState {
    pub streak_category: Option<StreakCategory>,
    pub streak_days: u32,
    /// Season the `season_firsts` flags belong to
    pub season: Option<Season>,
    pub season_firsts: BTreeSet<String>,
    pub history: VecDeque<WeatherHistoryEntry>,
    /// Recomputed every cycle, never accumulated
    pub active_alerts: BTreeSet<WeatherAlert>,
}

impl WeatherTrackingState {
    pub fn record(&mut self, entry: WeatherHistoryEntry) {
        self.history.push_back(entry);
        while self.history.len() > WEATHER_HISTORY_LEN {
            self.history.pop_front();
        }
    }
}

/// Decaying penalty accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LagState {
    /// [0, 0.5]
    pub tourism_drag: f64,
    /// [0, 0.5]
    pub public_space_drag: f64,
    /// [0, 0.5]
    pub nightlife_drag: f64,
    /// [0, 0.4]
    pub congestion_hangover: f64,
}

impl LagState {
    pub const DRAG_MAX: f64 = 0.5;
    pub const HANGOVER_MAX: f64 = 0.4;

    pub fn clamp_all(&mut self) {
        self.tourism_drag = self.tourism_drag.clamp(0.0, Self::DRAG_MAX);
        self.public_space_drag = self.public_space_drag.clamp(0.0, Self::DRAG_MAX);
        self.nightlife_drag = self.nightlife_drag.clamp(0.0, Self::DRAG_MAX);
        self.congestion_hangover = self.congestion_hangover.clamp(0.0, Self::HANGOVER_MAX);
    }

    pub fn snapshot(&self) -> LagSnapshot {
        LagSnapshot {
            tourism_drag: self.tourism_drag,
            public_space_drag: self.public_space_drag,
            nightlife_drag: self.nightlife_drag,
            congestion_hangover: self.congestion_hangover,
        }
    }
}

/// Observed activity for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ActivityCounts {
    pub events: u32,
    pub story_seed_count: u32,
    pub media: u32,
    pub crime: u32,
    pub shock_count: u32,
}

/// Bounded ring buffer of activity counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityHistory {
    pub entries: VecDeque<ActivityCounts>,
    pub capacity: usize,
}

impl Default for ActivityHistory {
    fn default() -> Self {
        Self::with_capacity(ACTIVITY_HISTORY_LEN)
    }
}

impl ActivityHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, counts: ActivityCounts) {
        self.entries.push_back(counts);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Averages over the most recent `window` entries.
    pub fn averages(&self, window: usize) -> ActivityAverages {
        let n = window.min(self.entries.len());
        if n == 0 {
            return ActivityAverages::default();
        }
        // widened so a window of saturated counts still sums
        let mut sum = [0u64; 5];
        for c in self.entries.iter().rev().take(n) {
            let fields = [c.events, c.story_seed_count, c.media, c.crime, c.shock_count];
            for (total, value) in sum.iter_mut().zip(fields) {
                *total += u64::from(value);
            }
        }
        let [events, story_seeds, media, crime, shocks] = sum.map(|total| total as f64 / n as f64);
        ActivityAverages {
            events,
            story_seeds,
            media,
            crime,
            shocks,
            window: n,
        }
    }
}

/// Shared per-world record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldState {
    /// Calendar for the cycle being run; absent means nothing to do
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CycleCalendar>,

    // Weather Front Simulator
    #[serde(default)]
    pub front: Option<FrontTrackingState>,
    #[serde(default)]
    pub weather_tracking: Option<WeatherTrackingState>,
    #[serde(default)]
    pub weather: Option<WeatherReport>,

    // City Dynamics Aggregator
    #[serde(default)]
    pub lag: Option<LagState>,
    #[serde(default)]
    pub activity: Option<ActivityHistory>,
    #[serde(default)]
    pub previous_city: Option<MetricVector>,
    #[serde(default)]
    pub dynamics: Option<DynamicsReport>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears momentum history only.
    pub fn reset_momentum(&mut self) {
        self.previous_city = None;
    }

    pub fn current_cycle(&self) -> Option<u64> {
        self.calendar.as_ref().map(|c| c.cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_history_is_bounded() {
        let mut front = FrontTrackingState::default();
        for cycle in 0..25 {
            front.record(cycle);
        }
        assert_eq!(front.history.len(), FRONT_HISTORY_LEN);
        assert_eq!(front.history.front().map(|e| e.cycle), Some(15));
    }

    #[test]
    fn test_activity_history_bounded_and_windowed() {
        let mut history = ActivityHistory::default();
        for i in 0..20u32 {
            history.push(ActivityCounts {
                events: i,
                ..ActivityCounts::default()
            });
        }
        assert_eq!(history.entries.len(), ACTIVITY_HISTORY_LEN);

        // Last six entries are 14..=19
        let avg = history.averages(ACTIVITY_WINDOW);
        assert_eq!(avg.window, 6);
        assert!((avg.events - 16.5).abs() < 1e-12);
    }

    #[test]
    fn test_activity_averages_at_count_limits() {
        let mut history = ActivityHistory::default();
        for _ in 0..3 {
            history.push(ActivityCounts {
                crime: u32::MAX,
                media: u32::MAX,
                ..ActivityCounts::default()
            });
        }
        let avg = history.averages(ACTIVITY_WINDOW);
        assert_eq!(avg.window, 3);
        assert_eq!(avg.crime, f64::from(u32::MAX));
        assert_eq!(avg.media, f64::from(u32::MAX));
        assert_eq!(avg.events, 0.0);
    }

    #[test]
    fn test_activity_averages_empty() {
        let history = ActivityHistory::default();
        let avg = history.averages(ACTIVITY_WINDOW);
        assert_eq!(avg.window, 0);
        assert_eq!(avg.events, 0.0);
    }

    #[test]
    fn test_lag_clamp() {
        let mut lag = LagState {
            tourism_drag: 0.9,
            public_space_drag: -0.2,
            nightlife_drag: 0.3,
            congestion_hangover: 0.7,
        };
        lag.clamp_all();
        assert_eq!(lag.tourism_drag, 0.5);
        assert_eq!(lag.public_space_drag, 0.0);
        assert_eq!(lag.nightlife_drag, 0.3);
        assert_eq!(lag.congestion_hangover, 0.4);
    }

    #[test]
    fn test_reset_momentum_only_clears_previous() {
        let mut state = WorldState::new();
        state.previous_city = Some(MetricVector::neutral());
        state.lag = Some(LagState::default());
        state.reset_momentum();
        assert!(state.previous_city.is_none());
        assert!(state.lag.is_some());
    }

    #[test]
    fn test_world_state_json_roundtrip() {
        let mut state = WorldState::new();
        state.front = Some(FrontTrackingState::default());
        let json = serde_json::to_string(&state).unwrap();
        let back: WorldState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
