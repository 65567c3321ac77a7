//! Cycle Orchestration
//!
//! Owns the world state and runs the two engines in order: weather first,
//! then the aggregator that reads its published observation.

use city_events::{CycleInputs, CycleReport};

use crate::config::SimConfig;
use crate::dynamics::{self, DynamicsInputs};
use crate::rng::{resolve_rng, InjectedFn, RngChoice};
use crate::state::WorldState;
use crate::weather;

pub struct Simulation {
    config: SimConfig,
    state: WorldState,
    injected: Option<InjectedFn>,
    last_rng: Option<RngChoice>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self::with_state(config, WorldState::new())
    }

    /// Resumes from previously saved state.
    pub fn with_state(config: SimConfig, state: WorldState) -> Self {
        Self {
            config,
            state,
            injected: None,
            last_rng: None,
        }
    }

    /// Every later cycle draws from `source` instead of a seeded generator.
    pub fn with_injected_rng(mut self, source: InjectedFn) -> Self {
        self.injected = Some(source);
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn into_state(self) -> WorldState {
        self.state
    }

    /// Source the most recent cycle drew from.
    pub fn last_rng_choice(&self) -> Option<RngChoice> {
        self.last_rng
    }

    /// Runs one cycle.
    ///
    /// Without a calendar this returns `None` and leaves the world state
    /// exactly as it was.
    pub fn run_cycle(&mut self, inputs: &CycleInputs) -> Option<CycleReport> {
        let calendar = inputs.calendar.clone()?;
        let cycle = calendar.cycle;

        let seed = inputs.rng_seed.or(self.config.rng.seed);
        let (mut rng, choice) = resolve_rng(self.injected.as_mut(), seed, cycle);
        self.last_rng = Some(choice);

        self.state.calendar = Some(calendar.clone());
        let weather = weather::advance(&mut self.state, &mut *rng)?.clone();

        let dynamics_inputs = DynamicsInputs::from_cycle(inputs, &self.config);
        let dynamics = dynamics::advance(&mut self.state, &dynamics_inputs, &self.config)?.clone();

        tracing::info!(
            "Cycle {} complete: {:?} {:.1}F, city sentiment {:.3}, {} alert(s), rng {:?}",
            cycle,
            weather.observation.kind,
            weather.observation.temperature,
            dynamics.city.sentiment,
            weather.alerts.len(),
            choice
        );

        Some(CycleReport {
            cycle,
            calendar,
            weather,
            dynamics,
        })
    }

    /// Runs each input in order, skipping cycles that had nothing to do.
    pub fn run_all<'a, I>(&mut self, inputs: I) -> Vec<CycleReport>
    where
        I: IntoIterator<Item = &'a CycleInputs>,
    {
        inputs
            .into_iter()
            .filter_map(|input| self.run_cycle(input))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::scripted;
    use city_events::{CitySignals, CycleCalendar, SeedDomain, WorldEvent};

    fn seeded(seed: u32) -> Simulation {
        let mut config = SimConfig::default();
        config.rng.seed = Some(seed);
        Simulation::new(config)
    }

    #[test]
    fn test_missing_calendar_leaves_state_untouched() {
        let mut sim = seeded(7);
        sim.run_cycle(&CycleInputs::new(CycleCalendar::new(1, 4)));
        let before = sim.state().clone();
        assert!(sim.run_cycle(&CycleInputs::default()).is_none());
        assert_eq!(sim.state(), &before);
    }

    #[test]
    fn test_input_seed_overrides_config() {
        let mut sim = seeded(7);
        let inputs = CycleInputs::new(CycleCalendar::new(3, 4)).with_seed(99);
        sim.run_cycle(&inputs);
        assert_eq!(
            sim.last_rng_choice(),
            Some(RngChoice::Seeded(crate::rng::cycle_seed(99, 3)))
        );
    }

    #[test]
    fn test_unseeded_uses_entropy() {
        let mut sim = Simulation::new(SimConfig::default());
        let report = sim.run_cycle(&CycleInputs::new(CycleCalendar::new(1, 8)));
        assert!(report.is_some());
        assert_eq!(sim.last_rng_choice(), Some(RngChoice::Entropy));
    }

    #[test]
    fn test_injected_beats_seed() {
        let mut sim = seeded(7).with_injected_rng(scripted(vec![0.2, 0.7, 0.4]));
        let inputs = CycleInputs::new(CycleCalendar::new(1, 8)).with_seed(5);
        assert!(sim.run_cycle(&inputs).is_some());
        assert_eq!(sim.last_rng_choice(), Some(RngChoice::Injected));
    }

    #[test]
    fn test_shock_event_marks_report() {
        let mut sim = seeded(11);
        sim.run_cycle(&CycleInputs::new(CycleCalendar::new(1, 10)));
        let shock = WorldEvent::new("Port closure", SeedDomain::Business).as_shock();
        let inputs =
            CycleInputs::new(CycleCalendar::new(2, 10)).with_world_events(vec![shock]);
        let report = sim.run_cycle(&inputs).unwrap();
        assert!(report.dynamics.shock_active);
        assert!(report.dynamics.momentum_applied);
        assert_eq!(report.dynamics.activity.shocks, 0.5);
    }

    #[test]
    fn test_large_crime_counts_average_cleanly() {
        let mut sim = seeded(13);
        let signals = CitySignals::new().with_crime("Fruitvale", 3_000_000_000);
        let mut last = None;
        for cycle in 1..=2 {
            let inputs =
                CycleInputs::new(CycleCalendar::new(cycle, 6)).with_signals(signals.clone());
            last = sim.run_cycle(&inputs);
        }
        let report = last.unwrap();
        assert_eq!(report.dynamics.activity.window, 2);
        assert_eq!(report.dynamics.activity.crime, 3_000_000_000.0);
    }

    #[test]
    fn test_run_all_skips_empty_cycles() {
        let mut sim = seeded(1);
        let inputs = vec![
            CycleInputs::new(CycleCalendar::new(1, 1)),
            CycleInputs::default(),
            CycleInputs::new(CycleCalendar::new(2, 1)),
        ];
        let reports = sim.run_all(&inputs);
        assert_eq!(reports.iter().map(|r| r.cycle).collect::<Vec<_>>(), vec![1, 2]);
    }
}
