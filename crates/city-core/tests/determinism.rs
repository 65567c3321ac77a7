//! Determinism verification tests
//!
//! The same seed and the same inputs must produce byte-identical output.

use city_core::rng::{cycle_seed, scripted, Mulberry32};
use city_core::{SimConfig, Simulation, SyntheticCalendar};
use city_events::{CitySignals, CycleInputs, SeedDomain, StorySeed, WorldEvent};
use rand::RngCore;

fn inputs_for(calendar: &SyntheticCalendar, cycle: u64) -> CycleInputs {
    let mut inputs = CycleInputs::new(calendar.calendar_for(cycle));
    if cycle % 3 == 0 {
        inputs = inputs
            .with_signals(
                CitySignals::new()
                    .with_crime("Fruitvale", (cycle % 5) as u32)
                    .with_economic_mood("Rockridge", 72.0),
            )
            .with_story_seeds(vec![
                StorySeed::new(SeedDomain::Culture, Some("Uptown"), 3),
                StorySeed::new(SeedDomain::Community, None, 1),
            ]);
    }
    if cycle % 17 == 0 {
        inputs = inputs.with_world_events(vec![
            WorldEvent::new("Bridge closure", SeedDomain::Civic).as_shock()
        ]);
    }
    inputs
}

fn run_lines(seed: u32, cycles: u64) -> Vec<String> {
    let mut config = SimConfig::default();
    config.rng.seed = Some(seed);
    let mut sim = Simulation::new(config);
    let calendar = SyntheticCalendar::new(3);
    (1..=cycles)
        .filter_map(|cycle| sim.run_cycle(&inputs_for(&calendar, cycle)))
        .map(|report| report.to_json_line().unwrap())
        .collect()
}

/// Test that two runs with the same seed are byte-identical
#[test]
fn test_same_seed_identical_output() {
    let first = run_lines(42, 96);
    let second = run_lines(42, 96);
    assert_eq!(first.len(), 96);
    assert_eq!(first, second, "Runs with the same seed should be identical");
}

/// Test that different seeds diverge
#[test]
fn test_different_seeds_diverge() {
    assert_ne!(run_lines(42, 24), run_lines(43, 24));
}

/// Test that Mulberry32 reproduces its sequence
#[test]
fn test_mulberry_determinism() {
    let mut a = Mulberry32::new(cycle_seed(7, 12));
    let mut b = Mulberry32::new(cycle_seed(7, 12));
    let xs: Vec<u32> = (0..100).map(|_| a.next_u32()).collect();
    let ys: Vec<u32> = (0..100).map(|_| b.next_u32()).collect();
    assert_eq!(xs, ys);
}

/// Test that an injected sampler drives the weather identically across runs
#[test]
fn test_injected_source_reproducible() {
    let run = || {
        let mut sim = Simulation::new(SimConfig::default())
            .with_injected_rng(scripted(vec![0.13, 0.58, 0.91, 0.32, 0.77, 0.05, 0.44]));
        let calendar = SyntheticCalendar::new(8);
        (1..=20)
            .filter_map(|cycle| sim.run_cycle(&CycleInputs::new(calendar.calendar_for(cycle))))
            .map(|report| report.to_json_line().unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

/// Test that a per-cycle seed reproduces one cycle in isolation
#[test]
fn test_cycle_reproducible_in_isolation() {
    let calendar = SyntheticCalendar::new(5);
    let inputs = CycleInputs::new(calendar.calendar_for(1)).with_seed(1234);
    let a = Simulation::new(SimConfig::default()).run_cycle(&inputs).unwrap();
    let b = Simulation::new(SimConfig::default()).run_cycle(&inputs).unwrap();
    assert_eq!(a, b);
}
