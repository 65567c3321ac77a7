//! World-state save/resume and config file round trips.

use std::io::Write;

use city_core::config::default_config_toml;
use city_core::{SimConfig, Simulation, SyntheticCalendar, WorldState};
use city_events::CycleInputs;

fn seeded_config(seed: u32) -> SimConfig {
    let mut config = SimConfig::default();
    config.rng.seed = Some(seed);
    config
}

#[test]
fn test_resume_from_saved_state() {
    let calendar = SyntheticCalendar::new(9);

    let mut straight = Simulation::new(seeded_config(5));
    let uninterrupted: Vec<_> = (1..=24)
        .filter_map(|c| straight.run_cycle(&CycleInputs::new(calendar.calendar_for(c))))
        .collect();

    let mut first_half = Simulation::new(seeded_config(5));
    for c in 1..=12 {
        first_half.run_cycle(&CycleInputs::new(calendar.calendar_for(c)));
    }
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), serde_json::to_string(first_half.state()).unwrap()).unwrap();

    let restored: WorldState =
        serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(restored.current_cycle(), Some(12));
    let mut resumed = Simulation::with_state(seeded_config(5), restored);
    let second_half: Vec<_> = (13..=24)
        .filter_map(|c| resumed.run_cycle(&CycleInputs::new(calendar.calendar_for(c))))
        .collect();

    for (a, b) in uninterrupted[12..].iter().zip(&second_half) {
        assert_eq!(a.cycle, b.cycle);
        assert_eq!(a.weather.observation.front, b.weather.observation.front);
        assert_eq!(a.weather.observation.kind, b.weather.observation.kind);
        assert_eq!(a.weather.alerts, b.weather.alerts);
        assert!((a.dynamics.city.sentiment - b.dynamics.city.sentiment).abs() < 1e-9);
        assert!((a.dynamics.city.traffic - b.dynamics.city.traffic).abs() < 1e-9);
    }
}

#[test]
fn test_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(default_config_toml().as_bytes()).unwrap();
    let loaded = SimConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded, SimConfig::default());

    let custom = seeded_config(31);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(custom.to_toml().unwrap().as_bytes()).unwrap();
    assert_eq!(SimConfig::from_file(file.path()).unwrap(), custom);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SimConfig::from_file(&dir.path().join("absent.toml")).is_err());
}
