//! Neighborhood Microclimates
//!
//! Fixed per-neighborhood temperature offsets and independent fog rolls. They
//! share the city's front and season; none carries state between cycles.

use city_events::{Front, Microclimate, WeatherType};

use super::derive::round1;
use crate::rng::{unit, UnitSource};

pub struct MicroclimateProfile {
    pub neighborhood: &'static str,
    /// Degrees added to the city temperature
    pub temperature_offset: f64,
    /// Fog chance on an ordinary day
    pub fog_base: f64,
}

const fn profile(neighborhood: &'static str, temperature_offset: f64, fog_base: f64) -> MicroclimateProfile {
    MicroclimateProfile {
        neighborhood,
        temperature_offset,
        fog_base,
    }
}

/// Fog rolls are drawn in this order.
pub const PROFILES: [MicroclimateProfile; 12] = [
    profile("Downtown", 0.0, 0.05),
    profile("Uptown", 0.0, 0.05),
    profile("KONO", 0.5, 0.05),
    profile("Jack London", -2.0, 0.18),
    profile("West Oakland", -1.5, 0.15),
    profile("Lake Merritt", -0.5, 0.08),
    profile("Adams Point", -0.5, 0.08),
    profile("Grand Lake", 0.0, 0.07),
    profile("Rockridge", 1.0, 0.06),
    profile("Temescal", 0.5, 0.06),
    profile("Fruitvale", 2.0, 0.04),
    profile("Laurel", 2.5, 0.04),
];

const FOG_PROBABILITY_MAX: f64 = 0.95;

fn front_fog_multiplier(front: Front) -> f64 {
    match front {
        Front::Marine => 2.0,
        Front::Storm => 1.4,
        _ => 1.0,
    }
}

/// Fog chance for one neighborhood under the city's conditions.
pub fn fog_probability(profile: &MicroclimateProfile, front: Front, kind: WeatherType) -> f64 {
    let mut p = profile.fog_base * front_fog_multiplier(front);
    if kind == WeatherType::Fog {
        p += 0.3;
    }
    p.clamp(0.0, FOG_PROBABILITY_MAX)
}

/// One fog draw per neighborhood, in `PROFILES` order.
pub fn fan_out(
    temperature: f64,
    front: Front,
    kind: WeatherType,
    rng: &mut dyn UnitSource,
) -> Vec<Microclimate> {
    PROFILES
        .iter()
        .map(|p| {
            let probability = fog_probability(p, front, kind);
            let fog = unit(rng) < probability;
            Microclimate {
                neighborhood: p.neighborhood.to_string(),
                temperature: round1(temperature + p.temperature_offset),
                fog,
                fog_probability: probability,
            }
        })
        .collect()
}

/// Profile lookup by neighborhood name.
pub fn profile_for(neighborhood: &str) -> Option<&'static MicroclimateProfile> {
    PROFILES.iter().find(|p| p.neighborhood == neighborhood)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FnSource, Mulberry32};

    #[test]
    fn test_marine_doubles_fog() {
        let jack_london = profile_for("Jack London").unwrap();
        let clear = fog_probability(jack_london, Front::Clear, WeatherType::Clear);
        let marine = fog_probability(jack_london, Front::Marine, WeatherType::Overcast);
        assert!((marine - 2.0 * clear).abs() < 1e-12);
    }

    #[test]
    fn test_fog_probability_capped() {
        let jack_london = profile_for("Jack London").unwrap();
        let p = fog_probability(jack_london, Front::Marine, WeatherType::Fog);
        assert!((p - 0.66).abs() < 1e-12);
        assert!(p <= FOG_PROBABILITY_MAX);
    }

    #[test]
    fn test_fan_out_draws_once_per_neighborhood() {
        let count = std::cell::Cell::new(0);
        let mut rng = FnSource::new(|| {
            count.set(count.get() + 1);
            0.99
        });
        let micro = fan_out(60.0, Front::Clear, WeatherType::Clear, &mut rng);
        assert_eq!(count.get(), PROFILES.len());
        assert_eq!(micro.len(), 12);
        assert!(micro.iter().all(|m| !m.fog));
        assert_eq!(micro[11].neighborhood, "Laurel");
        assert_eq!(micro[11].temperature, 62.5);
    }

    #[test]
    fn test_fog_type_fogs_the_waterfront() {
        let mut rng = Mulberry32::new(1);
        let micro = fan_out(55.0, Front::Marine, WeatherType::Fog, &mut rng);
        for m in &micro {
            assert!(m.fog_probability >= 0.3);
            assert!(m.fog_probability <= FOG_PROBABILITY_MAX);
        }
    }

    #[test]
    fn test_unknown_neighborhood() {
        assert!(profile_for("Atlantis").is_none());
    }
}
