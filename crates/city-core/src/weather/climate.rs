//! Climate Normals
//!
//! Monthly temperature ranges, normal sampling, and front-driven anomalies.

use city_events::{Front, Season};

use crate::rng::{range, standard_normal, UnitSource};

/// Daily low/high normals in degrees Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateRange {
    pub min: f64,
    pub max: f64,
}

impl ClimateRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn mean(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// A sixth of the range, never below one degree.
    pub fn std_dev(&self) -> f64 {
        ((self.max - self.min) / 6.0).max(1.0)
    }
}

/// Used when the month is missing or out of range.
pub const FALLBACK_CLIMATE: ClimateRange = ClimateRange::new(55.0, 72.0);

const MONTHLY_NORMALS: [ClimateRange; 12] = [
    ClimateRange::new(45.0, 58.0),
    ClimateRange::new(47.0, 61.0),
    ClimateRange::new(48.0, 64.0),
    ClimateRange::new(50.0, 67.0),
    ClimateRange::new(53.0, 70.0),
    ClimateRange::new(56.0, 73.0),
    ClimateRange::new(57.0, 74.0),
    ClimateRange::new(58.0, 75.0),
    ClimateRange::new(57.0, 77.0),
    ClimateRange::new(54.0, 73.0),
    ClimateRange::new(49.0, 65.0),
    ClimateRange::new(45.0, 58.0),
];

/// Climate normals for a month (1-12).
pub fn climate_for_month(month: u8) -> ClimateRange {
    match month {
        1..=12 => MONTHLY_NORMALS[usize::from(month - 1)],
        _ => {
            tracing::warn!("Unknown month {}, using fallback climate", month);
            FALLBACK_CLIMATE
        }
    }
}

/// Samples a day's temperature from the climate normal; two draws.
pub fn sample_temperature(climate: ClimateRange, rng: &mut dyn UnitSource) -> f64 {
    let z = standard_normal(rng);
    (climate.mean() + z * climate.std_dev()).clamp(climate.min - 6.0, climate.max + 6.0)
}

/// Anomaly range (low, high) in degrees, applied with the front's sign.
fn anomaly_range(front: Front) -> Option<(f64, f64)> {
    match front {
        Front::Heat => Some((6.0, 16.0)),
        Front::Cold => Some((-4.0, -12.0)),
        Front::Storm => Some((-2.0, -6.0)),
        Front::Rain => Some((-1.0, -4.0)),
        Front::Marine => Some((-2.0, -7.0)),
        Front::Windy => Some((-0.5, -2.5)),
        Front::Clear | Front::Overcast => None,
    }
}

/// Fronts that fight the season get only part of their anomaly.
pub fn is_off_season(front: Front, season: Season) -> bool {
    matches!(
        (front, season),
        (Front::Heat, Season::Winter) | (Front::Cold, Season::Summer)
    )
}

const OFF_SEASON_DAMPING: f64 = 0.35;

/// Temperature delta a front contributes at a given strength.
pub fn front_anomaly(front: Front, strength: f64, season: Season) -> f64 {
    let Some((lo, hi)) = anomaly_range(front) else {
        return 0.0;
    };
    let delta = lo + strength * (hi - lo);
    if is_off_season(front, season) {
        delta * OFF_SEASON_DAMPING
    } else {
        delta
    }
}

/// Full temperature derivation: normal sample, front anomaly, then one
/// degree of jitter. Three draws.
pub fn derive_temperature(
    month: u8,
    front: Front,
    strength: f64,
    season: Season,
    rng: &mut dyn UnitSource,
) -> f64 {
    let climate = climate_for_month(month);
    let base = sample_temperature(climate, rng);
    let anomalous = base + front_anomaly(front, strength, season);
    anomalous + range(rng, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{scripted, FnSource, Mulberry32};

    #[test]
    fn test_unknown_month_falls_back() {
        assert_eq!(climate_for_month(0), FALLBACK_CLIMATE);
        assert_eq!(climate_for_month(13), FALLBACK_CLIMATE);
        assert_eq!(climate_for_month(1), ClimateRange::new(45.0, 58.0));
    }

    #[test]
    fn test_std_dev_floor() {
        assert_eq!(ClimateRange::new(60.0, 62.0).std_dev(), 1.0);
        assert!((ClimateRange::new(45.0, 63.0).std_dev() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_cold_front_in_winter() {
        // -(4 + 0.6 * 8) with no seasonal damping
        let delta = front_anomaly(Front::Cold, 0.6, Season::Winter);
        assert!((delta - -8.8).abs() < 1e-9);
        assert!((50.0 + delta - 41.2).abs() < 1e-9);
    }

    #[test]
    fn test_heat_in_winter_is_damped() {
        let summer = front_anomaly(Front::Heat, 0.5, Season::Summer);
        let winter = front_anomaly(Front::Heat, 0.5, Season::Winter);
        assert!((summer - 11.0).abs() < 1e-9);
        assert!((winter - 11.0 * 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_clear_has_no_anomaly() {
        assert_eq!(front_anomaly(Front::Clear, 0.9, Season::Summer), 0.0);
        assert_eq!(front_anomaly(Front::Overcast, 0.9, Season::Winter), 0.0);
    }

    #[test]
    fn test_sample_is_clamped() {
        let mut rng = Mulberry32::new(3);
        let climate = climate_for_month(7);
        for _ in 0..2000 {
            let t = sample_temperature(climate, &mut rng);
            assert!(t >= climate.min - 6.0 && t <= climate.max + 6.0);
        }
    }

    #[test]
    fn test_median_draw_gives_mean() {
        // u2 = 0.25 puts cos(2*pi*u2) at zero, so z = 0
        let mut f = scripted(vec![0.5, 0.25, 0.5]);
        let mut rng = FnSource::new(move || f());
        let t = derive_temperature(1, Front::Clear, 0.5, Season::Winter, &mut rng);
        assert!((t - 51.5).abs() < 1e-9);
    }
}
