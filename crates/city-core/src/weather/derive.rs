//! Derived Conditions
//!
//! Weather type, precipitation, humidity, wind, visibility and impact, all
//! derived from the front, the season and the sampled temperature.

use city_events::{
    CompassPoint, Front, Precipitation, PrecipitationType, Season, WeatherType, Wind,
};

use crate::rng::{range, unit, weighted_index, UnitSource};

/// Freezing point in degrees Fahrenheit.
const FREEZING_F: f64 = 32.0;
/// Chance a freezing winter cold front brings snow.
const SNOW_CHANCE: f64 = 0.15;

fn type_weights(front: Front) -> &'static [(WeatherType, f64)] {
    match front {
        Front::Clear => &[
            (WeatherType::Clear, 0.55),
            (WeatherType::PartlyCloudy, 0.35),
            (WeatherType::Fog, 0.10),
        ],
        Front::Overcast => &[
            (WeatherType::Overcast, 0.60),
            (WeatherType::PartlyCloudy, 0.25),
            (WeatherType::Drizzle, 0.15),
        ],
        Front::Rain => &[
            (WeatherType::Rain, 0.55),
            (WeatherType::Drizzle, 0.25),
            (WeatherType::HeavyRain, 0.20),
        ],
        Front::Storm => &[
            (WeatherType::Thunderstorm, 0.45),
            (WeatherType::HeavyRain, 0.40),
            (WeatherType::Windy, 0.15),
        ],
        Front::Marine => &[
            (WeatherType::Fog, 0.60),
            (WeatherType::Overcast, 0.25),
            (WeatherType::Drizzle, 0.15),
        ],
        Front::Windy => &[
            (WeatherType::Windy, 0.65),
            (WeatherType::PartlyCloudy, 0.20),
            (WeatherType::Clear, 0.15),
        ],
        Front::Heat => &[(WeatherType::Hot, 0.75), (WeatherType::Clear, 0.25)],
        Front::Cold => &[
            (WeatherType::Cold, 0.70),
            (WeatherType::Clear, 0.20),
            (WeatherType::Overcast, 0.10),
        ],
    }
}

fn season_type_factor(season: Season, kind: WeatherType) -> f64 {
    match (season, kind) {
        (Season::Summer, WeatherType::Fog) => 1.5,
        (Season::Winter, WeatherType::Cold) => 1.3,
        (Season::Winter, WeatherType::Hot) => 0.5,
        (Season::Fall, WeatherType::Hot) => 1.2,
        (Season::Spring, WeatherType::Drizzle) => 1.2,
        _ => 1.0,
    }
}

/// Picks the day's weather type; one draw.
pub fn pick_weather_type(front: Front, season: Season, rng: &mut dyn UnitSource) -> WeatherType {
    let table = type_weights(front);
    let weights: Vec<f64> = table
        .iter()
        .map(|&(kind, w)| w * season_type_factor(season, kind))
        .collect();
    weighted_index(rng, &weights)
        .map(|i| table[i].0)
        .unwrap_or(table[0].0)
}

/// Precipitation for the day. RAIN and STORM fronts always rain (one draw);
/// a freezing winter cold front rolls for snow (one draw). May upgrade the
/// weather type to snow.
pub fn derive_precipitation(
    front: Front,
    strength: f64,
    season: Season,
    temperature: f64,
    kind: &mut WeatherType,
    rng: &mut dyn UnitSource,
) -> Precipitation {
    match front {
        Front::Rain | Front::Storm => {
            let (base, scale) = if front == Front::Storm {
                (0.45, 0.5)
            } else {
                (0.25, 0.45)
            };
            let heavy = matches!(kind, WeatherType::HeavyRain | WeatherType::Thunderstorm);
            let mut intensity = base + strength * scale + range(rng, -0.05, 0.05);
            if heavy {
                intensity += 0.1;
            }
            Precipitation {
                kind: PrecipitationType::Rain,
                intensity: round2(intensity.clamp(0.0, 1.0)),
            }
        }
        Front::Cold if season == Season::Winter && temperature <= FREEZING_F => {
            if unit(rng) < SNOW_CHANCE {
                *kind = WeatherType::Snow;
                Precipitation {
                    kind: PrecipitationType::Snow,
                    intensity: round2((0.2 + strength * 0.3).clamp(0.0, 1.0)),
                }
            } else {
                Precipitation::none()
            }
        }
        _ if *kind == WeatherType::Drizzle => Precipitation {
            kind: PrecipitationType::Drizzle,
            intensity: round2((0.12 + strength * 0.1).clamp(0.0, 1.0)),
        },
        _ => Precipitation::none(),
    }
}

fn season_humidity(season: Season) -> f64 {
    match season {
        Season::Winter => 78.0,
        Season::Spring => 70.0,
        Season::Summer => 66.0,
        Season::Fall => 64.0,
    }
}

fn front_humidity(front: Front) -> f64 {
    match front {
        Front::Clear => -6.0,
        Front::Overcast => 6.0,
        Front::Rain => 14.0,
        Front::Storm => 16.0,
        Front::Marine => 18.0,
        Front::Windy => -8.0,
        Front::Heat => -16.0,
        Front::Cold => -4.0,
    }
}

/// Relative humidity in [15, 98]; one draw.
pub fn derive_humidity(
    season: Season,
    front: Front,
    precipitation: &Precipitation,
    rng: &mut dyn UnitSource,
) -> f64 {
    let raw = season_humidity(season)
        + front_humidity(front)
        + precipitation.intensity * 12.0
        + range(rng, -4.0, 4.0);
    raw.clamp(15.0, 98.0).round()
}

fn wind_profile(front: Front) -> (f64, f64, f64) {
    // (base mph, mph per unit strength, base heading)
    match front {
        Front::Clear => (6.0, 6.0, 270.0),
        Front::Overcast => (8.0, 6.0, 225.0),
        Front::Rain => (12.0, 6.0, 180.0),
        Front::Storm => (22.0, 16.0, 200.0),
        Front::Marine => (9.0, 6.0, 250.0),
        Front::Windy => (20.0, 14.0, 290.0),
        Front::Heat => (5.0, 6.0, 45.0),
        Front::Cold => (11.0, 6.0, 340.0),
    }
}

/// Wind speed and quantized heading; two draws.
pub fn derive_wind(front: Front, strength: f64, rng: &mut dyn UnitSource) -> Wind {
    let (base, scale, heading) = wind_profile(front);
    let speed = (base + strength * scale + range(rng, -3.0, 3.0)).max(0.0);
    let direction = CompassPoint::from_degrees(heading + range(rng, -45.0, 45.0));
    Wind {
        speed: round1(speed),
        direction_deg: direction.degrees(),
        direction,
    }
}

/// Visibility in miles, 1-10.
pub fn derive_visibility(kind: WeatherType, front: Front, precipitation: &Precipitation) -> f64 {
    let base = match kind {
        WeatherType::Fog if front == Front::Marine => 3.0,
        WeatherType::Fog => 2.0,
        WeatherType::Drizzle => 7.0,
        WeatherType::Rain => 6.0,
        WeatherType::HeavyRain | WeatherType::Snow => 4.0,
        WeatherType::Thunderstorm => 3.0,
        WeatherType::Overcast => 9.0,
        _ => 10.0,
    };
    round1((base - precipitation.intensity * 2.0).clamp(1.0, 10.0))
}

fn base_impact(kind: WeatherType) -> f64 {
    match kind {
        WeatherType::Clear => 0.0,
        WeatherType::PartlyCloudy => 0.05,
        WeatherType::Overcast => 0.15,
        WeatherType::Fog => 0.35,
        WeatherType::Drizzle => 0.3,
        WeatherType::Rain => 0.6,
        WeatherType::HeavyRain => 0.9,
        WeatherType::Thunderstorm => 1.2,
        WeatherType::Windy => 0.4,
        WeatherType::Hot => 0.5,
        WeatherType::Cold => 0.4,
        WeatherType::Snow => 1.0,
    }
}

/// Disruption score, rounded to two decimals.
pub fn compute_impact(
    kind: WeatherType,
    precipitation: &Precipitation,
    wind_speed: f64,
    temperature: f64,
) -> f64 {
    let mut impact = base_impact(kind) + precipitation.intensity * 0.5;
    if wind_speed >= 25.0 {
        impact += 0.15;
    }
    if wind_speed >= 35.0 {
        impact += 0.25;
    }
    if temperature >= 90.0 {
        impact += 0.3;
    }
    if temperature <= 35.0 {
        impact += 0.25;
    }
    round2(impact.max(0.0))
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{scripted, FnSource, Mulberry32};

    fn fixed(values: Vec<f64>) -> FnSource<impl FnMut() -> f64> {
        let mut f = scripted(values);
        FnSource::new(move || f())
    }

    #[test]
    fn test_pick_weather_type_first_bucket() {
        let mut rng = fixed(vec![0.0]);
        assert_eq!(
            pick_weather_type(Front::Heat, Season::Summer, &mut rng),
            WeatherType::Hot
        );
    }

    #[test]
    fn test_pick_weather_type_last_bucket() {
        let mut rng = fixed(vec![0.999]);
        assert_eq!(
            pick_weather_type(Front::Storm, Season::Fall, &mut rng),
            WeatherType::Windy
        );
    }

    #[test]
    fn test_rain_front_always_rains() {
        let mut rng = Mulberry32::new(5);
        for _ in 0..200 {
            let mut kind = WeatherType::Drizzle;
            let p = derive_precipitation(Front::Rain, 0.5, Season::Spring, 55.0, &mut kind, &mut rng);
            assert_eq!(p.kind, PrecipitationType::Rain);
            assert!(p.intensity > 0.0 && p.intensity <= 1.0);
        }
    }

    #[test]
    fn test_storm_intensity_scales_with_strength() {
        let mut weak_kind = WeatherType::HeavyRain;
        let mut strong_kind = WeatherType::HeavyRain;
        let weak = derive_precipitation(Front::Storm, 0.3, Season::Winter, 50.0, &mut weak_kind, &mut fixed(vec![0.5]));
        let strong = derive_precipitation(Front::Storm, 0.9, Season::Winter, 50.0, &mut strong_kind, &mut fixed(vec![0.5]));
        assert!(strong.intensity > weak.intensity);
        assert!((strong.intensity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_freezing_cold_front_can_snow() {
        let mut kind = WeatherType::Cold;
        let p = derive_precipitation(Front::Cold, 0.6, Season::Winter, 30.0, &mut kind, &mut fixed(vec![0.05]));
        assert_eq!(p.kind, PrecipitationType::Snow);
        assert_eq!(kind, WeatherType::Snow);

        let mut kind = WeatherType::Cold;
        let p = derive_precipitation(Front::Cold, 0.6, Season::Winter, 30.0, &mut kind, &mut fixed(vec![0.5]));
        assert_eq!(p.kind, PrecipitationType::None);
        assert_eq!(kind, WeatherType::Cold);
    }

    #[test]
    fn test_snow_roll_is_strict_at_threshold() {
        let mut kind = WeatherType::Cold;
        let p = derive_precipitation(
            Front::Cold,
            0.6,
            Season::Winter,
            30.0,
            &mut kind,
            &mut fixed(vec![SNOW_CHANCE]),
        );
        assert_eq!(p.kind, PrecipitationType::None);
        assert_eq!(kind, WeatherType::Cold);

        let just_below = SNOW_CHANCE - f64::EPSILON;
        let mut kind = WeatherType::Cold;
        let p = derive_precipitation(
            Front::Cold,
            0.6,
            Season::Winter,
            30.0,
            &mut kind,
            &mut fixed(vec![just_below]),
        );
        assert_eq!(p.kind, PrecipitationType::Snow);
    }

    #[test]
    fn test_mild_cold_front_draws_nothing() {
        let count = std::cell::Cell::new(0);
        let mut rng = FnSource::new(|| {
            count.set(count.get() + 1);
            0.0
        });
        let mut kind = WeatherType::Cold;
        let p = derive_precipitation(Front::Cold, 0.6, Season::Winter, 44.0, &mut kind, &mut rng);
        assert_eq!(p.kind, PrecipitationType::None);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_humidity_bounds() {
        let mut rng = Mulberry32::new(17);
        let wet = Precipitation { kind: PrecipitationType::Rain, intensity: 1.0 };
        for _ in 0..200 {
            let h = derive_humidity(Season::Winter, Front::Marine, &wet, &mut rng);
            assert!((15.0..=98.0).contains(&h));
            let h = derive_humidity(Season::Fall, Front::Heat, &Precipitation::none(), &mut rng);
            assert!((15.0..=98.0).contains(&h));
        }
    }

    #[test]
    fn test_wind_quantized() {
        let mut rng = Mulberry32::new(23);
        for _ in 0..200 {
            let wind = derive_wind(Front::Windy, 0.7, &mut rng);
            assert!(wind.speed >= 0.0);
            assert_eq!(wind.direction_deg % 45.0, 0.0);
            assert_eq!(wind.direction.degrees(), wind.direction_deg);
        }
    }

    #[test]
    fn test_heat_front_wind_is_offshore() {
        let wind = derive_wind(Front::Heat, 0.5, &mut fixed(vec![0.5, 0.5]));
        assert_eq!(wind.direction, CompassPoint::NE);
        assert!((wind.speed - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_visibility() {
        let none = Precipitation::none();
        assert_eq!(derive_visibility(WeatherType::Clear, Front::Clear, &none), 10.0);
        assert_eq!(derive_visibility(WeatherType::Fog, Front::Clear, &none), 2.0);
        let heavy = Precipitation { kind: PrecipitationType::Rain, intensity: 1.0 };
        assert_eq!(derive_visibility(WeatherType::Thunderstorm, Front::Storm, &heavy), 1.0);
    }

    #[test]
    fn test_impact_terms() {
        let none = Precipitation::none();
        assert_eq!(compute_impact(WeatherType::Clear, &none, 5.0, 70.0), 0.0);
        assert_eq!(compute_impact(WeatherType::Hot, &none, 5.0, 95.0), 0.8);
        let storm = Precipitation { kind: PrecipitationType::Rain, intensity: 0.8 };
        assert_eq!(compute_impact(WeatherType::Thunderstorm, &storm, 36.0, 50.0), 2.0);
    }
}
