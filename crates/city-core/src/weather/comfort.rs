//! Comfort and Mood
//!
//! Comfort index from temperature, humidity, wind and precipitation, and the
//! mood vector the city feels as a result.

use std::collections::BTreeSet;

use city_events::{
    CycleCalendar, PrimaryMood, StreakCategory, StreakSnapshot, WeatherAlert, WeatherMood,
    WeatherObservation, WeatherType,
};

use super::derive::round2;

fn temperature_comfort(temp: f64) -> f64 {
    if (62.0..=75.0).contains(&temp) {
        1.0
    } else if (55.0..62.0).contains(&temp) || (75.0..82.0).contains(&temp) {
        0.75
    } else if (45.0..55.0).contains(&temp) || (82.0..90.0).contains(&temp) {
        0.5
    } else {
        0.25
    }
}

fn type_bonus(kind: WeatherType) -> f64 {
    match kind {
        WeatherType::Clear => 0.1,
        WeatherType::PartlyCloudy => 0.05,
        WeatherType::Fog | WeatherType::Snow => -0.05,
        WeatherType::Thunderstorm => -0.15,
        WeatherType::Hot => -0.1,
        _ => 0.0,
    }
}

/// Comfort in [0, 1].
pub fn comfort_index(obs: &WeatherObservation) -> f64 {
    let temp = obs.temperature;
    let mut comfort = temperature_comfort(temp);

    if temp >= 78.0 && obs.humidity >= 70.0 {
        comfort -= 0.15;
    } else if temp <= 50.0 && obs.humidity >= 85.0 {
        comfort -= 0.1;
    }

    let wind = obs.wind.speed;
    if wind >= 35.0 {
        comfort -= 0.3;
    } else if wind >= 25.0 {
        comfort -= 0.2;
    } else if wind >= 15.0 {
        comfort -= 0.1;
    }

    comfort -= obs.precipitation.intensity * 0.35;
    comfort += type_bonus(obs.kind);
    round2(comfort.clamp(0.0, 1.0))
}

struct MoodBaseline {
    primary: PrimaryMood,
    energy: f64,
    social: f64,
    irritability: f64,
    conflict: f64,
    creativity: f64,
    nostalgia: f64,
}

const fn baseline(
    primary: PrimaryMood,
    energy: f64,
    social: f64,
    irritability: f64,
    conflict: f64,
    creativity: f64,
    nostalgia: f64,
) -> MoodBaseline {
    MoodBaseline {
        primary,
        energy,
        social,
        irritability,
        conflict,
        creativity,
        nostalgia,
    }
}

fn mood_baseline(kind: WeatherType) -> MoodBaseline {
    use PrimaryMood::*;
    match kind {
        WeatherType::Clear => baseline(Energized, 0.7, 0.7, 0.2, 0.2, 0.5, 0.2),
        WeatherType::PartlyCloudy => baseline(Content, 0.6, 0.6, 0.25, 0.2, 0.5, 0.25),
        WeatherType::Overcast => baseline(Subdued, 0.45, 0.45, 0.3, 0.25, 0.55, 0.4),
        WeatherType::Fog => baseline(Nostalgic, 0.4, 0.4, 0.3, 0.25, 0.6, 0.6),
        WeatherType::Drizzle => baseline(Cozy, 0.45, 0.4, 0.35, 0.25, 0.6, 0.5),
        WeatherType::Rain => baseline(Cozy, 0.4, 0.35, 0.4, 0.3, 0.55, 0.5),
        WeatherType::HeavyRain => baseline(Subdued, 0.3, 0.3, 0.5, 0.35, 0.45, 0.4),
        WeatherType::Thunderstorm => baseline(Anxious, 0.35, 0.3, 0.55, 0.45, 0.4, 0.3),
        WeatherType::Windy => baseline(Restless, 0.55, 0.45, 0.45, 0.4, 0.45, 0.3),
        WeatherType::Hot => baseline(Irritable, 0.4, 0.55, 0.6, 0.55, 0.35, 0.2),
        WeatherType::Cold => baseline(Subdued, 0.4, 0.4, 0.4, 0.3, 0.45, 0.45),
        WeatherType::Snow => baseline(Nostalgic, 0.55, 0.6, 0.3, 0.2, 0.6, 0.7),
    }
}

/// Mood from the day's type, adjusted by alerts, streaks and calendar flags.
pub fn derive_mood(
    obs: &WeatherObservation,
    comfort: f64,
    alerts: &BTreeSet<WeatherAlert>,
    streak: StreakSnapshot,
    calendar: &CycleCalendar,
) -> WeatherMood {
    let base = mood_baseline(obs.kind);
    let mut primary = base.primary;
    let mut energy = base.energy;
    let mut social = base.social;
    let mut irritability = base.irritability;
    let mut conflict = base.conflict;
    let mut creativity = base.creativity;
    let mut nostalgia = base.nostalgia;

    for alert in alerts {
        match alert {
            WeatherAlert::HeatWave => {
                irritability += 0.15;
                conflict += 0.15;
                energy -= 0.1;
                primary = PrimaryMood::Irritable;
            }
            WeatherAlert::ColdSnap => {
                energy -= 0.1;
                social -= 0.1;
                nostalgia += 0.1;
            }
            WeatherAlert::ProlongedRain => {
                social -= 0.1;
                irritability += 0.1;
                energy -= 0.1;
            }
            WeatherAlert::StormAdvisory => {
                conflict += 0.1;
                primary = PrimaryMood::Anxious;
            }
            WeatherAlert::FogAdvisory => {
                nostalgia += 0.1;
                creativity += 0.05;
            }
        }
    }

    match streak.category {
        StreakCategory::Clear if streak.days >= 3 => {
            social += 0.05;
            energy += 0.05;
        }
        StreakCategory::Rain | StreakCategory::Cloudy | StreakCategory::Fog
            if streak.days >= 4 =>
        {
            irritability += 0.05;
        }
        _ => {}
    }

    if calendar.holiday.is_holiday() {
        social += 0.1;
    }
    if calendar.first_friday {
        creativity += 0.15;
        social += 0.1;
    }
    if calendar.creation_day {
        nostalgia += 0.15;
        social += 0.05;
    }
    if comfort >= 0.85 {
        energy += 0.05;
    }

    let unit = |v: f64| round2(v.clamp(0.0, 1.0));
    WeatherMood {
        comfort_index: comfort,
        primary_mood: primary,
        energy_level: unit(energy),
        social_inclination: unit(social),
        irritability_factor: unit(irritability),
        conflict_potential: unit(conflict),
        creativity_boost: unit(creativity),
        nostalgia_factor: unit(nostalgia),
        perfect_weather: is_perfect_weather(obs, comfort),
    }
}

/// Warm, dry, calm and comfortable.
pub fn is_perfect_weather(obs: &WeatherObservation, comfort: f64) -> bool {
    comfort >= 0.9
        && !obs.precipitation.is_falling()
        && obs.wind.speed < 15.0
        && (65.0..=78.0).contains(&obs.temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_events::{CompassPoint, Front, Holiday, Precipitation, PrecipitationType, Wind};

    fn observation(kind: WeatherType, temperature: f64) -> WeatherObservation {
        WeatherObservation {
            cycle: 1,
            temperature,
            kind,
            impact: 0.0,
            humidity: 55.0,
            wind: Wind {
                speed: 6.0,
                direction_deg: 270.0,
                direction: CompassPoint::W,
            },
            precipitation: Precipitation::none(),
            visibility: 10.0,
            front: Front::Clear,
            front_strength: 0.5,
            front_streak: 1,
        }
    }

    fn streak(category: StreakCategory, days: u32) -> StreakSnapshot {
        StreakSnapshot { category, days }
    }

    #[test]
    fn test_ideal_day_is_perfect() {
        let obs = observation(WeatherType::Clear, 70.0);
        let comfort = comfort_index(&obs);
        assert_eq!(comfort, 1.0);
        let mood = derive_mood(
            &obs,
            comfort,
            &BTreeSet::new(),
            streak(StreakCategory::Clear, 1),
            &CycleCalendar::new(1, 6),
        );
        assert!(mood.perfect_weather);
        assert_eq!(mood.primary_mood, PrimaryMood::Energized);
        assert_eq!(mood.energy_level, 0.75);
    }

    #[test]
    fn test_storm_is_uncomfortable() {
        let mut obs = observation(WeatherType::Thunderstorm, 52.0);
        obs.wind.speed = 36.0;
        obs.precipitation = Precipitation { kind: PrecipitationType::Rain, intensity: 1.0 };
        // 0.5 - 0.3 - 0.35 - 0.15 floors at zero
        assert_eq!(comfort_index(&obs), 0.0);
    }

    #[test]
    fn test_muggy_heat_penalized() {
        let mut obs = observation(WeatherType::Hot, 85.0);
        let dry = comfort_index(&obs);
        obs.humidity = 75.0;
        let muggy = comfort_index(&obs);
        assert!((dry - muggy - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_heat_wave_makes_city_irritable() {
        let obs = observation(WeatherType::Hot, 95.0);
        let comfort = comfort_index(&obs);
        let alerts: BTreeSet<_> = [WeatherAlert::HeatWave].into_iter().collect();
        let mood = derive_mood(&obs, comfort, &alerts, streak(StreakCategory::Hot, 6), &CycleCalendar::new(1, 8));
        assert_eq!(mood.primary_mood, PrimaryMood::Irritable);
        assert_eq!(mood.irritability_factor, 0.75);
        assert_eq!(mood.conflict_potential, 0.7);
        assert!(!mood.perfect_weather);
    }

    #[test]
    fn test_calendar_flags_lift_mood() {
        let obs = observation(WeatherType::Overcast, 58.0);
        let comfort = comfort_index(&obs);
        let calendar = CycleCalendar::new(1, 11)
            .with_first_friday(true)
            .with_holiday(Holiday::VeteransDay);
        let plain = derive_mood(&obs, comfort, &BTreeSet::new(), streak(StreakCategory::Cloudy, 1), &CycleCalendar::new(1, 11));
        let festive = derive_mood(&obs, comfort, &BTreeSet::new(), streak(StreakCategory::Cloudy, 1), &calendar);
        assert!((festive.creativity_boost - plain.creativity_boost - 0.15).abs() < 1e-9);
        assert!((festive.social_inclination - plain.social_inclination - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_mood_fields_bounded() {
        let obs = observation(WeatherType::Snow, 28.0);
        let alerts: BTreeSet<_> = [WeatherAlert::ColdSnap].into_iter().collect();
        let calendar = CycleCalendar::new(1, 12)
            .with_holiday(Holiday::Christmas)
            .with_first_friday(true)
            .with_creation_day(true);
        let mood = derive_mood(&obs, comfort_index(&obs), &alerts, streak(StreakCategory::Snow, 9), &calendar);
        for v in [
            mood.energy_level,
            mood.social_inclination,
            mood.irritability_factor,
            mood.conflict_potential,
            mood.creativity_boost,
            mood.nostalgia_factor,
        ] {
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(mood.nostalgia_factor, 0.95);
    }
}
