//! Weather Front Simulator
//!
//! Front state machine, statistical derivation of the day's conditions,
//! comfort, mood, alerts and microclimates. Runs first in every cycle.

pub mod alerts;
pub mod climate;
pub mod comfort;
pub mod derive;
pub mod fronts;
pub mod microclimate;

pub use alerts::{evaluate_alerts, update_tracking};
pub use climate::{climate_for_month, derive_temperature, front_anomaly, ClimateRange};
pub use comfort::{comfort_index, derive_mood, is_perfect_weather};
pub use fronts::{advance_front, persistence_probability, transition_distribution};
pub use microclimate::{fan_out, MicroclimateProfile, PROFILES};

use city_events::{WeatherObservation, WeatherReport};

use crate::rng::UnitSource;
use crate::state::{FrontTrackingState, WeatherTrackingState, WorldState};

/// Bounds applied to strength when it is published.
pub const PUBLISHED_STRENGTH_MIN: f64 = 0.25;
pub const PUBLISHED_STRENGTH_MAX: f64 = 1.0;

/// Advances the weather one cycle and publishes the report on `state`.
///
/// Returns `None` without touching any state when no calendar is present.
/// Otherwise mutates front and weather tracking and replaces `state.weather`.
pub fn advance<'s>(state: &'s mut WorldState, rng: &mut dyn UnitSource) -> Option<&'s WeatherReport> {
    let calendar = state.calendar.clone()?;
    let cycle = calendar.cycle;
    let season = calendar.season;

    let front = state.front.get_or_insert_with(FrontTrackingState::default);
    fronts::advance_front(front, cycle, season, calendar.holiday, rng);
    let front_state = front.front_state;
    let strength = front
        .front_strength
        .clamp(PUBLISHED_STRENGTH_MIN, PUBLISHED_STRENGTH_MAX);
    let front_streak = front.front_streak;

    let temperature = derive::round1(climate::derive_temperature(
        calendar.month,
        front_state,
        strength,
        season,
        rng,
    ));
    let mut kind = derive::pick_weather_type(front_state, season, rng);
    let precipitation =
        derive::derive_precipitation(front_state, strength, season, temperature, &mut kind, rng);
    let humidity = derive::derive_humidity(season, front_state, &precipitation, rng);
    let wind = derive::derive_wind(front_state, strength, rng);
    let visibility = derive::derive_visibility(kind, front_state, &precipitation);
    let impact = derive::compute_impact(kind, &precipitation, wind.speed, temperature);

    let observation = WeatherObservation {
        cycle,
        temperature,
        kind,
        impact,
        humidity,
        wind,
        precipitation,
        visibility,
        front: front_state,
        front_strength: strength,
        front_streak,
    };

    let tracking = state
        .weather_tracking
        .get_or_insert_with(WeatherTrackingState::default);
    let (streak, season_firsts) = alerts::update_tracking(tracking, &observation, season);
    let active = alerts::evaluate_alerts(streak, &observation);
    for alert in active.difference(&tracking.active_alerts) {
        tracing::debug!("Weather alert raised at cycle {}: {:?}", cycle, alert);
    }
    tracking.active_alerts = active.clone();

    let comfort = comfort::comfort_index(&observation);
    let mood = comfort::derive_mood(&observation, comfort, &active, streak, &calendar);
    let microclimates = microclimate::fan_out(temperature, front_state, kind, rng);

    tracing::debug!(
        "Cycle {} weather: {:?} {:.1}F front {} ({:.2}) impact {:.2}",
        cycle,
        kind,
        temperature,
        front_state,
        strength,
        impact
    );

    state.weather = Some(WeatherReport {
        observation,
        mood,
        alerts: active,
        streak,
        season_firsts,
        microclimates,
    });
    state.weather.as_ref()
}
