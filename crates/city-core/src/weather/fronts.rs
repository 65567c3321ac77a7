//! Front State Machine
//!
//! Eight multi-day regimes with self-loop-biased Markov transitions. The
//! transition row for the current front is reshaped by season and holiday
//! before sampling.

use city_events::{Front, Holiday, Season};

use crate::rng::{unit, weighted_index, UnitSource};
use crate::state::FrontTrackingState;

/// Transition probabilities in `Front::ALL` order. Each row sums to 1.
const BASE_TRANSITIONS: [[f64; 8]; 8] = [
    // CLEAR  OVERC  RAIN   STORM  MARINE WINDY  HEAT   COLD
    [0.30, 0.18, 0.08, 0.02, 0.16, 0.10, 0.10, 0.06], // CLEAR
    [0.22, 0.26, 0.18, 0.04, 0.14, 0.08, 0.03, 0.05], // OVERCAST
    [0.14, 0.26, 0.28, 0.10, 0.08, 0.08, 0.01, 0.05], // RAIN
    [0.10, 0.24, 0.34, 0.14, 0.04, 0.10, 0.00, 0.04], // STORM
    [0.24, 0.22, 0.08, 0.02, 0.30, 0.08, 0.03, 0.03], // MARINE
    [0.28, 0.18, 0.10, 0.04, 0.10, 0.20, 0.04, 0.06], // WINDY
    [0.34, 0.08, 0.02, 0.04, 0.14, 0.08, 0.28, 0.02], // HEAT
    [0.28, 0.18, 0.12, 0.04, 0.06, 0.10, 0.00, 0.22], // COLD
];

/// Persistence probability bounds.
pub const PERSIST_MIN: f64 = 0.15;
pub const PERSIST_MAX: f64 = 0.85;

/// Random-walk bounds for front strength.
pub const STRENGTH_WALK_MIN: f64 = 0.25;
pub const STRENGTH_WALK_MAX: f64 = 0.95;
/// Bounds after the per-front boost.
pub const STRENGTH_BOOST_MIN: f64 = 0.30;
pub const STRENGTH_BOOST_MAX: f64 = 1.0;

fn seasonal_tweaks(season: Season) -> &'static [(Front, f64)] {
    match season {
        Season::Winter => &[
            (Front::Rain, 1.6),
            (Front::Storm, 1.5),
            (Front::Cold, 1.8),
            (Front::Heat, 0.2),
            (Front::Marine, 0.8),
            (Front::Clear, 0.9),
        ],
        Season::Spring => &[
            (Front::Windy, 1.3),
            (Front::Rain, 1.1),
            (Front::Heat, 0.6),
            (Front::Cold, 0.7),
        ],
        Season::Summer => &[
            (Front::Marine, 1.6),
            (Front::Heat, 1.4),
            (Front::Clear, 1.1),
            (Front::Rain, 0.3),
            (Front::Storm, 0.3),
            (Front::Cold, 0.2),
        ],
        Season::Fall => &[
            (Front::Heat, 1.3),
            (Front::Clear, 1.15),
            (Front::Windy, 1.2),
            (Front::Rain, 0.8),
            (Front::Marine, 0.9),
        ],
    }
}

fn holiday_tweaks(holiday: Holiday) -> &'static [(Front, f64)] {
    match holiday {
        Holiday::Independence => &[(Front::Clear, 1.3), (Front::Rain, 0.6), (Front::Storm, 0.6)],
        Holiday::NewYear | Holiday::NewYearsEve => &[(Front::Cold, 1.2), (Front::Clear, 1.1)],
        Holiday::Christmas | Holiday::ChristmasEve => &[(Front::Cold, 1.3), (Front::Rain, 1.1)],
        Holiday::Halloween => &[(Front::Overcast, 1.2), (Front::Marine, 1.2)],
        Holiday::Thanksgiving => &[(Front::Overcast, 1.1), (Front::Rain, 1.1)],
        Holiday::MemorialDay | Holiday::LaborDay => &[(Front::Clear, 1.2), (Front::Rain, 0.7)],
        _ => &[],
    }
}

/// Scales each weight so the row sums to 1; a zero row becomes uniform.
pub fn renormalize(weights: &mut [f64; 8]) {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        *weights = [1.0 / 8.0; 8];
        return;
    }
    for w in weights.iter_mut() {
        *w /= total;
    }
}

fn apply_tweaks(weights: &mut [f64; 8], tweaks: &[(Front, f64)]) {
    for &(front, factor) in tweaks {
        weights[front.index()] *= factor;
    }
    renormalize(weights);
}

/// Transition distribution out of `from` after seasonal and holiday tweaks.
pub fn transition_distribution(from: Front, season: Season, holiday: Holiday) -> [f64; 8] {
    let mut weights = BASE_TRANSITIONS[from.index()];
    apply_tweaks(&mut weights, seasonal_tweaks(season));
    apply_tweaks(&mut weights, holiday_tweaks(holiday));
    weights
}

/// Probability the current front holds for another cycle.
pub fn persistence_probability(strength: f64, streak: u32) -> f64 {
    let decay = ((f64::from(streak) - 2.0) * 0.04).clamp(0.0, 0.25);
    (0.35 + strength * 0.45 - decay).clamp(PERSIST_MIN, PERSIST_MAX)
}

/// Additive strength boost for intense regimes.
fn strength_boost(front: Front) -> Option<f64> {
    match front {
        Front::Storm => Some(0.12),
        Front::Heat => Some(0.08),
        Front::Cold => Some(0.06),
        _ => None,
    }
}

/// Advances the front one cycle. Draws: persistence, then a transition draw
/// only when the front does not persist, then the strength walk.
pub fn advance_front(
    state: &mut FrontTrackingState,
    cycle: u64,
    season: Season,
    holiday: Holiday,
    rng: &mut dyn UnitSource,
) {
    let current = state.front_state;
    let persist = persistence_probability(state.front_strength, state.front_streak);

    let next = if unit(rng) < persist {
        current
    } else {
        let dist = transition_distribution(current, season, holiday);
        weighted_index(rng, &dist)
            .map(Front::from_index)
            .unwrap_or(current)
    };

    if next == current {
        state.front_streak = state.front_streak.saturating_add(1);
    } else {
        tracing::debug!(
            "Front transition {} -> {} at cycle {} after {} cycles",
            current,
            next,
            cycle,
            state.front_streak
        );
        state.front_state = next;
        state.front_streak = 1;
        state.last_transition_cycle = cycle;
    }

    let walk = unit(rng) * 0.1 - 0.05;
    let mut strength = (state.front_strength + walk).clamp(STRENGTH_WALK_MIN, STRENGTH_WALK_MAX);
    if let Some(boost) = strength_boost(next) {
        strength = (strength + boost).clamp(STRENGTH_BOOST_MIN, STRENGTH_BOOST_MAX);
    }
    state.front_strength = strength;

    state.record(cycle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{scripted, FnSource};

    #[test]
    fn test_base_rows_sum_to_one() {
        for row in BASE_TRANSITIONS.iter() {
            let total: f64 = row.iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_distribution_sums_to_one_for_all_contexts() {
        let seasons = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];
        let mut holidays = vec![Holiday::None, Holiday::Other];
        holidays.extend(Holiday::NAMED);
        for from in Front::ALL {
            for season in seasons {
                for &holiday in &holidays {
                    let dist = transition_distribution(from, season, holiday);
                    let total: f64 = dist.iter().sum();
                    assert!((total - 1.0).abs() < 1e-9, "{from} {season} {holiday}");
                }
            }
        }
    }

    #[test]
    fn test_winter_dampens_heat() {
        let spring = transition_distribution(Front::Clear, Season::Spring, Holiday::None);
        let winter = transition_distribution(Front::Clear, Season::Winter, Holiday::None);
        assert!(winter[Front::Heat.index()] < spring[Front::Heat.index()]);
        assert!(winter[Front::Cold.index()] > spring[Front::Cold.index()]);
    }

    #[test]
    fn test_independence_day_favors_clear() {
        let plain = transition_distribution(Front::Overcast, Season::Summer, Holiday::None);
        let july4 = transition_distribution(Front::Overcast, Season::Summer, Holiday::Independence);
        assert!(july4[Front::Clear.index()] > plain[Front::Clear.index()]);
        assert!(july4[Front::Rain.index()] < plain[Front::Rain.index()]);
    }

    #[test]
    fn test_persistence_bounds() {
        for streak in 0..40 {
            for i in 0..=20 {
                let strength = i as f64 * 0.05;
                let p = persistence_probability(strength, streak);
                assert!((PERSIST_MIN..=PERSIST_MAX).contains(&p));
            }
        }
    }

    #[test]
    fn test_persistence_decays_with_streak() {
        let fresh = persistence_probability(0.55, 1);
        let stale = persistence_probability(0.55, 6);
        assert!((fresh - (0.35 + 0.55 * 0.45)).abs() < 1e-12);
        assert!((stale - (fresh - 0.16)).abs() < 1e-12);
    }

    #[test]
    fn test_persist_keeps_front_and_grows_streak() {
        let mut state = FrontTrackingState::default();
        let mut f = scripted(vec![0.0, 0.5]);
        let mut rng = FnSource::new(move || f());
        advance_front(&mut state, 1, Season::Spring, Holiday::None, &mut rng);
        assert_eq!(state.front_state, Front::Clear);
        assert_eq!(state.front_streak, 2);
        assert!((state.front_strength - 0.55).abs() < 1e-9);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_transition_resets_streak() {
        let mut state = FrontTrackingState::default();
        state.front_streak = 5;
        // 0.99 fails persistence, 0.999 picks the last non-zero column (COLD)
        let mut f = scripted(vec![0.99, 0.999, 0.5]);
        let mut rng = FnSource::new(move || f());
        advance_front(&mut state, 9, Season::Winter, Holiday::None, &mut rng);
        assert_eq!(state.front_state, Front::Cold);
        assert_eq!(state.front_streak, 1);
        assert_eq!(state.last_transition_cycle, 9);
        // COLD boost applied on top of the walk
        assert!((state.front_strength - 0.61).abs() < 1e-9);
    }

    #[test]
    fn test_strength_stays_bounded() {
        let mut state = FrontTrackingState::default();
        let mut rng = crate::rng::Mulberry32::new(11);
        for cycle in 0..500 {
            advance_front(&mut state, cycle, Season::Winter, Holiday::None, &mut rng);
            assert!((0.25..=1.0).contains(&state.front_strength));
            assert!(state.front_streak >= 1);
        }
    }
}
