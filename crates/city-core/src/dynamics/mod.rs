//! City Dynamics Aggregator
//!
//! Turns weather, calendar and neighborhood signals into bounded cluster,
//! neighborhood and city metric vectors. Runs after the weather simulator and
//! draws no random numbers.

pub mod capacity;
pub mod clusters;
pub mod lag;
pub mod modifiers;
pub mod momentum;
pub mod neighborhood;
pub mod signals;

pub use clusters::{all_neighborhoods, cluster_of, cluster_table, ClusterDefinition, CLUSTERS};
pub use modifiers::Modifier;
pub use signals::NeighborhoodSignals;

use std::collections::BTreeMap;

use city_events::{
    Cluster, CycleCalendar, CycleInputs, DynamicsReport, MetricVector, StorySeed,
    StorySignalBreakdown, WeatherReport, WorldEvent,
};

use crate::config::{CapacityConfig, SimConfig};
use crate::state::{ActivityCounts, ActivityHistory, LagState, WorldState};

/// Per-cycle inputs the aggregator reads beyond the world state.
pub struct DynamicsInputs<'a> {
    pub signals: Option<&'a dyn NeighborhoodSignals>,
    pub world_events: &'a [WorldEvent],
    pub story_seeds: &'a [StorySeed],
    pub media_count: u32,
    pub shock_count: u32,
    /// Resolved capacity for this cycle
    pub capacity: CapacityConfig,
    pub reset_momentum: bool,
}

impl<'a> DynamicsInputs<'a> {
    /// Reads everything from a cycle's inputs, resolving the capacity override
    /// against the configured capacity.
    pub fn from_cycle(inputs: &'a CycleInputs, config: &SimConfig) -> Self {
        Self {
            signals: Some(&inputs.signals),
            world_events: &inputs.world_events,
            story_seeds: &inputs.story_seeds,
            media_count: inputs.media_count.unwrap_or(0),
            shock_count: inputs.shock_count(),
            capacity: config.capacity.resolve(inputs.capacity.as_ref()),
            reset_momentum: inputs.reset_momentum,
        }
    }

    /// No signals at all: every optional input reads neutral.
    pub fn quiet(capacity: CapacityConfig) -> Self {
        Self {
            signals: None,
            world_events: &[],
            story_seeds: &[],
            media_count: 0,
            shock_count: 0,
            capacity,
            reset_momentum: false,
        }
    }

    pub fn shock_active(&self) -> bool {
        self.shock_count > 0
    }
}

/// Steps 1-13 for one cluster.
fn cluster_vector(
    cluster: Cluster,
    calendar: &CycleCalendar,
    weather: &WeatherReport,
    inputs: &DynamicsInputs<'_>,
    activity: &city_events::ActivityAverages,
    story_signals: &StorySignalBreakdown,
    lag: &LagState,
) -> MetricVector {
    let def = clusters::definition(cluster);
    let obs = &weather.observation;
    let mut v = MetricVector::neutral();

    modifiers::season_modifier(calendar.season).apply(&mut v);
    modifiers::apply_weather(&mut v, obs, cluster);
    modifiers::apply_calendar(&mut v, calendar, cluster);
    modifiers::apply_sports(&mut v, calendar.sports_phase, cluster);
    modifiers::apply_place_bias(&mut v, cluster, obs.precipitation.intensity);
    def.weights.apply(&mut v);

    let members = def.neighborhoods.iter().copied();
    if let Some(d) = signals::average_demographics(inputs.signals, members.clone()) {
        signals::demographic_modifier(&d).apply(&mut v);
    }
    let economy = signals::average_economic_mood(inputs.signals, members.clone());
    signals::economy_modifier(economy).apply(&mut v);
    signals::activity_modifier(activity).apply(&mut v);
    signals::story_modifier(&story_signals.cluster(cluster)).apply(&mut v);
    let crime = signals::crime_total(inputs.signals, members);
    signals::crime_ripple_modifier(crime).apply(&mut v);

    lag::apply(&mut v, lag, cluster);
    v.clamp_all();
    v
}

/// Advances the aggregator one cycle and publishes the report on `state`.
///
/// Returns `None` without touching any state when the calendar or this
/// cycle's weather report is missing.
pub fn advance<'s>(
    state: &'s mut WorldState,
    inputs: &DynamicsInputs<'_>,
    config: &SimConfig,
) -> Option<&'s DynamicsReport> {
    if inputs.reset_momentum && state.weather.is_some() {
        if let Some(cycle) = state.current_cycle() {
            tracing::debug!("Momentum reset at cycle {}", cycle);
            state.reset_momentum();
        }
    }

    let WorldState {
        calendar,
        weather,
        lag,
        activity,
        previous_city,
        dynamics,
        ..
    } = state;
    let calendar = calendar.as_ref()?;
    let weather = weather.as_ref()?;
    let cycle = calendar.cycle;
    let obs = &weather.observation;

    let lag = lag.get_or_insert_with(LagState::default);
    lag::update(lag, obs, calendar.resolved_priority());

    let activity = activity
        .get_or_insert_with(|| ActivityHistory::with_capacity(config.dynamics.activity_capacity));
    activity.push(ActivityCounts {
        events: inputs.world_events.len() as u32,
        story_seed_count: inputs.story_seeds.len() as u32,
        media: inputs.media_count,
        crime: signals::crime_total(inputs.signals, all_neighborhoods()),
        shock_count: inputs.shock_count,
    });
    let averages = activity.averages(config.dynamics.activity_window);

    let story_signals = signals::story_signal_breakdown(inputs.story_seeds);

    let mut cluster_vectors: BTreeMap<Cluster, MetricVector> = Cluster::ALL
        .iter()
        .map(|&c| {
            let v = cluster_vector(c, calendar, weather, inputs, &averages, &story_signals, lag);
            (c, v)
        })
        .collect();

    momentum::bleed_sentiment(&mut cluster_vectors, config.dynamics.bleed_factor);

    let local = neighborhood::LocalContext {
        microclimates: &weather.microclimates,
        city_temperature: obs.temperature,
        story_signals: &story_signals,
        signals: inputs.signals,
    };
    let neighborhoods: BTreeMap<String, MetricVector> = clusters::CLUSTERS
        .iter()
        .flat_map(|def| {
            let base = cluster_vectors
                .get(&def.cluster)
                .copied()
                .unwrap_or_default();
            let local = &local;
            def.neighborhoods
                .iter()
                .map(move |name| (name.to_string(), neighborhood::derive(name, &base, local)))
        })
        .collect();

    let mut snapshot = capacity::measure(&cluster_vectors, &inputs.capacity, lag.congestion_hangover);
    capacity::update_hangover(&mut snapshot, lag, cycle);
    for (cluster, vector) in cluster_vectors.iter_mut() {
        let friction = capacity::cluster_friction(&snapshot, *cluster);
        capacity::apply_friction(vector, friction);
    }

    let raw_city = momentum::city_aggregate(&cluster_vectors);
    let shock_active = inputs.shock_active();
    let momentum_applied = previous_city.is_some();
    let city = momentum::blend(&raw_city, previous_city.as_ref(), &config.momentum, shock_active);
    *previous_city = Some(city);

    tracing::debug!(
        "Cycle {} dynamics: sentiment {:.3} traffic {:.2} congestion {:.2} shock {}",
        cycle,
        city.sentiment,
        city.traffic,
        snapshot.total_congestion(),
        shock_active
    );

    let report = DynamicsReport {
        cycle,
        city,
        raw_city,
        clusters: cluster_vectors,
        neighborhoods,
        capacity: snapshot,
        lag: lag.snapshot(),
        activity: averages,
        story_signals,
        shock_active,
        momentum_applied,
    };
    Some(&*dynamics.insert(report))
}
