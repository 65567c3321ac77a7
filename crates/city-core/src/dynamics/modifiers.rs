//! Context Modifiers
//!
//! Season, weather, calendar, sports and place tables applied to the working
//! cluster vector, in pipeline order.

use city_events::{
    Cluster, CycleCalendar, Front, Holiday, HolidayPriority, Metric, MetricVector, Season,
    SportsPhase, WeatherObservation, WeatherType,
};

/// Seven multipliers and one sentiment delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifier {
    pub traffic: f64,
    pub retail: f64,
    pub tourism: f64,
    pub nightlife: f64,
    pub public_spaces: f64,
    pub cultural_activity: f64,
    pub community_engagement: f64,
    pub sentiment: f64,
}

impl Modifier {
    pub const NONE: Modifier = Modifier::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0);

    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        traffic: f64,
        retail: f64,
        tourism: f64,
        nightlife: f64,
        public_spaces: f64,
        cultural_activity: f64,
        community_engagement: f64,
        sentiment: f64,
    ) -> Self {
        Self {
            traffic,
            retail,
            tourism,
            nightlife,
            public_spaces,
            cultural_activity,
            community_engagement,
            sentiment,
        }
    }

    fn factor(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Traffic => self.traffic,
            Metric::Retail => self.retail,
            Metric::Tourism => self.tourism,
            Metric::Nightlife => self.nightlife,
            Metric::PublicSpaces => self.public_spaces,
            Metric::CulturalActivity => self.cultural_activity,
            Metric::CommunityEngagement => self.community_engagement,
            Metric::Sentiment => 1.0,
        }
    }

    /// Scales the multiplicative metrics, shifts sentiment; every write clamps.
    pub fn apply(&self, v: &mut MetricVector) {
        for metric in Metric::MULTIPLICATIVE {
            let f = self.factor(metric);
            if f != 1.0 {
                v.scale(metric, f);
            }
        }
        if self.sentiment != 0.0 {
            v.shift(Metric::Sentiment, self.sentiment);
        }
    }
}

/// Shorthand for a modifier touching only a few fields.
const fn only(
    traffic: f64,
    nightlife: f64,
    tourism: f64,
    public_spaces: f64,
    sentiment: f64,
) -> Modifier {
    Modifier::new(traffic, 1.0, tourism, nightlife, public_spaces, 1.0, 1.0, sentiment)
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

pub fn season_modifier(season: Season) -> Modifier {
    match season {
        Season::Spring => Modifier::new(1.00, 1.02, 1.05, 1.00, 1.08, 1.03, 1.05, 0.03),
        Season::Summer => Modifier::new(1.05, 1.03, 1.15, 1.08, 1.15, 1.05, 1.02, 0.05),
        Season::Fall => Modifier::new(1.00, 1.02, 1.00, 1.00, 0.98, 1.08, 1.04, 0.0),
        Season::Winter => Modifier::new(0.97, 1.08, 0.88, 0.95, 0.85, 1.00, 1.02, -0.03),
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

pub fn weather_type_modifier(kind: WeatherType) -> Modifier {
    match kind {
        WeatherType::Clear => Modifier::new(1.00, 1.03, 1.06, 1.04, 1.12, 1.00, 1.03, 0.04),
        WeatherType::PartlyCloudy => Modifier::new(1.00, 1.01, 1.02, 1.02, 1.05, 1.00, 1.01, 0.02),
        WeatherType::Overcast => Modifier::new(1.00, 1.00, 0.97, 0.98, 0.93, 1.02, 1.00, -0.02),
        WeatherType::Fog => Modifier::new(0.95, 0.98, 0.93, 0.97, 0.88, 1.02, 1.00, -0.03),
        WeatherType::Drizzle => Modifier::new(0.97, 0.97, 0.93, 0.95, 0.85, 1.02, 0.98, -0.04),
        WeatherType::Rain => Modifier::new(0.92, 0.93, 0.85, 0.88, 0.70, 1.04, 0.95, -0.08),
        WeatherType::HeavyRain => Modifier::new(0.85, 0.88, 0.75, 0.80, 0.55, 1.00, 0.90, -0.12),
        WeatherType::Thunderstorm => Modifier::new(0.80, 0.85, 0.70, 0.75, 0.50, 0.95, 0.88, -0.15),
        WeatherType::Windy => Modifier::new(0.98, 0.97, 0.94, 0.96, 0.85, 1.00, 0.98, -0.04),
        WeatherType::Hot => Modifier::new(0.97, 0.98, 1.00, 1.06, 0.90, 0.98, 0.96, -0.06),
        WeatherType::Cold => Modifier::new(0.98, 0.97, 0.90, 0.92, 0.82, 1.02, 1.00, -0.05),
        WeatherType::Snow => Modifier::new(0.70, 0.80, 0.85, 0.80, 0.75, 1.05, 1.10, 0.02),
    }
}

/// Wind speed that starts to clear parks and waterfronts.
pub const HIGH_WIND_MPH: f64 = 28.0;
/// Visibility at or below which traffic slows.
pub const LOW_VISIBILITY_MILES: f64 = 3.0;

/// Effects of the finer observation fields, on top of the type table.
pub fn observation_modifier(obs: &WeatherObservation) -> Modifier {
    let mut m = Modifier::NONE;
    let p = obs.precipitation.intensity.clamp(0.0, 1.0);
    if p > 0.0 {
        m.traffic *= 1.0 - 0.08 * p;
        m.retail *= 1.0 - 0.06 * p;
        m.public_spaces *= 1.0 - 0.15 * p;
    }
    if obs.wind.speed >= HIGH_WIND_MPH {
        m.public_spaces *= 0.90;
        m.tourism *= 0.95;
        m.sentiment -= 0.02;
    }
    if obs.visibility <= LOW_VISIBILITY_MILES {
        m.traffic *= 0.93;
        m.tourism *= 0.96;
    }
    m
}

/// Fronts that hit one part of the city harder than the rest.
pub fn front_cluster_modifier(front: Front, cluster: Cluster) -> Modifier {
    match (front, cluster) {
        (Front::Marine, Cluster::WaterfrontWest) => only(1.0, 1.0, 0.90, 0.88, -0.03),
        (Front::Marine, Cluster::LakeCorridor) => only(1.0, 1.0, 1.0, 0.95, 0.0),
        (Front::Heat, Cluster::EastOakland) => only(1.0, 1.0, 1.0, 0.88, -0.03),
        (Front::Heat, Cluster::LakeCorridor) => only(1.0, 1.0, 1.0, 1.06, 0.0),
        (Front::Storm, Cluster::WaterfrontWest) => only(0.95, 1.0, 0.90, 1.0, -0.02),
        (Front::Windy, Cluster::NorthHills) => only(1.0, 1.0, 1.0, 0.92, 0.0),
        (Front::Clear, Cluster::LakeCorridor) => only(1.0, 1.0, 1.0, 1.05, 0.01),
        (Front::Cold, Cluster::DowntownCore) => only(1.0, 0.95, 1.0, 1.0, 0.0),
        _ => Modifier::NONE,
    }
}

pub fn apply_weather(v: &mut MetricVector, obs: &WeatherObservation, cluster: Cluster) {
    weather_type_modifier(obs.kind).apply(v);
    observation_modifier(obs).apply(v);
    front_cluster_modifier(obs.front, cluster).apply(v);
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

pub fn priority_modifier(priority: HolidayPriority) -> Modifier {
    match priority {
        HolidayPriority::Major => Modifier::new(1.15, 1.10, 1.10, 1.10, 1.10, 1.05, 1.10, 0.05),
        HolidayPriority::Cultural => Modifier::new(1.05, 1.03, 1.05, 1.05, 1.05, 1.15, 1.12, 0.04),
        HolidayPriority::Oakland => Modifier::new(1.08, 1.05, 1.08, 1.10, 1.10, 1.12, 1.15, 0.06),
        HolidayPriority::Minor => Modifier::new(1.02, 1.02, 1.00, 1.02, 1.02, 1.02, 1.02, 0.01),
        HolidayPriority::None => Modifier::NONE,
    }
}

/// City-wide effect of each named holiday, on top of its priority baseline.
pub fn holiday_modifier(holiday: Holiday) -> Modifier {
    match holiday {
        Holiday::NewYearsEve => Modifier::new(1.10, 1.00, 1.08, 1.35, 1.05, 1.00, 1.00, 0.04),
        Holiday::NewYear => Modifier::new(0.85, 0.90, 1.00, 0.85, 1.05, 1.00, 1.05, 0.03),
        Holiday::MlkDay => Modifier::new(0.95, 1.00, 1.00, 1.00, 1.05, 1.10, 1.20, 0.03),
        Holiday::LunarNewYear => Modifier::new(1.08, 1.10, 1.10, 1.05, 1.05, 1.20, 1.10, 0.04),
        Holiday::ValentinesDay => Modifier::new(1.00, 1.08, 1.00, 1.15, 1.00, 1.00, 1.00, 0.02),
        Holiday::PresidentsDay => Modifier::new(0.97, 1.06, 1.00, 1.00, 1.00, 1.00, 1.00, 0.0),
        Holiday::StPatricksDay => Modifier::new(1.05, 1.02, 1.00, 1.25, 1.00, 1.00, 1.00, 0.02),
        Holiday::CesarChavezDay => Modifier::new(1.00, 1.00, 1.00, 1.00, 1.03, 1.08, 1.15, 0.02),
        Holiday::Easter => Modifier::new(0.95, 0.95, 1.00, 0.95, 1.10, 1.00, 1.10, 0.03),
        Holiday::FourTwenty => Modifier::new(1.00, 1.05, 1.03, 1.10, 1.12, 1.05, 1.00, 0.03),
        Holiday::EarthDay => Modifier::new(0.95, 1.00, 1.00, 1.00, 1.15, 1.03, 1.10, 0.03),
        Holiday::CincoDeMayo => Modifier::new(1.05, 1.05, 1.03, 1.15, 1.05, 1.10, 1.05, 0.03),
        Holiday::MothersDay => Modifier::new(1.00, 1.08, 1.00, 0.95, 1.08, 1.00, 1.05, 0.03),
        Holiday::MemorialDay => Modifier::new(1.00, 1.05, 1.05, 1.00, 1.10, 1.00, 1.03, 0.0),
        Holiday::Juneteenth => Modifier::new(1.03, 1.00, 1.03, 1.05, 1.10, 1.15, 1.20, 0.05),
        Holiday::FathersDay => Modifier::new(1.00, 1.05, 1.00, 1.00, 1.08, 1.00, 1.03, 0.02),
        Holiday::Independence => Modifier::new(1.12, 1.00, 1.10, 1.15, 1.20, 1.00, 1.08, 0.05),
        Holiday::OaklandPride => Modifier::new(1.10, 1.05, 1.10, 1.25, 1.15, 1.15, 1.20, 0.06),
        Holiday::ArtSoulFestival => Modifier::new(1.08, 1.05, 1.10, 1.10, 1.10, 1.30, 1.10, 0.05),
        Holiday::LaborDay => Modifier::new(0.95, 1.05, 1.03, 1.00, 1.10, 1.00, 1.03, 0.02),
        Holiday::IndigenousPeoplesDay => Modifier::new(1.00, 1.00, 1.00, 1.00, 1.03, 1.12, 1.10, 0.02),
        Holiday::Halloween => Modifier::new(1.05, 1.08, 1.00, 1.25, 1.05, 1.05, 1.10, 0.03),
        Holiday::DiaDeMuertos => Modifier::new(1.03, 1.03, 1.05, 1.05, 1.05, 1.25, 1.15, 0.04),
        Holiday::VeteransDay => Modifier::new(0.97, 1.00, 1.00, 1.00, 1.03, 1.00, 1.08, 0.01),
        Holiday::Thanksgiving => Modifier::new(0.80, 0.85, 0.95, 0.85, 0.95, 1.00, 1.15, 0.04),
        Holiday::BlackFriday => Modifier::new(1.20, 1.35, 1.05, 1.00, 1.00, 1.00, 1.00, -0.02),
        Holiday::Hanukkah => Modifier::new(1.00, 1.05, 1.00, 1.00, 1.00, 1.08, 1.08, 0.02),
        Holiday::ChristmasEve => Modifier::new(0.95, 1.15, 1.00, 0.90, 1.00, 1.00, 1.10, 0.04),
        Holiday::Christmas => Modifier::new(0.75, 0.70, 0.95, 0.80, 1.00, 1.00, 1.15, 0.05),
        Holiday::Kwanzaa => Modifier::new(1.00, 1.03, 1.00, 1.00, 1.00, 1.10, 1.12, 0.02),
        Holiday::None | Holiday::Other => Modifier::NONE,
    }
}

/// Holidays that concentrate in particular clusters.
pub fn holiday_cluster_modifier(holiday: Holiday, cluster: Cluster) -> Modifier {
    match (holiday, cluster) {
        (Holiday::OaklandPride, Cluster::DowntownCore) => only(1.05, 1.12, 1.05, 1.05, 0.02),
        (Holiday::ArtSoulFestival, Cluster::DowntownCore) => {
            Modifier::new(1.05, 1.00, 1.05, 1.05, 1.00, 1.12, 1.00, 0.02)
        }
        (Holiday::LunarNewYear, Cluster::DowntownCore) => {
            Modifier::new(1.05, 1.08, 1.05, 1.00, 1.00, 1.10, 1.00, 0.0)
        }
        (Holiday::CincoDeMayo | Holiday::DiaDeMuertos, Cluster::EastOakland) => {
            Modifier::new(1.05, 1.05, 1.05, 1.05, 1.05, 1.15, 1.12, 0.03)
        }
        (Holiday::Independence, Cluster::WaterfrontWest) => only(1.08, 1.05, 1.12, 1.05, 0.0),
        (Holiday::Juneteenth, Cluster::WaterfrontWest) => {
            Modifier::new(1.00, 1.00, 1.00, 1.00, 1.05, 1.08, 1.12, 0.02)
        }
        (Holiday::FourTwenty | Holiday::EarthDay, Cluster::LakeCorridor) => {
            only(1.0, 1.0, 1.0, 1.10, 0.01)
        }
        (Holiday::Halloween, Cluster::NorthHills) => {
            Modifier::new(1.00, 1.05, 1.00, 1.00, 1.05, 1.00, 1.10, 0.01)
        }
        _ => Modifier::NONE,
    }
}

/// First Friday art walk: strongest downtown, spilling into the north hills.
pub fn first_friday_modifier(cluster: Cluster) -> Modifier {
    match cluster {
        Cluster::DowntownCore => Modifier::new(1.10, 1.05, 1.05, 1.5, 1.05, 1.6, 1.05, 0.03),
        Cluster::NorthHills => Modifier::new(1.05, 1.03, 1.00, 1.3, 1.00, 1.35, 1.03, 0.02),
        _ => Modifier::new(1.00, 1.00, 1.00, 1.2, 1.00, 1.25, 1.00, 0.01),
    }
}

pub const CREATION_DAY: Modifier = Modifier::new(1.00, 1.00, 1.00, 1.00, 1.05, 1.08, 1.15, 0.05);

pub fn apply_calendar(v: &mut MetricVector, calendar: &CycleCalendar, cluster: Cluster) {
    priority_modifier(calendar.resolved_priority()).apply(v);
    holiday_modifier(calendar.holiday).apply(v);
    holiday_cluster_modifier(calendar.holiday, cluster).apply(v);
    if calendar.first_friday {
        first_friday_modifier(cluster).apply(v);
    }
    if calendar.creation_day {
        CREATION_DAY.apply(v);
    }
}

// ---------------------------------------------------------------------------
// Sports
// ---------------------------------------------------------------------------

pub fn sports_modifier(phase: SportsPhase) -> Modifier {
    match phase {
        SportsPhase::Preseason => Modifier::new(1.00, 1.00, 1.00, 1.02, 1.00, 1.00, 1.00, 0.01),
        SportsPhase::EarlySeason => Modifier::new(1.02, 1.01, 1.00, 1.04, 1.00, 1.00, 1.01, 0.02),
        SportsPhase::MidSeason => Modifier::new(1.03, 1.01, 1.00, 1.05, 1.00, 1.00, 1.01, 0.02),
        SportsPhase::LateSeason => Modifier::new(1.04, 1.02, 1.01, 1.06, 1.00, 1.00, 1.02, 0.03),
        SportsPhase::Postseason => Modifier::new(1.08, 1.05, 1.03, 1.12, 1.00, 1.00, 1.05, 0.06),
        SportsPhase::Finals => Modifier::new(1.12, 1.08, 1.05, 1.18, 1.00, 1.00, 1.08, 0.10),
    }
}

/// Extra playoff traffic and nightlife near the venues.
pub fn playoff_ripple(phase: SportsPhase, cluster: Cluster) -> Modifier {
    if !phase.is_playoff() {
        return Modifier::NONE;
    }
    let finals = phase == SportsPhase::Finals;
    match cluster {
        Cluster::WaterfrontWest if finals => only(1.15, 1.20, 1.0, 1.0, 0.0),
        Cluster::WaterfrontWest => only(1.10, 1.12, 1.0, 1.0, 0.0),
        Cluster::EastOakland if finals => only(1.18, 1.12, 1.0, 1.0, 0.0),
        Cluster::EastOakland => only(1.12, 1.08, 1.0, 1.0, 0.0),
        Cluster::DowntownCore if finals => only(1.08, 1.20, 1.0, 1.0, 0.0),
        Cluster::DowntownCore => only(1.06, 1.15, 1.0, 1.0, 0.0),
        _ => Modifier::NONE,
    }
}

pub fn apply_sports(v: &mut MetricVector, phase: Option<SportsPhase>, cluster: Cluster) {
    if let Some(phase) = phase {
        sports_modifier(phase).apply(v);
        playoff_ripple(phase, cluster).apply(v);
    }
}

// ---------------------------------------------------------------------------
// Place
// ---------------------------------------------------------------------------

/// Rain heavy enough to empty the lakeshore.
pub const LAKE_RAIN_SUPPRESSION: f64 = 0.4;

pub fn apply_place_bias(v: &mut MetricVector, cluster: Cluster, precipitation_intensity: f64) {
    let bias = match cluster {
        Cluster::DowntownCore => Modifier::new(1.10, 1.08, 1.00, 1.10, 1.00, 1.05, 1.00, 0.0),
        Cluster::WaterfrontWest => Modifier::new(1.00, 1.00, 1.12, 1.05, 1.00, 1.00, 1.00, 0.0),
        Cluster::LakeCorridor => {
            let public = if precipitation_intensity >= LAKE_RAIN_SUPPRESSION {
                1.0
            } else {
                1.12
            };
            Modifier::new(1.00, 1.00, 1.00, 1.00, public, 1.00, 1.05, 0.0)
        }
        Cluster::NorthHills => Modifier::new(0.95, 1.05, 1.00, 1.00, 1.00, 1.08, 1.00, 0.0),
        Cluster::EastOakland => Modifier::new(1.02, 1.00, 0.92, 1.00, 1.00, 1.00, 1.10, 0.0),
    };
    bias.apply(v);
}
