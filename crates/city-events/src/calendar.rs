//! Calendar Types
//!
//! Season, month, holiday and sports-phase context for a single simulation cycle.
//!
//! # Example
//!
//! ```
//! use city_events::{CycleCalendar, Holiday, Season};
//!
//! let cal = CycleCalendar::new(12, 7).with_holiday(Holiday::Independence);
//! assert_eq!(cal.season, Season::Summer);
//! assert_eq!(cal.holiday.to_string(), "independence");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of months in a year.
pub const MONTHS_PER_YEAR: u8 = 12;

/// Season of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    #[serde(alias = "autumn")]
    Fall,
    Winter,
}

impl Season {
    /// Returns the next season in order.
    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// Meteorological season for a month (1-12). Unknown months read as spring.
    pub fn from_month(month: u8) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Spring,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "spring"),
            Season::Summer => write!(f, "summer"),
            Season::Fall => write!(f, "fall"),
            Season::Winter => write!(f, "winter"),
        }
    }
}

impl FromStr for Season {
    type Err = ParseCalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(ParseCalendarError::InvalidSeason(s.to_string())),
        }
    }
}

/// How much weight the city gives a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HolidayPriority {
    #[default]
    None,
    Minor,
    /// Local civic observances
    Oakland,
    Cultural,
    Major,
}

/// Named holidays with their own modifier tables.
///
/// Unrecognized names deserialize to [`Holiday::Other`], which carries only
/// its priority baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Holiday {
    #[default]
    None,
    NewYearsEve,
    NewYear,
    MlkDay,
    LunarNewYear,
    ValentinesDay,
    PresidentsDay,
    StPatricksDay,
    CesarChavezDay,
    Easter,
    FourTwenty,
    EarthDay,
    CincoDeMayo,
    MothersDay,
    MemorialDay,
    Juneteenth,
    FathersDay,
    Independence,
    OaklandPride,
    ArtSoulFestival,
    LaborDay,
    IndigenousPeoplesDay,
    Halloween,
    DiaDeMuertos,
    VeteransDay,
    Thanksgiving,
    BlackFriday,
    Hanukkah,
    ChristmasEve,
    Christmas,
    Kwanzaa,
    #[serde(other)]
    Other,
}

impl Holiday {
    /// All named holidays (excludes `None` and `Other`).
    pub const NAMED: [Holiday; 30] = [
        Holiday::NewYearsEve,
        Holiday::NewYear,
        Holiday::MlkDay,
        Holiday::LunarNewYear,
        Holiday::ValentinesDay,
        Holiday::PresidentsDay,
        Holiday::StPatricksDay,
        Holiday::CesarChavezDay,
        Holiday::Easter,
        Holiday::FourTwenty,
        Holiday::EarthDay,
        Holiday::CincoDeMayo,
        Holiday::MothersDay,
        Holiday::MemorialDay,
        Holiday::Juneteenth,
        Holiday::FathersDay,
        Holiday::Independence,
        Holiday::OaklandPride,
        Holiday::ArtSoulFestival,
        Holiday::LaborDay,
        Holiday::IndigenousPeoplesDay,
        Holiday::Halloween,
        Holiday::DiaDeMuertos,
        Holiday::VeteransDay,
        Holiday::Thanksgiving,
        Holiday::BlackFriday,
        Holiday::Hanukkah,
        Holiday::ChristmasEve,
        Holiday::Christmas,
        Holiday::Kwanzaa,
    ];

    /// Priority used when the caller does not supply one.
    pub fn default_priority(self) -> HolidayPriority {
        match self {
            Holiday::None => HolidayPriority::None,
            Holiday::NewYear
            | Holiday::NewYearsEve
            | Holiday::Independence
            | Holiday::Thanksgiving
            | Holiday::Christmas
            | Holiday::MemorialDay
            | Holiday::LaborDay => HolidayPriority::Major,
            Holiday::MlkDay
            | Holiday::LunarNewYear
            | Holiday::CincoDeMayo
            | Holiday::Juneteenth
            | Holiday::DiaDeMuertos
            | Holiday::Hanukkah
            | Holiday::Kwanzaa
            | Holiday::CesarChavezDay
            | Holiday::IndigenousPeoplesDay => HolidayPriority::Cultural,
            Holiday::OaklandPride | Holiday::ArtSoulFestival | Holiday::FourTwenty => {
                HolidayPriority::Oakland
            }
            _ => HolidayPriority::Minor,
        }
    }

    pub fn is_holiday(self) -> bool {
        !matches!(self, Holiday::None)
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "other".to_string());
        write!(f, "{}", name)
    }
}

impl FromStr for Holiday {
    type Err = ParseCalendarError;

    /// Parses a snake_case holiday name; unknown names become `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Holiday::None);
        }
        serde_json::from_value(serde_json::Value::String(trimmed.to_lowercase()))
            .map_err(|_| ParseCalendarError::InvalidHoliday(s.to_string()))
    }
}

/// Phase of the local sports season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportsPhase {
    Preseason,
    EarlySeason,
    MidSeason,
    LateSeason,
    Postseason,
    Finals,
}

impl SportsPhase {
    /// Postseason and finals ripple into the stadium-adjacent clusters.
    pub fn is_playoff(self) -> bool {
        matches!(self, SportsPhase::Postseason | SportsPhase::Finals)
    }
}

/// Calendar context for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleCalendar {
    /// Cycle counter
    pub cycle: u64,
    /// Month 1-12; anything else falls back to a default climate
    pub month: u8,
    pub season: Season,
    #[serde(default)]
    pub holiday: Holiday,
    /// Explicit priority; `None` resolves to the holiday's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_priority: Option<HolidayPriority>,
    #[serde(default)]
    pub first_friday: bool,
    #[serde(default)]
    pub creation_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_phase: Option<SportsPhase>,
}

impl CycleCalendar {
    /// Creates a calendar for a cycle and month; season is derived from the month.
    pub fn new(cycle: u64, month: u8) -> Self {
        Self {
            cycle,
            month,
            season: Season::from_month(month),
            holiday: Holiday::None,
            holiday_priority: None,
            first_friday: false,
            creation_day: false,
            sports_phase: None,
        }
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holiday = holiday;
        self
    }

    pub fn with_priority(mut self, priority: HolidayPriority) -> Self {
        self.holiday_priority = Some(priority);
        self
    }

    pub fn with_first_friday(mut self, first_friday: bool) -> Self {
        self.first_friday = first_friday;
        self
    }

    pub fn with_creation_day(mut self, creation_day: bool) -> Self {
        self.creation_day = creation_day;
        self
    }

    pub fn with_sports_phase(mut self, phase: SportsPhase) -> Self {
        self.sports_phase = Some(phase);
        self
    }

    /// Priority after default resolution.
    pub fn resolved_priority(&self) -> HolidayPriority {
        self.holiday_priority
            .unwrap_or_else(|| self.holiday.default_priority())
    }

    pub fn has_valid_month(&self) -> bool {
        (1..=MONTHS_PER_YEAR).contains(&self.month)
    }
}

/// Error type for parsing calendar values from strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseCalendarError {
    InvalidSeason(String),
    InvalidHoliday(String),
}

impl fmt::Display for ParseCalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCalendarError::InvalidSeason(s) => write!(f, "invalid season: '{}'", s),
            ParseCalendarError::InvalidHoliday(s) => write!(f, "invalid holiday: '{}'", s),
        }
    }
}

impl std::error::Error for ParseCalendarError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(4), Season::Spring);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Fall);
        assert_eq!(Season::from_month(12), Season::Winter);
    }

    #[test]
    fn test_season_next_cycles() {
        let mut season = Season::Spring;
        for _ in 0..4 {
            season = season.next();
        }
        assert_eq!(season, Season::Spring);
    }

    #[test]
    fn test_season_parse_accepts_autumn() {
        assert_eq!("Autumn".parse::<Season>().unwrap(), Season::Fall);
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_unknown_holiday_deserializes_to_other() {
        let holiday: Holiday = serde_json::from_str(r#""festivus""#).unwrap();
        assert_eq!(holiday, Holiday::Other);
        assert_eq!(holiday.default_priority(), HolidayPriority::Minor);
    }

    #[test]
    fn test_holiday_parse_and_display() {
        assert_eq!("dia_de_muertos".parse::<Holiday>().unwrap(), Holiday::DiaDeMuertos);
        assert_eq!("".parse::<Holiday>().unwrap(), Holiday::None);
        assert_eq!(Holiday::NewYearsEve.to_string(), "new_years_eve");
    }

    #[test]
    fn test_named_holidays_are_distinct() {
        let mut names: Vec<_> = Holiday::NAMED.iter().collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 30);
    }

    #[test]
    fn test_resolved_priority_prefers_explicit() {
        let cal = CycleCalendar::new(1, 7).with_holiday(Holiday::Independence);
        assert_eq!(cal.resolved_priority(), HolidayPriority::Major);

        let cal = cal.with_priority(HolidayPriority::Minor);
        assert_eq!(cal.resolved_priority(), HolidayPriority::Minor);
    }

    #[test]
    fn test_calendar_deserializes_with_defaults() {
        let cal: CycleCalendar =
            serde_json::from_str(r#"{"cycle": 3, "month": 13, "season": "winter"}"#).unwrap();
        assert_eq!(cal.holiday, Holiday::None);
        assert!(!cal.first_friday);
        assert!(!cal.has_valid_month());
    }
}
