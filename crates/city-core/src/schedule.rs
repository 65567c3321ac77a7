//! Synthetic calendar used by the binary and the long-run tests.
//!
//! Four cycles make a month. The first cycle of each month is First Friday,
//! named holidays land on a fixed week, and the sports season follows the
//! baseball year.

use city_events::{CycleCalendar, Holiday, SportsPhase, MONTHS_PER_YEAR};

pub const CYCLES_PER_MONTH: u64 = 4;
pub const CYCLES_PER_YEAR: u64 = CYCLES_PER_MONTH * MONTHS_PER_YEAR as u64;

/// (month, week within month, holiday)
const HOLIDAYS: &[(u8, u64, Holiday)] = &[
    (1, 0, Holiday::NewYear),
    (1, 2, Holiday::MlkDay),
    (2, 0, Holiday::LunarNewYear),
    (2, 1, Holiday::ValentinesDay),
    (2, 2, Holiday::PresidentsDay),
    (3, 2, Holiday::StPatricksDay),
    (3, 3, Holiday::CesarChavezDay),
    (4, 0, Holiday::Easter),
    (4, 2, Holiday::FourTwenty),
    (4, 3, Holiday::EarthDay),
    (5, 0, Holiday::CincoDeMayo),
    (5, 1, Holiday::MothersDay),
    (5, 3, Holiday::MemorialDay),
    (6, 1, Holiday::OaklandPride),
    (6, 2, Holiday::Juneteenth),
    (6, 3, Holiday::FathersDay),
    (7, 0, Holiday::Independence),
    (8, 2, Holiday::ArtSoulFestival),
    (9, 0, Holiday::LaborDay),
    (10, 1, Holiday::IndigenousPeoplesDay),
    (10, 3, Holiday::Halloween),
    (11, 0, Holiday::DiaDeMuertos),
    (11, 1, Holiday::VeteransDay),
    (11, 2, Holiday::Thanksgiving),
    (11, 3, Holiday::BlackFriday),
    (12, 0, Holiday::Hanukkah),
    (12, 1, Holiday::ChristmasEve),
    (12, 2, Holiday::Christmas),
    (12, 3, Holiday::NewYearsEve),
];

fn sports_phase(month: u8, week: u64) -> Option<SportsPhase> {
    match month {
        3 => Some(SportsPhase::Preseason),
        4 | 5 => Some(SportsPhase::EarlySeason),
        6 | 7 => Some(SportsPhase::MidSeason),
        8 | 9 => Some(SportsPhase::LateSeason),
        10 if week < 3 => Some(SportsPhase::Postseason),
        10 => Some(SportsPhase::Finals),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticCalendar {
    start_month: u8,
}

impl SyntheticCalendar {
    /// Out-of-range start months wrap into 1-12.
    pub fn new(start_month: u8) -> Self {
        let start_month = (start_month.max(1) - 1) % MONTHS_PER_YEAR + 1;
        Self { start_month }
    }

    /// Month for a 1-based cycle.
    pub fn month_for(&self, cycle: u64) -> u8 {
        let months_elapsed = cycle.saturating_sub(1) / CYCLES_PER_MONTH;
        let offset = (u64::from(self.start_month - 1) + months_elapsed) % u64::from(MONTHS_PER_YEAR);
        offset as u8 + 1
    }

    pub fn calendar_for(&self, cycle: u64) -> CycleCalendar {
        let month = self.month_for(cycle);
        let week = cycle.saturating_sub(1) % CYCLES_PER_MONTH;

        let mut calendar = CycleCalendar::new(cycle, month)
            .with_first_friday(week == 0)
            .with_creation_day(cycle % CYCLES_PER_YEAR == 1);
        if let Some(&(_, _, holiday)) = HOLIDAYS
            .iter()
            .find(|(m, w, _)| *m == month && *w == week)
        {
            calendar = calendar.with_holiday(holiday);
        }
        if let Some(phase) = sports_phase(month, week) {
            calendar = calendar.with_sports_phase(phase);
        }
        calendar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_events::Season;

    #[test]
    fn test_months_advance_every_four_cycles() {
        let cal = SyntheticCalendar::new(11);
        assert_eq!(cal.month_for(1), 11);
        assert_eq!(cal.month_for(4), 11);
        assert_eq!(cal.month_for(5), 12);
        assert_eq!(cal.month_for(9), 1);
        assert_eq!(cal.calendar_for(9).season, Season::Winter);
    }

    #[test]
    fn test_first_friday_on_first_week() {
        let cal = SyntheticCalendar::new(1);
        assert!(cal.calendar_for(1).first_friday);
        assert!(!cal.calendar_for(2).first_friday);
        assert!(cal.calendar_for(5).first_friday);
        assert!(cal.calendar_for(1).creation_day);
        assert!(!cal.calendar_for(5).creation_day);
    }

    #[test]
    fn test_holidays_and_sports() {
        let cal = SyntheticCalendar::new(7);
        assert_eq!(cal.calendar_for(1).holiday, Holiday::Independence);
        let october_last = cal.calendar_for(16);
        assert_eq!(october_last.month, 10);
        assert_eq!(october_last.holiday, Holiday::Halloween);
        assert_eq!(october_last.sports_phase, Some(SportsPhase::Finals));
        assert_eq!(cal.calendar_for(2).sports_phase, Some(SportsPhase::MidSeason));
    }

    #[test]
    fn test_start_month_wraps() {
        assert_eq!(SyntheticCalendar::new(0).month_for(1), 1);
        assert_eq!(SyntheticCalendar::new(13).month_for(1), 1);
    }
}
