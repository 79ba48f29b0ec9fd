//! Calendar source for tenure calculations.
//!
//! RULE: Nothing in the engine reads the wall clock directly.
//! "Today" always comes from a Clock so tenure is reproducible in tests.

use chrono::{Datelike, NaiveDate, Utc};

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the current UTC date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}

/// Whole years elapsed from `since` to `today`.
/// A year only counts once its anniversary has been reached.
/// Dates in the future give 0.
pub fn whole_years_between(since: NaiveDate, today: NaiveDate) -> u32 {
    if since >= today {
        return 0;
    }
    let mut years = today.year() - since.year();
    if (today.month(), today.day()) < (since.month(), since.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// The same calendar day `years` years before `today`.
/// Feb 29 falls back to Feb 28 in non-leap years.
pub fn years_ago(today: NaiveDate, years: u32) -> NaiveDate {
    let year = today.year() - years as i32;
    NaiveDate::from_ymd_opt(year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), today.day() - 1))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn anniversary_counts_on_the_day() {
        assert_eq!(whole_years_between(date(2020, 3, 15), date(2026, 3, 15)), 6);
        assert_eq!(whole_years_between(date(2020, 3, 15), date(2026, 3, 14)), 5);
    }

    #[test]
    fn future_join_date_is_zero() {
        assert_eq!(whole_years_between(date(2030, 1, 1), date(2026, 1, 1)), 0);
    }

    #[test]
    fn years_ago_handles_leap_day() {
        assert_eq!(years_ago(date(2024, 2, 29), 1), date(2023, 2, 28));
        assert_eq!(whole_years_between(years_ago(date(2024, 2, 29), 6), date(2024, 2, 29)), 6);
    }
}
