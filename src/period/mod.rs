//! Calendar window arithmetic: classify dates into day/week/month/year windows,
//! shift a reference date by whole periods, and render human period labels.
//!
//! All aggregation and recurrence logic goes through this module so that there
//! is exactly one answer to "what does +1 week mean".

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const MONTHS_LONG_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_SHORT_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Calendar granularity used to window transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Day,
    Week,
    Month,
    Year,
}

impl TimePeriod {
    /// Inclusive [start, end] of the period window containing `reference`.
    /// Weeks start Monday; a Sunday reference belongs to the week ending that
    /// day, not the one starting the next.
    pub fn window(&self, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            TimePeriod::Day => (reference, reference),
            TimePeriod::Week => {
                let delta = reference.weekday().num_days_from_monday() as i64;
                let start = reference - Duration::days(delta);
                (start, start + Duration::days(6))
            }
            TimePeriod::Month => {
                let start = reference.with_day(1).unwrap_or(reference);
                let end = shift_month(start, 1) - Duration::days(1);
                (start, end)
            }
            TimePeriod::Year => {
                let year = reference.year();
                (
                    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(reference),
                    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(reference),
                )
            }
        }
    }

    /// Membership test: does `item` fall inside the window containing
    /// `reference`?
    pub fn contains(&self, item: NaiveDate, reference: NaiveDate) -> bool {
        match self {
            TimePeriod::Day => item == reference,
            TimePeriod::Week => {
                let (start, end) = self.window(reference);
                item >= start && item <= end
            }
            TimePeriod::Month => {
                item.month() == reference.month() && item.year() == reference.year()
            }
            TimePeriod::Year => item.year() == reference.year(),
        }
    }

    /// Moves `reference` by `steps` whole periods (negative steps go back).
    /// Month and year shifts clamp the day-of-month to the target month
    /// length, so a month shift is not always invertible at month ends.
    pub fn shift(&self, reference: NaiveDate, steps: i32) -> NaiveDate {
        match self {
            TimePeriod::Day => reference + Duration::days(steps as i64),
            TimePeriod::Week => reference + Duration::weeks(steps as i64),
            TimePeriod::Month => shift_month(reference, steps),
            TimePeriod::Year => shift_year(reference, steps),
        }
    }

    /// Human label for the window containing `reference`, in es-ES wording:
    /// "10 de marzo de 2024", "4 mar - 10 mar", "marzo de 2024", "2024".
    pub fn label(&self, reference: NaiveDate) -> String {
        match self {
            TimePeriod::Day => format!(
                "{} de {} de {}",
                reference.day(),
                month_long(reference),
                reference.year()
            ),
            TimePeriod::Week => {
                let (start, end) = self.window(reference);
                format!(
                    "{} {} - {} {}",
                    start.day(),
                    month_short(start),
                    end.day(),
                    month_short(end)
                )
            }
            TimePeriod::Month => {
                format!("{} de {}", month_long(reference), reference.year())
            }
            TimePeriod::Year => reference.year().to_string(),
        }
    }
}

/// Parses an ISO calendar date (`YYYY-MM-DD`), tolerating a trailing
/// timestamp. Transactions carrying a date that fails here must be treated as
/// matching no period window, never as a crash.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT) {
        return Ok(date);
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, ISO_DATE_FORMAT).ok())
        .ok_or_else(|| TrackerError::InvalidDate(raw.to_string()))
}

fn month_long(date: NaiveDate) -> &'static str {
    MONTHS_LONG_ES[date.month0() as usize]
}

fn month_short(date: NaiveDate) -> &'static str {
    MONTHS_SHORT_ES[date.month0() as usize]
}

/// Shifts by whole calendar months, clamping the day to the target month
/// length (Jan 31 + 1 month = Feb 28/29).
pub(crate) fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(date)
}

/// Shifts by whole calendar years, clamping Feb 29 to Feb 28 on non-leap
/// targets.
pub(crate) fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const ALL_PERIODS: [TimePeriod; 4] = [
        TimePeriod::Day,
        TimePeriod::Week,
        TimePeriod::Month,
        TimePeriod::Year,
    ];

    #[test]
    fn every_date_matches_its_own_window() {
        let dates = [d(2024, 1, 1), d(2024, 2, 29), d(2024, 12, 31), d(2025, 6, 15)];
        for date in dates {
            for period in ALL_PERIODS {
                assert!(
                    period.contains(date, date),
                    "{date} should match its own {period:?} window"
                );
            }
        }
    }

    #[test]
    fn week_window_runs_monday_to_sunday() {
        // 2024-03-13 is a Wednesday.
        let reference = d(2024, 3, 13);
        let (start, end) = TimePeriod::Week.window(reference);
        assert_eq!(start, d(2024, 3, 11));
        assert_eq!(end, d(2024, 3, 17));

        assert!(TimePeriod::Week.contains(d(2024, 3, 11), reference));
        assert!(TimePeriod::Week.contains(d(2024, 3, 17), reference));
        assert!(!TimePeriod::Week.contains(d(2024, 3, 18), reference));
        assert!(!TimePeriod::Week.contains(d(2024, 3, 10), reference));
    }

    #[test]
    fn sunday_belongs_to_the_week_it_ends() {
        // 2024-03-17 is a Sunday; its week started 2024-03-11.
        let (start, end) = TimePeriod::Week.window(d(2024, 3, 17));
        assert_eq!(start, d(2024, 3, 11));
        assert_eq!(end, d(2024, 3, 17));
    }

    #[test]
    fn monday_reference_starts_its_own_week() {
        let (start, _) = TimePeriod::Week.window(d(2024, 3, 11));
        assert_eq!(start, d(2024, 3, 11));
    }

    #[test]
    fn shift_is_invertible_for_day_week_year() {
        let date = d(2024, 3, 13);
        for period in [TimePeriod::Day, TimePeriod::Week, TimePeriod::Year] {
            assert_eq!(period.shift(period.shift(date, 1), -1), date);
        }
    }

    #[test]
    fn month_shift_clamps_at_month_end() {
        assert_eq!(TimePeriod::Month.shift(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(TimePeriod::Month.shift(d(2023, 1, 31), 1), d(2023, 2, 28));
        // Known non-invertible edge: the clamp loses the original day.
        assert_eq!(TimePeriod::Month.shift(d(2024, 2, 29), -1), d(2024, 1, 29));
    }

    #[test]
    fn month_shift_rolls_over_year_boundaries() {
        assert_eq!(TimePeriod::Month.shift(d(2024, 12, 15), 1), d(2025, 1, 15));
        assert_eq!(TimePeriod::Month.shift(d(2024, 1, 15), -1), d(2023, 12, 15));
    }

    #[test]
    fn year_shift_clamps_leap_day() {
        assert_eq!(TimePeriod::Year.shift(d(2024, 2, 29), 1), d(2025, 2, 28));
        assert_eq!(TimePeriod::Year.shift(d(2024, 2, 29), 4), d(2028, 2, 29));
    }

    #[test]
    fn month_window_covers_whole_month() {
        let (start, end) = TimePeriod::Month.window(d(2024, 2, 14));
        assert_eq!(start, d(2024, 2, 1));
        assert_eq!(end, d(2024, 2, 29));
    }

    #[test]
    fn labels_are_spanish() {
        let date = d(2024, 3, 10);
        assert_eq!(TimePeriod::Day.label(date), "10 de marzo de 2024");
        assert_eq!(TimePeriod::Month.label(date), "marzo de 2024");
        assert_eq!(TimePeriod::Year.label(date), "2024");
        // Week of 2024-03-10 (a Sunday) runs 4..10 March.
        assert_eq!(TimePeriod::Week.label(date), "4 mar - 10 mar");
    }

    #[test]
    fn iso_date_parsing_tolerates_timestamps() {
        assert_eq!(parse_iso_date("2024-03-10").unwrap(), d(2024, 3, 10));
        assert_eq!(
            parse_iso_date("2024-03-10T12:30:00").unwrap(),
            d(2024, 3, 10)
        );
        assert!(matches!(
            parse_iso_date("10/03/2024"),
            Err(TrackerError::InvalidDate(_))
        ));
    }

    #[test]
    fn week_label_spans_month_boundaries() {
        // 2024-04-01 is a Monday; the prior Sunday closes March's last week.
        assert_eq!(TimePeriod::Week.label(d(2024, 3, 31)), "25 mar - 31 mar");
        assert_eq!(TimePeriod::Week.label(d(2024, 4, 1)), "1 abr - 7 abr");
    }
}
