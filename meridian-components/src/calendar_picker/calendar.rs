//! Calendar collaborator and month arithmetic.
//!
//! The picker never assumes Gregorian rules directly. Everything that depends
//! on the calendrical system (week length, first weekday, month length) goes
//! through the [`Calendar`] trait. Days themselves are identified by
//! [`NaiveDate`], which names an absolute day independent of the calendar used
//! to group days into weeks and months.
use std::fmt;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use thiserror::Error;

const MONTHS_PER_YEAR: i64 = 12;

/// Errors produced when building a [`YearMonth`] from checked input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum YearMonthError {
    /// The month was not in `1..=12`.
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),
}

/// A year and month pair used for month navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year/month pair, rejecting months outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Creates a year/month pair, rolling an out-of-range month into the
    /// neighbouring years: month 13 of 2024 is January 2025 and month 0 of
    /// 2024 is December 2023.
    pub fn normalized(year: i32, month: i32) -> Self {
        Self::from_total(i64::from(year) * MONTHS_PER_YEAR + i64::from(month) - 1)
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Adds or subtracts months, adjusting the year as needed.
    pub fn add_months(&self, delta: i32) -> Self {
        Self::from_total(self.total_months() + i64::from(delta))
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: YearMonth) -> i32 {
        i32::try_from(other.total_months() - self.total_months())
            .expect("month distance out of range")
    }

    fn total_months(&self) -> i64 {
        i64::from(self.year) * MONTHS_PER_YEAR + i64::from(self.month) - 1
    }

    fn from_total(total: i64) -> Self {
        Self {
            year: i32::try_from(total.div_euclid(MONTHS_PER_YEAR)).expect("year out of range"),
            month: (total.rem_euclid(MONTHS_PER_YEAR) + 1) as u32,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", month_name(self.month), self.year)
    }
}

/// Calendrical rules consumed by the picker.
///
/// Implementations must be pure: the same input always yields the same
/// output. A calendar with zero days per week is a programming error and makes
/// the provided methods panic.
pub trait Calendar: Send + Sync + fmt::Debug {
    /// Number of days in a week (one grid row).
    fn days_per_week(&self) -> u32;

    /// First day of the given month.
    fn first_day_of_month(&self, month: YearMonth) -> NaiveDate;

    /// Number of days in the given month.
    fn days_in_month(&self, month: YearMonth) -> u32;

    /// Longest month length this calendar can produce.
    fn max_days_in_month(&self) -> u32;

    /// Zero-based grid column of `date`, counted from the calendar's first
    /// weekday.
    fn weekday_column(&self, date: NaiveDate) -> u32;

    /// Month containing `date`.
    fn year_month_of(&self, date: NaiveDate) -> YearMonth;

    /// Day-of-month number of `date`.
    fn day_of_month(&self, date: NaiveDate) -> u32;

    /// Short weekday labels in column order.
    fn weekday_symbols(&self) -> Vec<String>;

    /// Number of grid rows the month spans, including the lead-in and
    /// lead-out days that fill its first and last rows.
    fn weeks_in_month(&self, month: YearMonth) -> u32 {
        let days_per_week = self.days_per_week();
        assert!(days_per_week > 0, "calendar must have at least one day per week");
        let lead_in = self.weekday_column(self.first_day_of_month(month));
        (lead_in + self.days_in_month(month)).div_ceil(days_per_week)
    }

    /// Largest row count any month can need: the longest month starting in
    /// the last column.
    fn max_weeks_in_month(&self) -> u32 {
        let days_per_week = self.days_per_week();
        assert!(days_per_week > 0, "calendar must have at least one day per week");
        (days_per_week - 1 + self.max_days_in_month()).div_ceil(days_per_week)
    }
}

/// The proleptic Gregorian calendar with a configurable first weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GregorianCalendar {
    first_weekday: Weekday,
}

impl GregorianCalendar {
    /// Creates a calendar whose rows start on `first_weekday`.
    pub fn new(first_weekday: Weekday) -> Self {
        Self { first_weekday }
    }

    /// Returns the weekday shown in the first column.
    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }
}

impl Default for GregorianCalendar {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}

impl Calendar for GregorianCalendar {
    fn days_per_week(&self) -> u32 {
        7
    }

    fn first_day_of_month(&self, month: YearMonth) -> NaiveDate {
        NaiveDate::from_ymd_opt(month.year(), month.month(), 1)
            .expect("year is outside the range supported by chrono")
    }

    fn days_in_month(&self, month: YearMonth) -> u32 {
        match month.month() {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(month.year()) => 29,
            _ => 28,
        }
    }

    fn max_days_in_month(&self) -> u32 {
        31
    }

    fn weekday_column(&self, date: NaiveDate) -> u32 {
        let day = date.weekday().num_days_from_monday();
        let first = self.first_weekday.num_days_from_monday();
        (day + 7 - first) % 7
    }

    fn year_month_of(&self, date: NaiveDate) -> YearMonth {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    fn day_of_month(&self, date: NaiveDate) -> u32 {
        date.day()
    }

    fn weekday_symbols(&self) -> Vec<String> {
        let mut weekday = self.first_weekday;
        (0..7)
            .map(|_| {
                let label = weekday_short_label(weekday).to_string();
                weekday = weekday.succ();
                label
            })
            .collect()
    }
}

/// Conversion of date-like values into the calendar day they fall on.
///
/// Time-of-day is discarded, so two instants on the same local day compare
/// equal after conversion.
pub trait IntoCalendarDay {
    /// Returns the local calendar day.
    fn into_calendar_day(self) -> NaiveDate;
}

impl IntoCalendarDay for NaiveDate {
    fn into_calendar_day(self) -> NaiveDate {
        self
    }
}

impl IntoCalendarDay for NaiveDateTime {
    fn into_calendar_day(self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> IntoCalendarDay for DateTime<Tz> {
    fn into_calendar_day(self) -> NaiveDate {
        self.with_timezone(&Local).date_naive()
    }
}

/// Today's date in the local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

fn weekday_short_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Utc};
    use rstest::rstest;

    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).expect("valid month")
    }

    #[rstest]
    #[case(2024, 13, 2025, 1)]
    #[case(2024, 0, 2023, 12)]
    #[case(2024, -1, 2023, 11)]
    #[case(2024, 25, 2026, 1)]
    #[case(2024, -12, 2022, 12)]
    #[case(2024, 12, 2024, 12)]
    fn normalization_rolls_months_into_range(
        #[case] year: i32,
        #[case] month: i32,
        #[case] expected_year: i32,
        #[case] expected_month: u32,
    ) {
        let normalized = YearMonth::normalized(year, month);
        assert_eq!(normalized.year(), expected_year);
        assert_eq!(normalized.month(), expected_month);
    }

    #[test]
    fn checked_constructor_rejects_out_of_range_months() {
        assert_eq!(
            YearMonth::new(2024, 13),
            Err(YearMonthError::MonthOutOfRange(13))
        );
        assert_eq!(
            YearMonth::new(2024, 0),
            Err(YearMonthError::MonthOutOfRange(0))
        );
        assert!(YearMonth::new(2024, 12).is_ok());
    }

    #[test]
    fn month_arithmetic_crosses_years() {
        let march = ym(2024, 3);
        assert_eq!(march.add_months(10), ym(2025, 1));
        assert_eq!(march.add_months(-3), ym(2023, 12));
        assert_eq!(march.months_until(ym(2025, 1)), 10);
        assert_eq!(ym(2025, 1).months_until(march), -10);
    }

    #[test]
    fn normalization_keeps_the_year_extremes() {
        let last = YearMonth::normalized(i32::MAX, 12);
        assert_eq!((last.year(), last.month()), (i32::MAX, 12));
        let first = YearMonth::normalized(i32::MIN, 1);
        assert_eq!((first.year(), first.month()), (i32::MIN, 1));
    }

    #[test]
    #[should_panic(expected = "year out of range")]
    fn normalization_past_the_last_year_panics() {
        YearMonth::normalized(i32::MAX, 13);
    }

    #[test]
    #[should_panic(expected = "year out of range")]
    fn adding_months_past_the_first_year_panics() {
        ym(i32::MIN, 1).add_months(-1);
    }

    #[test]
    #[should_panic(expected = "month distance out of range")]
    fn distance_across_the_whole_year_range_panics() {
        ym(i32::MIN, 1).months_until(ym(i32::MAX, 12));
    }

    #[test]
    fn display_uses_full_month_name() {
        assert_eq!(ym(2024, 3).to_string(), "March 2024");
    }

    #[test]
    fn gregorian_month_lengths() {
        let calendar = GregorianCalendar::default();
        assert_eq!(calendar.days_in_month(ym(2024, 2)), 29);
        assert_eq!(calendar.days_in_month(ym(2025, 2)), 28);
        assert_eq!(calendar.days_in_month(ym(1900, 2)), 28);
        assert_eq!(calendar.days_in_month(ym(2000, 2)), 29);
        assert_eq!(calendar.days_in_month(ym(2024, 4)), 30);
    }

    #[rstest]
    #[case(Weekday::Sun, 2024, 2, 5)]
    #[case(Weekday::Sun, 2025, 2, 5)]
    #[case(Weekday::Sun, 2026, 2, 4)]
    #[case(Weekday::Sun, 2025, 8, 6)]
    #[case(Weekday::Mon, 2021, 2, 4)]
    fn gregorian_weeks_in_month(
        #[case] first_weekday: Weekday,
        #[case] year: i32,
        #[case] month: u32,
        #[case] weeks: u32,
    ) {
        let calendar = GregorianCalendar::new(first_weekday);
        assert_eq!(calendar.weeks_in_month(ym(year, month)), weeks);
        assert_eq!(calendar.max_weeks_in_month(), 6);
    }

    #[test]
    fn weekday_column_follows_first_weekday() {
        let thursday = NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date");
        assert_eq!(GregorianCalendar::new(Weekday::Sun).weekday_column(thursday), 4);
        assert_eq!(GregorianCalendar::new(Weekday::Mon).weekday_column(thursday), 3);
        assert_eq!(GregorianCalendar::new(Weekday::Thu).weekday_column(thursday), 0);
    }

    #[test]
    fn weekday_symbols_start_on_first_weekday() {
        let symbols = GregorianCalendar::new(Weekday::Mon).weekday_symbols();
        assert_eq!(symbols, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }

    #[test]
    fn date_times_collapse_to_their_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date");
        let morning = day.and_time(NaiveTime::from_hms_opt(8, 30, 0).expect("valid time"));
        let evening = day.and_time(NaiveTime::from_hms_opt(22, 5, 0).expect("valid time"));
        assert_eq!(morning.into_calendar_day(), evening.into_calendar_day());
        assert_eq!(morning.into_calendar_day(), day);

        let local = Local
            .from_local_datetime(&morning)
            .single()
            .expect("unambiguous local time");
        assert_eq!(local.with_timezone(&Utc).into_calendar_day(), day);
    }
}
