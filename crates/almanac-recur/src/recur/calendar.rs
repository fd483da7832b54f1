//! Calendar arithmetic: month lengths, clamped days and nth-weekday lookup.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use super::rule::NthWeek;

/// ## Summary
/// A calendar month of a specific year.
///
/// All date construction goes through this type so that a day past the end
/// of a short month is clamped instead of overflowing into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    /// 1..=12
    month: u32,
}

impl YearMonth {
    /// Returns the month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns `None` if `month` is not in 1..=12 or the month lies outside
    /// chrono's date range.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    /// ## Summary
    /// Moves forward by `months`, returning `None` past chrono's date range.
    #[must_use]
    pub fn checked_add(self, months: u32) -> Option<Self> {
        let total = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(months);
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days(self) -> u32 {
        // the last month chrono can represent is December, so it has 31 days
        self.checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next.year, next.month, 1))
            .and_then(|first| first.pred_opt())
            .map_or(31, |last| last.day())
    }

    /// `day` clamped to the last day of the month.
    #[must_use]
    pub fn clamp_day(self, day: u32) -> u32 {
        day.clamp(1, self.days())
    }

    /// ## Summary
    /// Returns the date for `day`, clamped to the month's last day.
    #[must_use]
    pub fn clamped_date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.clamp_day(day))
    }

    /// ## Summary
    /// Returns the `nth` occurrence of `weekday` in this month.
    ///
    /// A fifth occurrence that does not exist falls back to the last one.
    #[must_use]
    pub fn nth_weekday(self, nth: NthWeek, weekday: Weekday) -> Option<NaiveDate> {
        let Some(ordinal) = nth.ordinal() else {
            return self.last_weekday(weekday);
        };

        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let offset = (7 + weekday.num_days_from_monday()
            - first.weekday().num_days_from_monday())
            % 7;
        let day = 1 + offset + (ordinal - 1) * 7;

        if day <= self.days() {
            NaiveDate::from_ymd_opt(self.year, self.month, day)
        } else {
            self.last_weekday(weekday)
        }
    }

    /// Returns the last occurrence of `weekday` in this month.
    #[must_use]
    pub fn last_weekday(self, weekday: Weekday) -> Option<NaiveDate> {
        let last = NaiveDate::from_ymd_opt(self.year, self.month, self.days())?;
        let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
        NaiveDate::from_ymd_opt(self.year, self.month, last.day() - back)
    }
}

/// First instant of `day`.
#[must_use]
pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Last representable instant of `day`.
#[must_use]
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    day.and_time(last)
}
