//! Recurrence rule types.
//!
//! Frequencies are a tagged union: the `Custom` variant carries its selector
//! sets, everything else is fully described by the template's own start.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{RecurError, RecurResult};

/// Which occurrence of a weekday within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NthWeek {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Last,
}

impl NthWeek {
    /// ## Summary
    /// Returns the week of the month containing `day` (days 1-7 are the first week).
    #[must_use]
    pub const fn containing(day: u32) -> Self {
        match day.saturating_sub(1) / 7 {
            0 => Self::First,
            1 => Self::Second,
            2 => Self::Third,
            3 => Self::Fourth,
            _ => Self::Fifth,
        }
    }

    /// One-based position, or `None` for `Last`.
    #[must_use]
    pub const fn ordinal(self) -> Option<u32> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Fifth => Some(5),
            Self::Last => None,
        }
    }
}

/// A weekday anchored to a week of the month, e.g. "3rd Thursday".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekOfMonth {
    pub nth: NthWeek,
    pub weekday: Weekday,
}

impl WeekOfMonth {
    /// ## Summary
    /// Returns the week-of-month position `date` itself occupies.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            nth: NthWeek::containing(date.day()),
            weekday: date.weekday(),
        }
    }
}

/// Base unit of a custom recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomUnit {
    Daily,
    Weekly,
    Monthly,
    MonthlyByWeekday,
    Yearly,
}

const fn default_interval() -> u32 {
    1
}

/// ## Summary
/// Selectors for a custom recurrence.
///
/// `days_of_week` holds weekday indices (0 = Monday .. 6 = Sunday),
/// `days_of_month` holds days 1..=31 and `months_of_year` holds month
/// indices 0..=11. Only the set matching `unit` is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSpec {
    pub unit: CustomUnit,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub days_of_week: BTreeSet<u8>,
    #[serde(default)]
    pub days_of_month: BTreeSet<u32>,
    #[serde(default)]
    pub week_of_month: Option<WeekOfMonth>,
    #[serde(default)]
    pub months_of_year: BTreeSet<u32>,
}

impl CustomSpec {
    /// Creates a spec with an interval of 1 and no selectors.
    #[must_use]
    pub fn new(unit: CustomUnit) -> Self {
        Self {
            unit,
            interval: default_interval(),
            days_of_week: BTreeSet::new(),
            days_of_month: BTreeSet::new(),
            week_of_month: None,
            months_of_year: BTreeSet::new(),
        }
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Adds weekday indices (0 = Monday).
    #[must_use]
    pub fn with_days_of_week(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.days_of_week.extend(days);
        self
    }

    /// Adds days of the month.
    #[must_use]
    pub fn with_days_of_month(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.days_of_month.extend(days);
        self
    }

    /// Sets the week-of-month position.
    #[must_use]
    pub fn with_week_of_month(mut self, week_of_month: WeekOfMonth) -> Self {
        self.week_of_month = Some(week_of_month);
        self
    }

    /// Adds month indices (0 = January).
    #[must_use]
    pub fn with_months_of_year(mut self, months: impl IntoIterator<Item = u32>) -> Self {
        self.months_of_year.extend(months);
        self
    }

    /// ## Summary
    /// Checks the interval and the selector set required by `unit`.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidRule` if the interval is zero, or the set
    /// `unit` depends on is empty or holds an out-of-range value.
    pub fn validate(&self) -> RecurResult<()> {
        if self.interval == 0 {
            return Err(RecurError::InvalidRule(
                "custom interval must be at least 1".to_string(),
            ));
        }

        match self.unit {
            CustomUnit::Daily | CustomUnit::MonthlyByWeekday => Ok(()),
            CustomUnit::Weekly => require_selectors("days_of_week", &self.days_of_week, 0..=6),
            CustomUnit::Monthly => {
                require_selectors("days_of_month", &self.days_of_month, 1..=31)
            }
            CustomUnit::Yearly => {
                require_selectors("months_of_year", &self.months_of_year, 0..=11)
            }
        }
    }

    /// ## Summary
    /// Returns a copy with the anchor's weekday, day of month and month added
    /// to the selector sets, and the week-of-month filled in when absent.
    ///
    /// The anchor can never be deselected: whatever the caller supplied, the
    /// template's own date always matches its rule.
    #[must_use]
    pub fn anchored(&self, anchor: NaiveDate) -> Self {
        let mut spec = self.clone();
        // weekday indices are below 7
        #[expect(clippy::cast_possible_truncation)]
        spec.days_of_week.insert(anchor.weekday().num_days_from_monday() as u8);
        spec.days_of_month.insert(anchor.day());
        spec.months_of_year.insert(anchor.month0());
        spec.week_of_month.get_or_insert_with(|| WeekOfMonth::of(anchor));
        spec
    }
}

fn require_selectors<T>(
    name: &str,
    selected: &BTreeSet<T>,
    range: std::ops::RangeInclusive<T>,
) -> RecurResult<()>
where
    T: Ord + Copy + std::fmt::Display,
{
    if selected.is_empty() {
        return Err(RecurError::InvalidRule(format!(
            "{name} must select at least one value"
        )));
    }
    if let Some(value) = selected.iter().find(|value| !range.contains(*value)) {
        return Err(RecurError::InvalidRule(format!(
            "{name} value {value} is outside {}..={}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

/// How often a template repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    None,
    Daily,
    /// Every working day, Monday through Friday.
    DailyFerial,
    Weekly,
    Monthly,
    MonthlyByWeekday,
    Yearly,
    Custom(CustomSpec),
}

/// When a recurrence stops producing occurrences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Termination {
    #[default]
    Never,
    /// Inclusive of the whole day.
    UntilDate(NaiveDate),
    AfterCount(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub termination: Termination,
}

impl RecurrenceRule {
    /// Creates a rule that repeats forever.
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            termination: Termination::Never,
        }
    }

    /// Stops after the given day.
    #[must_use]
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.termination = Termination::UntilDate(date);
        self
    }

    /// Stops after `count` recurrence steps.
    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.termination = Termination::AfterCount(count);
        self
    }

    /// ## Summary
    /// Validates the frequency payload and the termination.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidRule` for a malformed custom spec or a
    /// count of zero.
    pub fn validate(&self) -> RecurResult<()> {
        if let Frequency::Custom(spec) = &self.frequency {
            spec.validate()?;
        }
        if self.termination == Termination::AfterCount(0) {
            return Err(RecurError::InvalidRule(
                "occurrence count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
