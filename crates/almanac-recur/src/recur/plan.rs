//! Step rules compiled from a frequency, and the cursor they advance.

use chrono::{Datelike, Days, NaiveDateTime, Weekday};

use super::calendar::YearMonth;
use super::rule::{CustomUnit, Frequency, WeekOfMonth};
use crate::error::RecurResult;

/// ## Summary
/// Position of an expansion: the next candidate start and how many steps
/// separate it from the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub start: NaiveDateTime,
    pub cycle_index: u32,
    /// Selected day of month the cursor was resolved from, before clamping.
    /// Only custom monthly rules read it.
    slot: u32,
}

impl Cursor {
    /// Cursor sitting on the template itself.
    pub(crate) fn at(start: NaiveDateTime) -> Self {
        Self {
            start,
            cycle_index: 0,
            slot: start.day(),
        }
    }
}

/// ## Summary
/// How to get from one candidate start to the next.
///
/// Compiled once per expansion from the template's frequency and anchor, so
/// the custom selector sets are already validated, anchored and sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StepPlan {
    /// Non-recurring.
    Once,
    /// Fixed number of days.
    Days(u32),
    /// Next Monday-to-Friday day.
    WorkingDays,
    /// Same day of month `months` later, clamped to short months.
    Months { months: u32, day: u32 },
    /// Same week-of-month position `months` later.
    NthWeekday {
        months: u32,
        week_of_month: WeekOfMonth,
    },
    /// Next selected weekday (0 = Monday), skipping `interval - 1` weeks on wrap.
    Weekdays { days: Vec<u32>, interval: u32 },
    /// Next selected day of month, `interval` months ahead on wrap.
    MonthDays { days: Vec<u32>, interval: u32 },
    /// Next selected month (0 = January), `interval` years ahead on wrap.
    YearMonths {
        months: Vec<u32>,
        interval: u32,
        day: u32,
    },
}

impl StepPlan {
    /// ## Summary
    /// Compiles `frequency` against the template's start.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidRule` if a custom spec fails validation.
    pub(crate) fn compile(frequency: &Frequency, anchor: NaiveDateTime) -> RecurResult<Self> {
        let date = anchor.date();
        let plan = match frequency {
            Frequency::None => Self::Once,
            Frequency::Daily => Self::Days(1),
            Frequency::DailyFerial => Self::WorkingDays,
            Frequency::Weekly => Self::Days(7),
            Frequency::Monthly => Self::Months {
                months: 1,
                day: date.day(),
            },
            Frequency::Yearly => Self::Months {
                months: 12,
                day: date.day(),
            },
            Frequency::MonthlyByWeekday => Self::NthWeekday {
                months: 1,
                week_of_month: WeekOfMonth::of(date),
            },
            Frequency::Custom(spec) => {
                spec.validate()?;
                let spec = spec.anchored(date);
                let interval = spec.interval;
                match spec.unit {
                    CustomUnit::Daily => Self::Days(interval),
                    CustomUnit::Weekly => Self::Weekdays {
                        days: spec.days_of_week.iter().copied().map(u32::from).collect(),
                        interval,
                    },
                    CustomUnit::Monthly => Self::MonthDays {
                        days: spec.days_of_month.into_iter().collect(),
                        interval,
                    },
                    CustomUnit::MonthlyByWeekday => Self::NthWeekday {
                        months: interval,
                        week_of_month: spec
                            .week_of_month
                            .unwrap_or_else(|| WeekOfMonth::of(date)),
                    },
                    CustomUnit::Yearly => Self::YearMonths {
                        months: spec.months_of_year.into_iter().collect(),
                        interval,
                        day: date.day(),
                    },
                }
            }
        };
        Ok(plan)
    }

    /// ## Summary
    /// Returns the cursor for the next candidate.
    ///
    /// Returns `None` for non-recurring plans and when the next date falls
    /// outside chrono's representable range.
    pub(crate) fn advance(&self, cursor: &Cursor) -> Option<Cursor> {
        let date = cursor.start.date();
        let mut slot = cursor.slot;

        let next = match self {
            Self::Once => return None,
            Self::Days(days) => date.checked_add_days(Days::new(u64::from(*days)))?,
            Self::WorkingDays => {
                let mut next = date.succ_opt()?;
                while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
                    next = next.succ_opt()?;
                }
                next
            }
            Self::Months { months, day } => {
                YearMonth::of(date).checked_add(*months)?.clamped_date(*day)?
            }
            Self::NthWeekday {
                months,
                week_of_month,
            } => YearMonth::of(date)
                .checked_add(*months)?
                .nth_weekday(week_of_month.nth, week_of_month.weekday)?,
            Self::Weekdays { days, interval } => {
                let current = date.weekday().num_days_from_monday();
                let step = if let Some(next) = days.iter().find(|day| **day > current) {
                    u64::from(next - current)
                } else {
                    let first = *days.first()?;
                    u64::from(7 - current + first) + 7 * u64::from(interval - 1)
                };
                date.checked_add_days(Days::new(step))?
            }
            Self::MonthDays { days, interval } => {
                let month = YearMonth::of(date);
                // A selected day that clamps onto the day already produced
                // belongs to the next period, not a duplicate of this one.
                let later = days
                    .iter()
                    .copied()
                    .find(|day| *day > cursor.slot && month.clamp_day(*day) > date.day());
                if let Some(day) = later {
                    slot = day;
                    month.clamped_date(day)?
                } else {
                    let first = *days.first()?;
                    slot = first;
                    month.checked_add(*interval)?.clamped_date(first)?
                }
            }
            Self::YearMonths {
                months,
                interval,
                day,
            } => {
                let current = date.month0();
                let target = if let Some(month) = months.iter().find(|month| **month > current) {
                    YearMonth::new(date.year(), month + 1)?
                } else {
                    let first = *months.first()?;
                    let year = date.year().checked_add(i32::try_from(*interval).ok()?)?;
                    YearMonth::new(year, first + 1)?
                };
                target.clamped_date(*day)?
            }
        };

        Some(Cursor {
            start: next.and_time(cursor.start.time()),
            cycle_index: cursor.cycle_index.checked_add(1)?,
            slot,
        })
    }
}
