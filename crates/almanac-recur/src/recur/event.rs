use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::calendar::{end_of_day, start_of_day};
use super::plan::StepPlan;
use super::rule::{Frequency, RecurrenceRule};
use crate::error::{RecurError, RecurResult};

/// ## Summary
/// The canonical, non-expanded definition of a possibly recurring event.
///
/// Instants are wall-clock times; all-day templates are widened to whole days
/// when their span is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub rule: RecurrenceRule,
}

impl TemplateEvent {
    /// Creates a timed template with the given rule.
    #[must_use]
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, rule: RecurrenceRule) -> Self {
        Self {
            start,
            end,
            all_day: false,
            rule,
        }
    }

    /// Creates an all-day template covering `first` through `last` inclusive.
    #[must_use]
    pub fn new_all_day(first: NaiveDate, last: NaiveDate, rule: RecurrenceRule) -> Self {
        Self {
            start: start_of_day(first),
            end: start_of_day(last),
            all_day: true,
            rule,
        }
    }

    /// ## Summary
    /// Returns the normalized `(start, end)` pair of the template itself.
    ///
    /// All-day templates run from the first instant of their start date to the
    /// last instant of their end date.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidRange` if the span is empty or negative.
    pub fn span(&self) -> RecurResult<(NaiveDateTime, NaiveDateTime)> {
        let (start, end) = if self.all_day {
            (start_of_day(self.start.date()), end_of_day(self.end.date()))
        } else {
            (self.start, self.end)
        };

        if end <= start {
            return Err(RecurError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok((start, end))
    }

    /// ## Summary
    /// Describes the rule as it applies to this template, with the start
    /// date's own weekday, day or month included in custom selections.
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.rule.frequency {
            Frequency::Custom(spec) => RecurrenceRule {
                frequency: Frequency::Custom(spec.anchored(self.start.date())),
                termination: self.rule.termination,
            }
            .to_string(),
            _ => self.rule.to_string(),
        }
    }

    /// ## Summary
    /// Checks the span and the recurrence rule without expanding.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidRange` for a non-positive span and
    /// `RecurError::InvalidRule` for a malformed rule.
    pub fn validate(&self) -> RecurResult<()> {
        let (start, _) = self.span()?;
        StepPlan::compile(&self.rule.frequency, start)?;
        self.rule.validate()
    }
}

/// ## Summary
/// One concrete instance of a template.
///
/// `cycle_index` counts recurrence steps from the template's own start,
/// which is cycle 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub cycle_index: u32,
}

impl Occurrence {
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// ## Summary
    /// Whether this occurrence should be listed on `day`.
    ///
    /// An occurrence ending exactly at midnight is listed on both days it touches.
    #[must_use]
    pub fn overlaps_day(&self, day: NaiveDate) -> bool {
        self.start <= end_of_day(day) && self.end >= start_of_day(day)
    }
}
