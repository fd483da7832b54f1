//! Template events, recurrence rules and their expansion into occurrences.

mod calendar;
mod describe;
mod event;
mod expand;
mod plan;
mod rule;

pub use calendar::{YearMonth, end_of_day, start_of_day};
pub use event::{Occurrence, TemplateEvent};
pub use expand::{ExpansionOptions, expand, expand_with};
pub use rule::{
    CustomSpec, CustomUnit, Frequency, NthWeek, RecurrenceRule, Termination, WeekOfMonth,
};
