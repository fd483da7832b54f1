//! Recurrence expansion for calendar template events.
//!
//! A template event carries a start/end pair and a recurrence rule; the
//! expander turns it into the concrete, non-overlapping occurrences that fall
//! before a termination condition or the lookahead horizon.

pub mod error;
pub mod recur;

pub use recur::{
    CustomSpec, CustomUnit, ExpansionOptions, Frequency, NthWeek, Occurrence, RecurrenceRule,
    TemplateEvent, Termination, WeekOfMonth, expand, expand_with,
};
