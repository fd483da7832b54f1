//! Expansion of a template event into its occurrences.
//!
//! The loop is a small state machine: a `Cursor` proposes a candidate start,
//! the termination rule turns the candidate into a `Verdict`, accepted
//! candidates go through `emit_or_merge`, and the `StepPlan` moves the
//! cursor on.

use almanac_core::config::ExpansionConfig;
use almanac_core::constants::DEFAULT_LOOKAHEAD_YEARS;
use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta};

use super::calendar::start_of_day;
use super::event::{Occurrence, TemplateEvent};
use super::plan::{Cursor, StepPlan};
use super::rule::{Frequency, Termination};
use crate::error::RecurResult;

/// ## Summary
/// Policy knobs for an expansion.
///
/// The lookahead horizon is what keeps an open-ended recurrence finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionOptions {
    pub lookahead_years: u32,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            lookahead_years: DEFAULT_LOOKAHEAD_YEARS,
        }
    }
}

impl From<&ExpansionConfig> for ExpansionOptions {
    fn from(config: &ExpansionConfig) -> Self {
        Self {
            lookahead_years: config.lookahead_years,
        }
    }
}

impl ExpansionOptions {
    /// Sets the lookahead.
    #[must_use]
    pub fn with_lookahead_years(mut self, years: u32) -> Self {
        self.lookahead_years = years;
        self
    }

    /// ## Summary
    /// Latest candidate start a recurrence may reach from `reference`.
    #[must_use]
    pub fn horizon(&self, reference: NaiveDateTime) -> NaiveDateTime {
        reference
            .checked_add_months(Months::new(self.lookahead_years.saturating_mul(12)))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// What the termination rule makes of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// Keep it and keep going.
    Emit(Occurrence),
    /// Keep it, then stop.
    EmitLast(Occurrence),
    /// Drop it and stop.
    Stop,
}

/// The termination rule and lookahead horizon of one expansion.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    termination: Termination,
    horizon: NaiveDateTime,
    /// First instant after an `UntilDate` day.
    until: Option<NaiveDateTime>,
}

impl Bounds {
    fn new(termination: Termination, horizon: NaiveDateTime) -> Self {
        let until = match termination {
            Termination::UntilDate(day) => Some(until_limit(day)),
            Termination::Never | Termination::AfterCount(_) => None,
        };
        Self {
            termination,
            horizon,
            until,
        }
    }

    fn judge(&self, candidate: Occurrence) -> Verdict {
        // the template's own occurrence is not a recurrence, so the horizon
        // never removes it
        if candidate.cycle_index > 0 && candidate.start > self.horizon {
            return Verdict::Stop;
        }

        if let Some(limit) = self.until {
            if candidate.start >= limit {
                return Verdict::Stop;
            }
            if candidate.end > limit {
                return Verdict::EmitLast(Occurrence {
                    end: limit,
                    ..candidate
                });
            }
        }

        match self.termination {
            Termination::AfterCount(count) if candidate.cycle_index.saturating_add(1) >= count => {
                Verdict::EmitLast(candidate)
            }
            _ => Verdict::Emit(candidate),
        }
    }
}

/// `UntilDate` covers the whole day, so the limit is the following midnight.
fn until_limit(day: NaiveDate) -> NaiveDateTime {
    day.succ_opt().map_or(NaiveDateTime::MAX, start_of_day)
}

/// ## Summary
/// Appends `occurrence`, or folds it into the previous entry when it starts
/// at or before that entry's end. An empty occurrence that does not touch the
/// previous entry is dropped.
///
/// Keeps the output free of overlapping, touching and empty occurrences, and
/// never stretches an occurrence over time it did not cover.
fn emit_or_merge(occurrences: &mut Vec<Occurrence>, occurrence: Occurrence) {
    if let Some(previous) = occurrences.last_mut()
        && occurrence.start <= previous.end
    {
        tracing::trace!(
            cycle_index = occurrence.cycle_index,
            into_cycle = previous.cycle_index,
            "Merging occurrence into previous"
        );
        previous.end = previous.end.max(occurrence.end);
        return;
    }
    if occurrence.end <= occurrence.start {
        tracing::trace!(cycle_index = occurrence.cycle_index, "Dropping empty occurrence");
        return;
    }
    occurrences.push(occurrence);
}

/// ## Summary
/// Expands `template` with the default 10-year lookahead.
///
/// ## Errors
/// Returns `RecurError::InvalidRange` if the template's end is not after its
/// start, and `RecurError::InvalidRule` for a malformed custom rule.
pub fn expand(template: &TemplateEvent, reference: NaiveDateTime) -> RecurResult<Vec<Occurrence>> {
    expand_with(template, reference, &ExpansionOptions::default())
}

/// ## Summary
/// Expands `template` into its ordered occurrences.
///
/// `reference` only bounds the recurrence: candidates starting more than
/// `options.lookahead_years` after it are not produced. Every occurrence keeps
/// the template's duration, except a last one truncated by an `UntilDate`.
/// Occurrences that would overlap or touch are merged into one.
///
/// ## Errors
/// Returns `RecurError::InvalidRange` if the template's end is not after its
/// start, and `RecurError::InvalidRule` for a malformed rule.
///
/// ## Side Effects
/// None - pure function.
pub fn expand_with(
    template: &TemplateEvent,
    reference: NaiveDateTime,
    options: &ExpansionOptions,
) -> RecurResult<Vec<Occurrence>> {
    let (start, end) = template.span()?;

    // all-day templates come back widened to whole days
    if template.rule.frequency == Frequency::None {
        return Ok(vec![Occurrence {
            start,
            end,
            cycle_index: 0,
        }]);
    }

    template.rule.validate()?;
    let plan = StepPlan::compile(&template.rule.frequency, start)?;
    let bounds = Bounds::new(template.rule.termination, options.horizon(reference));
    let duration: TimeDelta = end - start;

    tracing::trace!(
        start = %start,
        end = %end,
        horizon = %bounds.horizon,
        "Expanding template"
    );

    let mut occurrences = Vec::new();
    let mut cursor = Cursor::at(start);

    loop {
        let Some(candidate_end) = cursor.start.checked_add_signed(duration) else {
            tracing::trace!(start = %cursor.start, "Candidate end past calendar range");
            break;
        };
        let candidate = Occurrence {
            start: cursor.start,
            end: candidate_end,
            cycle_index: cursor.cycle_index,
        };

        match bounds.judge(candidate) {
            Verdict::Emit(occurrence) => emit_or_merge(&mut occurrences, occurrence),
            Verdict::EmitLast(occurrence) => {
                emit_or_merge(&mut occurrences, occurrence);
                break;
            }
            Verdict::Stop => break,
        }

        let Some(next) = plan.advance(&cursor) else {
            tracing::trace!(start = %cursor.start, "Recurrence cannot advance further");
            break;
        };
        if next.start <= cursor.start {
            tracing::error!(
                from = %cursor.start,
                to = %next.start,
                "Recurrence cursor failed to move forward"
            );
            break;
        }
        cursor = next;
    }

    tracing::debug!(
        count = occurrences.len(),
        cycles = cursor.cycle_index.saturating_add(1),
        "Expanded template"
    );

    Ok(occurrences)
}
