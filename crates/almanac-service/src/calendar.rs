//! Expansion of stored events and the per-day agenda.

use almanac_core::config::Settings;
use almanac_recur::recur::end_of_day;
use almanac_recur::{ExpansionOptions, Occurrence, expand_with};
use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::repository::{EventRecord, EventRepository};

/// A stored event together with its occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedEvent {
    pub event: EventRecord,
    pub occurrences: Vec<Occurrence>,
}

/// ## Summary
/// One line of a day's agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaEntry {
    pub event_id: Uuid,
    pub title: String,
    pub location: String,
    pub all_day: bool,
    pub occurrence: Occurrence,
    /// Human-readable recurrence rule, e.g. "every 2 weeks on: mon, wed".
    pub summary: String,
}

/// ## Summary
/// Expands the events held by a repository.
#[derive(Debug)]
pub struct CalendarService<R> {
    repository: R,
    options: ExpansionOptions,
}

impl<R: EventRepository> CalendarService<R> {
    #[must_use]
    pub fn new(repository: R, options: ExpansionOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    /// ## Summary
    /// Builds a service whose expansion policy comes from `settings`.
    ///
    /// ## Errors
    /// Returns `ServiceError::CoreError` if the settings fail validation.
    pub fn from_settings(repository: R, settings: &Settings) -> ServiceResult<Self> {
        settings.validate()?;
        Ok(Self::new(repository, ExpansionOptions::from(&settings.expansion)))
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// ## Summary
    /// Expands a single stored event.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` for an unknown id and the expansion
    /// error if the stored template is invalid.
    pub fn expand_event(&self, id: Uuid, reference: NaiveDateTime) -> ServiceResult<ExpandedEvent> {
        let event = self.repository.get(id)?;
        let occurrences = expand_with(&event.template, reference, &self.options)?;
        Ok(ExpandedEvent { event, occurrences })
    }

    /// ## Summary
    /// Expands every stored event in parallel.
    ///
    /// An event whose template fails to expand is logged and left out; the
    /// rest are still returned, in repository order.
    ///
    /// ## Errors
    /// Returns an error only if the repository cannot be listed.
    pub fn expand_all(&self, reference: NaiveDateTime) -> ServiceResult<Vec<ExpandedEvent>> {
        let events = self.repository.list()?;
        let total = events.len();

        let expanded: Vec<ExpandedEvent> = events
            .into_par_iter()
            .filter_map(|event| {
                match expand_with(&event.template, reference, &self.options) {
                    Ok(occurrences) => Some(ExpandedEvent { event, occurrences }),
                    Err(e) => {
                        tracing::warn!(id = %event.id, title = %event.title, "Skipping event: {e}");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(total, expanded = expanded.len(), "Expanded events");
        Ok(expanded)
    }

    /// ## Summary
    /// Lists every occurrence that intersects `day`, sorted by start then title.
    ///
    /// An occurrence spanning several days appears on each of them.
    ///
    /// ## Errors
    /// Returns an error only if the repository cannot be listed.
    pub fn agenda_for_day(
        &self,
        day: NaiveDate,
        reference: NaiveDateTime,
    ) -> ServiceResult<Vec<AgendaEntry>> {
        let last_instant = end_of_day(day);

        let mut entries: Vec<AgendaEntry> = self
            .expand_all(reference)?
            .into_iter()
            .flat_map(|expanded| {
                let ExpandedEvent { event, occurrences } = expanded;
                let summary = event.template.summary();
                occurrences
                    .into_iter()
                    .take_while(move |occurrence| occurrence.start <= last_instant)
                    .filter(|occurrence| occurrence.overlaps_day(day))
                    .map(move |occurrence| AgendaEntry {
                        event_id: event.id,
                        title: event.title.clone(),
                        location: event.location.clone(),
                        all_day: event.template.all_day,
                        occurrence,
                        summary: summary.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        entries.sort_by(|a, b| {
            a.occurrence
                .start
                .cmp(&b.occurrence.start)
                .then_with(|| a.title.cmp(&b.title))
        });

        tracing::debug!(%day, count = entries.len(), "Built agenda");
        Ok(entries)
    }
}
