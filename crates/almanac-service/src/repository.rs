//! Persistence seam for template events.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use almanac_recur::TemplateEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// A stored event: descriptive fields plus the template it expands from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(flatten)]
    pub template: TemplateEvent,
}

/// An event as submitted by a caller, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(flatten)]
    pub template: TemplateEvent,
}

impl NewEvent {
    #[must_use]
    pub fn new(title: impl Into<String>, template: TemplateEvent) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            location: String::new(),
            template,
        }
    }

    /// ## Summary
    /// Checks the fields every stored event must carry.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` for a blank title and the
    /// template's own error for an invalid span or rule.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.title.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "title must not be empty".to_string(),
            ));
        }
        self.template.validate()?;
        Ok(())
    }

    fn into_record(self, id: Uuid) -> EventRecord {
        EventRecord {
            id,
            title: self.title,
            description: self.description,
            location: self.location,
            template: self.template,
        }
    }
}

/// ## Summary
/// Storage for template events.
///
/// Implementations must validate on write so that everything they return can
/// be expanded.
pub trait EventRepository: Send + Sync {
    /// ## Errors
    /// Returns an error if the backing store cannot be read.
    fn list(&self) -> ServiceResult<Vec<EventRecord>>;

    /// ## Errors
    /// Returns `ServiceError::NotFound` for an unknown id.
    fn get(&self, id: Uuid) -> ServiceResult<EventRecord>;

    /// ## Errors
    /// Returns a validation error for an incomplete or invalid event.
    fn insert(&self, event: NewEvent) -> ServiceResult<EventRecord>;

    /// ## Errors
    /// Returns `ServiceError::NotFound` for an unknown id, or a validation
    /// error for an incomplete or invalid event.
    fn update(&self, id: Uuid, event: NewEvent) -> ServiceResult<EventRecord>;

    /// ## Errors
    /// Returns `ServiceError::NotFound` for an unknown id.
    fn delete(&self, id: Uuid) -> ServiceResult<()>;
}

fn lock_poisoned<G>(err: PoisonError<G>) -> ServiceError {
    tracing::error!(error = %err, "Event store lock poisoned");
    ServiceError::InvariantViolation("event store lock poisoned")
}

/// In-process repository keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<BTreeMap<Uuid, EventRecord>>,
}

impl InMemoryEventRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventRepository for InMemoryEventRepository {
    fn list(&self) -> ServiceResult<Vec<EventRecord>> {
        let events = self.events.read().map_err(lock_poisoned)?;
        Ok(events.values().cloned().collect())
    }

    fn get(&self, id: Uuid) -> ServiceResult<EventRecord> {
        let events = self.events.read().map_err(lock_poisoned)?;
        events.get(&id).cloned().ok_or(ServiceError::NotFound(id))
    }

    #[tracing::instrument(skip_all, fields(title = %event.title))]
    fn insert(&self, event: NewEvent) -> ServiceResult<EventRecord> {
        event.validate()?;

        let record = event.into_record(Uuid::now_v7());
        let mut events = self.events.write().map_err(lock_poisoned)?;
        events.insert(record.id, record.clone());

        tracing::debug!(id = %record.id, "Event stored");
        Ok(record)
    }

    #[tracing::instrument(skip(self, event), fields(title = %event.title))]
    fn update(&self, id: Uuid, event: NewEvent) -> ServiceResult<EventRecord> {
        event.validate()?;

        let mut events = self.events.write().map_err(lock_poisoned)?;
        let Some(slot) = events.get_mut(&id) else {
            return Err(ServiceError::NotFound(id));
        };
        *slot = event.into_record(id);

        tracing::debug!("Event updated");
        Ok(slot.clone())
    }

    #[tracing::instrument(skip(self))]
    fn delete(&self, id: Uuid) -> ServiceResult<()> {
        let mut events = self.events.write().map_err(lock_poisoned)?;
        if events.remove(&id).is_none() {
            return Err(ServiceError::NotFound(id));
        }

        tracing::debug!("Event deleted");
        Ok(())
    }
}
