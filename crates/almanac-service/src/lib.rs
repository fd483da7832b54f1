//! Event storage seam and agenda views built on recurrence expansion.

pub mod calendar;
pub mod error;
pub mod repository;

pub use calendar::{AgendaEntry, CalendarService, ExpandedEvent};
pub use repository::{EventRecord, EventRepository, InMemoryEventRepository, NewEvent};
