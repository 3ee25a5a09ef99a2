//! Persistence collaborator interfaces.
//!
//! The core consumes and produces only in-memory values; these traits
//! are the seam to whatever actually stores companies and events. The
//! contract the core relies on: the event log is append-only, events
//! for a company may be returned in any order, and serializing
//! concurrent appends per company is the store's job, not the core's.

mod memory;

pub use memory::InMemoryStore;

use crate::core::{Event, EventData, EventType, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type CompanyId = Uuid;
pub type UserId = Uuid;

/// Subject of an event history.
///
/// `current_stage` is a cached projection of the log, refreshed by the
/// service layer; it must always be re-derivable from the events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub current_stage: Option<Stage>,
    pub stage_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage failure reported by a collaborator.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StoreError {
    #[error("unknown company {0}")]
    UnknownCompany(CompanyId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Company lookup and creation.
pub trait CompanyStore {
    fn create_company(&mut self, name: &str) -> Result<Company, StoreError>;

    fn find_company(&self, id: CompanyId) -> Result<Option<Company>, StoreError>;

    fn list_companies(&self) -> Result<Vec<Company>, StoreError>;
}

/// Supplies the full event history of a company, in arbitrary order.
pub trait EventLog {
    fn events_for(&self, company_id: CompanyId) -> Result<Vec<Event>, StoreError>;
}

/// Accepts new events; assigns id and timestamp. Never updates or
/// deletes.
pub trait EventSink {
    fn append(
        &mut self,
        company_id: CompanyId,
        event_type: EventType,
        data: Option<EventData>,
        created_by: Option<UserId>,
    ) -> Result<Event, StoreError>;
}

/// Persists the latest derived stage projection.
pub trait StageCache {
    fn write_stage(&mut self, company_id: CompanyId, stage: Stage) -> Result<(), StoreError>;
}
