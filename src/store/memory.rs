//! In-memory store, the reference implementation of the collaborator
//! traits. Backs the test suite and small deployments; a database
//! implementation would satisfy the same traits.

use super::{Company, CompanyId, CompanyStore, EventLog, EventSink, StageCache, StoreError, UserId};
use crate::core::{Clock, Event, EventData, EventType, Stage, SystemClock};
use std::collections::HashMap;
use uuid::Uuid;

/// HashMap-backed store with an injected clock for assigned
/// timestamps.
#[derive(Clone, Debug)]
pub struct InMemoryStore<C: Clock = SystemClock> {
    companies: HashMap<CompanyId, Company>,
    events: HashMap<CompanyId, Vec<Event>>,
    clock: C,
}

impl InMemoryStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            companies: HashMap::new(),
            events: HashMap::new(),
            clock,
        }
    }

    /// Insert a pre-built event, bypassing id/timestamp assignment.
    ///
    /// Intended for seeding histories with backdated events in tests.
    pub fn insert_event(&mut self, event: Event) {
        self.events.entry(event.company_id).or_default().push(event);
    }
}

impl<C: Clock> CompanyStore for InMemoryStore<C> {
    fn create_company(&mut self, name: &str) -> Result<Company, StoreError> {
        let now = self.clock.now();
        let company = Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            current_stage: None,
            stage_updated_at: None,
            created_at: now,
            updated_at: now,
        };
        self.companies.insert(company.id, company.clone());
        Ok(company)
    }

    fn find_company(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        Ok(self.companies.get(&id).cloned())
    }

    fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        let mut companies: Vec<Company> = self.companies.values().cloned().collect();
        companies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(companies)
    }
}

impl<C: Clock> EventLog for InMemoryStore<C> {
    fn events_for(&self, company_id: CompanyId) -> Result<Vec<Event>, StoreError> {
        Ok(self.events.get(&company_id).cloned().unwrap_or_default())
    }
}

impl<C: Clock> EventSink for InMemoryStore<C> {
    fn append(
        &mut self,
        company_id: CompanyId,
        event_type: EventType,
        data: Option<EventData>,
        created_by: Option<UserId>,
    ) -> Result<Event, StoreError> {
        if !self.companies.contains_key(&company_id) {
            return Err(StoreError::UnknownCompany(company_id));
        }

        let event = Event {
            id: Uuid::new_v4(),
            company_id,
            event_type,
            data,
            created_at: self.clock.now(),
            created_by,
        };
        self.events.entry(company_id).or_default().push(event.clone());
        Ok(event)
    }
}

impl<C: Clock> StageCache for InMemoryStore<C> {
    fn write_stage(&mut self, company_id: CompanyId, stage: Stage) -> Result<(), StoreError> {
        let company = self
            .companies
            .get_mut(&company_id)
            .ok_or(StoreError::UnknownCompany(company_id))?;

        let now = self.clock.now();
        company.current_stage = Some(stage);
        company.stage_updated_at = Some(now);
        company.updated_at = now;
        Ok(())
    }
}
