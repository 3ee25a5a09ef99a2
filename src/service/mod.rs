//! Orchestration over the pure core and a store.
//!
//! The service wires calculator, guard, and resolver to a persistence
//! collaborator: read the history, validate, append, recompute, cache.
//! It performs no locking; serializing concurrent appends per company
//! is the store's responsibility.

use crate::core::{
    ActionResolver, AvailableAction, Clock, Event, EventData, EventGuard, EventType, GuardError,
    Stage, StageCalculator, SystemClock,
};
use crate::store::{
    Company, CompanyId, CompanyStore, EventLog, EventSink, StageCache, StoreError, UserId,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a service operation failed. All recoverable by the caller.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ServiceError {
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),

    #[error(transparent)]
    Rejected(#[from] GuardError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A company together with everything a caller needs to render it:
/// derived stage, full history, and the permitted next moves.
#[derive(Clone, Debug, Serialize)]
pub struct CompanyOverview {
    pub company: Company,
    pub stage: Stage,
    pub events: Vec<Event>,
    pub available_actions: Vec<AvailableAction>,
    pub next_action: Option<AvailableAction>,
}

/// Listing row: company plus derived stage and history size.
#[derive(Clone, Debug, Serialize)]
pub struct CompanySummary {
    pub company: Company,
    pub stage: Stage,
    pub event_count: usize,
}

/// Application service for pipeline operations.
///
/// Generic over the store `S` (any type satisfying all four
/// collaborator traits) and the clock `C` shared by every
/// time-dependent component.
pub struct PipelineService<S, C: Clock = SystemClock> {
    store: S,
    calculator: StageCalculator<C>,
    guard: EventGuard<C>,
    resolver: ActionResolver<C>,
}

impl<S> PipelineService<S, SystemClock>
where
    S: CompanyStore + EventLog + EventSink + StageCache,
{
    /// Service over `store`, reading the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S, C> PipelineService<S, C>
where
    S: CompanyStore + EventLog + EventSink + StageCache,
    C: Clock,
{
    /// Service with an injected time source.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            calculator: StageCalculator::with_clock(clock.clone()),
            guard: EventGuard::with_clock(clock.clone()),
            resolver: ActionResolver::with_clock(clock),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new company at the bottom of the pipeline.
    pub fn create_company(&mut self, name: &str) -> Result<Company, ServiceError> {
        let company = self.store.create_company(name)?;
        info!(company_id = %company.id, name, "company created");
        Ok(company)
    }

    /// Company with derived stage, history, and permitted actions.
    ///
    /// Refreshes the cached stage when it drifted from the derivation —
    /// stages can regress through demo expiry with no new event.
    pub fn company_overview(&mut self, company_id: CompanyId) -> Result<CompanyOverview, ServiceError> {
        let mut company = self
            .store
            .find_company(company_id)?
            .ok_or(ServiceError::CompanyNotFound(company_id))?;

        let events = self.store.events_for(company_id)?;
        let stage = self.calculator.calculate(&events);

        if company.current_stage != Some(stage) {
            debug!(%company_id, cached = ?company.current_stage, derived = %stage, "refreshing stage cache");
            self.store.write_stage(company_id, stage)?;
            company = self
                .store
                .find_company(company_id)?
                .ok_or(ServiceError::CompanyNotFound(company_id))?;
        }

        Ok(CompanyOverview {
            available_actions: self.resolver.available_actions(&events),
            next_action: self.resolver.next_action(&events),
            company,
            stage,
            events,
        })
    }

    /// Validate and append one event, then recompute and cache the
    /// stage from the grown history.
    ///
    /// Guard rejections leave the log untouched.
    pub fn record_event(
        &mut self,
        company_id: CompanyId,
        event_type: EventType,
        data: Option<EventData>,
        created_by: Option<UserId>,
    ) -> Result<Event, ServiceError> {
        self.store
            .find_company(company_id)?
            .ok_or(ServiceError::CompanyNotFound(company_id))?;

        let existing = self.store.events_for(company_id)?;
        if let Err(rejection) = self.guard.validate(event_type, data.as_ref(), &existing) {
            warn!(%company_id, %event_type, %rejection, "event rejected");
            return Err(rejection.into());
        }

        let event = self.store.append(company_id, event_type, data, created_by)?;

        let all_events = self.store.events_for(company_id)?;
        let stage = self.calculator.calculate(&all_events);
        self.store.write_stage(company_id, stage)?;

        info!(%company_id, %event_type, %stage, "event recorded");
        Ok(event)
    }

    /// All companies with their derived stages and event counts.
    pub fn list_companies(&self) -> Result<Vec<CompanySummary>, ServiceError> {
        let mut summaries = Vec::new();
        for company in self.store.list_companies()? {
            let events = self.store.events_for(company.id)?;
            summaries.push(CompanySummary {
                stage: self.calculator.calculate(&events),
                event_count: events.len(),
                company,
            });
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{payload, FixedClock};
    use crate::store::InMemoryStore;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn service() -> PipelineService<InMemoryStore<FixedClock>, FixedClock> {
        let clock = FixedClock(Utc::now());
        PipelineService::with_clock(InMemoryStore::with_clock(clock), clock)
    }

    #[test]
    fn unknown_company_is_reported() {
        let mut svc = service();
        let missing = Uuid::new_v4();

        assert_eq!(
            svc.company_overview(missing).unwrap_err(),
            ServiceError::CompanyNotFound(missing)
        );
        assert_eq!(
            svc.record_event(missing, EventType::ContactAttempted, None, None)
                .unwrap_err(),
            ServiceError::CompanyNotFound(missing)
        );
    }

    #[test]
    fn recording_an_event_advances_the_cached_stage() {
        let mut svc = service();
        let company = svc.create_company("Acme").unwrap();

        svc.record_event(company.id, EventType::ContactAttempted, None, None)
            .unwrap();

        let overview = svc.company_overview(company.id).unwrap();
        assert_eq!(overview.stage, Stage::Touched);
        assert_eq!(overview.company.current_stage, Some(Stage::Touched));
        assert_eq!(overview.events.len(), 1);
    }

    #[test]
    fn rejected_event_is_not_appended() {
        let mut svc = service();
        let company = svc.create_company("Acme").unwrap();

        let result = svc.record_event(company.id, EventType::DiscoveryFilled, None, None);
        assert!(matches!(
            result,
            Err(ServiceError::Rejected(GuardError::MissingPreviousEvent { .. }))
        ));

        let overview = svc.company_overview(company.id).unwrap();
        assert!(overview.events.is_empty());
        assert_eq!(overview.stage, Stage::Ice);
    }

    #[test]
    fn overview_exposes_actions_from_the_same_rules() {
        let mut svc = service();
        let company = svc.create_company("Acme").unwrap();

        let overview = svc.company_overview(company.id).unwrap();
        assert_eq!(overview.available_actions.len(), 1);
        assert_eq!(
            overview.next_action.unwrap().event_type,
            EventType::ContactAttempted
        );
    }

    #[test]
    fn overview_refreshes_a_stale_stage_cache() {
        let now = Utc::now();
        let clock = FixedClock(now);
        let mut store = InMemoryStore::with_clock(clock);

        // Seed a company whose demo happened 61 days ago; the cached
        // stage still says DemoDone.
        let company = store.create_company("Acme").unwrap();
        for (event_type, data, at) in [
            (EventType::ContactAttempted, None, now - Duration::days(90)),
            (
                EventType::DecisionMakerCallLogged,
                Some(payload("comment", "Great call")),
                now - Duration::days(85),
            ),
            (EventType::DiscoveryFilled, None, now - Duration::days(80)),
            (
                EventType::DemoScheduled,
                Some(payload("scheduled_at", "2026-03-01 14:00:00")),
                now - Duration::days(70),
            ),
            (EventType::DemoDone, None, now - Duration::days(61)),
        ] {
            store.insert_event(Event {
                id: Uuid::new_v4(),
                company_id: company.id,
                event_type,
                data,
                created_at: at,
                created_by: None,
            });
        }
        store.write_stage(company.id, Stage::DemoDone).unwrap();

        let mut svc = PipelineService::with_clock(store, clock);
        let overview = svc.company_overview(company.id).unwrap();

        assert_eq!(overview.stage, Stage::DemoPlanned);
        assert_eq!(overview.company.current_stage, Some(Stage::DemoPlanned));
    }

    #[test]
    fn listing_reports_stage_and_event_count() {
        let mut svc = service();
        let quiet = svc.create_company("Quiet").unwrap();
        let active = svc.create_company("Active").unwrap();
        svc.record_event(active.id, EventType::ContactAttempted, None, None)
            .unwrap();

        let summaries = svc.list_companies().unwrap();
        assert_eq!(summaries.len(), 2);

        let find = |id| summaries.iter().find(|s| s.company.id == id).unwrap();
        assert_eq!(find(quiet.id).stage, Stage::Ice);
        assert_eq!(find(quiet.id).event_count, 0);
        assert_eq!(find(active.id).stage, Stage::Touched);
        assert_eq!(find(active.id).event_count, 1);
    }

    #[test]
    fn created_by_is_carried_onto_the_event() {
        let mut svc = service();
        let company = svc.create_company("Acme").unwrap();
        let user = Uuid::new_v4();

        let event = svc
            .record_event(company.id, EventType::ContactAttempted, None, Some(user))
            .unwrap();

        assert_eq!(event.created_by, Some(user));
    }
}
