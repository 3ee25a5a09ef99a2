//! Stage derivation from event history.
//!
//! The calculator is the heart of the event-driven model: given the
//! full event log of a company it derives the current [`Stage`]. The
//! result depends only on the *set* of event types present (plus the
//! timestamp of the most recent demo), never on list order.

use super::clock::{Clock, SystemClock};
use super::event::{Event, EventType};
use super::stage::Stage;
use std::collections::HashMap;

/// Days a completed demo stays valid for demo-dependent stages.
pub const DEMO_VALIDITY_DAYS: i64 = 60;

/// Derives a company's current stage from its event history.
///
/// Calculation never fails: an empty history is `Ice`, and otherwise
/// the highest stage whose predicate holds wins. Because the demo
/// predicate is time-windowed, a company can regress out of `DemoDone`
/// or `Committed` purely through elapsed time; callers must treat the
/// result as a snapshot and recompute on every read that matters.
///
/// # Example
///
/// ```rust
/// use dealflow::core::{Stage, StageCalculator};
///
/// let calculator = StageCalculator::new();
/// assert_eq!(calculator.calculate(&[]), Stage::Ice);
/// ```
#[derive(Clone, Debug)]
pub struct StageCalculator<C: Clock = SystemClock> {
    clock: C,
}

impl StageCalculator<SystemClock> {
    /// Calculator reading the system clock for demo validity.
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for StageCalculator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> StageCalculator<C> {
    /// Calculator with an injected time source.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Derive the current stage from all events of one company.
    ///
    /// Events may arrive in any order; lookups index by type rather
    /// than scan sequentially.
    pub fn calculate(&self, events: &[Event]) -> Stage {
        if events.is_empty() {
            return Stage::Ice;
        }

        let by_type = index_by_type(events);

        // Predicates are cumulative, so testing highest-to-lowest and
        // returning the first hit is equivalent to walking the pipeline
        // upwards and stopping at the first failure.
        if self.can_be_activated(&by_type) {
            return Stage::Activated;
        }
        if self.can_be_customer(&by_type) {
            return Stage::Customer;
        }
        if self.can_be_committed(&by_type) {
            return Stage::Committed;
        }
        if self.can_be_demo_done(&by_type) {
            return Stage::DemoDone;
        }
        if self.can_be_demo_planned(&by_type) {
            return Stage::DemoPlanned;
        }
        if self.can_be_interested(&by_type) {
            return Stage::Interested;
        }
        if self.can_be_aware(&by_type) {
            return Stage::Aware;
        }
        if self.can_be_touched(&by_type) {
            return Stage::Touched;
        }

        Stage::Ice
    }

    fn can_be_touched(&self, by_type: &EventIndex<'_>) -> bool {
        by_type.contains_key(&EventType::ContactAttempted)
    }

    fn can_be_aware(&self, by_type: &EventIndex<'_>) -> bool {
        by_type.contains_key(&EventType::DecisionMakerCallLogged)
    }

    fn can_be_interested(&self, by_type: &EventIndex<'_>) -> bool {
        by_type.contains_key(&EventType::DiscoveryFilled)
    }

    fn can_be_demo_planned(&self, by_type: &EventIndex<'_>) -> bool {
        by_type.contains_key(&EventType::DemoScheduled)
    }

    fn can_be_demo_done(&self, by_type: &EventIndex<'_>) -> bool {
        // Earlier demos are irrelevant once superseded: only the most
        // recent one is checked against the validity window.
        match latest_in_index(by_type, EventType::DemoDone) {
            Some(latest) => {
                let days = (self.clock.now() - latest.created_at).num_days();
                days < DEMO_VALIDITY_DAYS
            }
            None => false,
        }
    }

    fn can_be_committed(&self, by_type: &EventIndex<'_>) -> bool {
        // An invoice against an expired demo does not advance the stage.
        self.can_be_demo_done(by_type) && by_type.contains_key(&EventType::InvoiceIssued)
    }

    fn can_be_customer(&self, by_type: &EventIndex<'_>) -> bool {
        // The guard prevented out-of-order creation, so presence alone
        // is enough for the terminal stages.
        by_type.contains_key(&EventType::PaymentReceived)
    }

    fn can_be_activated(&self, by_type: &EventIndex<'_>) -> bool {
        by_type.contains_key(&EventType::FirstCredentialIssued)
    }
}

type EventIndex<'a> = HashMap<EventType, Vec<&'a Event>>;

fn index_by_type(events: &[Event]) -> EventIndex<'_> {
    let mut index: EventIndex<'_> = HashMap::new();
    for event in events {
        index.entry(event.event_type).or_default().push(event);
    }
    index
}

fn latest_in_index<'a>(by_type: &EventIndex<'a>, event_type: EventType) -> Option<&'a Event> {
    by_type
        .get(&event_type)?
        .iter()
        .max_by_key(|event| event.created_at)
        .copied()
}

/// The most recent event of a type, by timestamp rather than position.
pub(crate) fn latest_of_type(events: &[Event], event_type: EventType) -> Option<&Event> {
    events
        .iter()
        .filter(|event| event.event_type == event_type)
        .max_by_key(|event| event.created_at)
}
