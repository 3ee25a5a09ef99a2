//! Deriving the currently permitted actions.
//!
//! The resolver probes the guard with every event type instead of
//! keeping its own rule table, so eligibility can never silently
//! diverge from what the guard enforces at creation time.

use super::clock::{Clock, SystemClock};
use super::event::{payload, Event, EventData, EventType};
use super::guard::EventGuard;
use serde::Serialize;

/// An event type currently permitted by the guard, with display
/// metadata for affordances.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AvailableAction {
    pub event_type: EventType,
    pub label: &'static str,
    pub description: &'static str,
    pub requires_input: bool,
}

/// Enumerates the actions a caller may take given an event history.
///
/// # Example
///
/// ```rust
/// use dealflow::core::{ActionResolver, EventType};
///
/// let resolver = ActionResolver::new();
/// let actions = resolver.available_actions(&[]);
///
/// assert_eq!(actions.len(), 1);
/// assert_eq!(actions[0].event_type, EventType::ContactAttempted);
/// ```
#[derive(Clone, Debug)]
pub struct ActionResolver<C: Clock = SystemClock> {
    guard: EventGuard<C>,
    clock: C,
}

impl ActionResolver<SystemClock> {
    /// Resolver reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ActionResolver<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ActionResolver<C> {
    /// Resolver with an injected time source, shared with its guard.
    pub fn with_clock(clock: C) -> Self {
        Self {
            guard: EventGuard::with_clock(clock.clone()),
            clock,
        }
    }

    /// All event types the guard would currently accept, in pipeline
    /// order, each with its display descriptor.
    pub fn available_actions(&self, events: &[Event]) -> Vec<AvailableAction> {
        EventType::ALL
            .into_iter()
            .filter(|&event_type| self.is_available(event_type, events))
            .map(descriptor)
            .collect()
    }

    /// The recommended next action: first available in pipeline order.
    pub fn next_action(&self, events: &[Event]) -> Option<AvailableAction> {
        EventType::ALL
            .into_iter()
            .find(|&event_type| self.is_available(event_type, events))
            .map(descriptor)
    }

    fn is_available(&self, event_type: EventType, events: &[Event]) -> bool {
        let data = self.probe_data(event_type);
        self.guard.validate(event_type, data.as_ref(), events).is_ok()
    }

    /// Minimal well-formed payload per type, used only for probing.
    fn probe_data(&self, event_type: EventType) -> Option<EventData> {
        match event_type {
            EventType::DecisionMakerCallLogged => Some(payload("comment", "test")),
            EventType::DemoScheduled => Some(payload(
                "scheduled_at",
                self.clock.now().format("%Y-%m-%d %H:%M:%S").to_string(),
            )),
            _ => None,
        }
    }
}

fn descriptor(event_type: EventType) -> AvailableAction {
    match event_type {
        EventType::ContactAttempted => AvailableAction {
            event_type,
            label: "Log Contact Attempt",
            description: "Record that you attempted to reach the company",
            requires_input: false,
        },
        EventType::DecisionMakerCallLogged => AvailableAction {
            event_type,
            label: "Log Decision Maker Call",
            description: "Record a call with the decision maker",
            requires_input: true,
        },
        EventType::DiscoveryFilled => AvailableAction {
            event_type,
            label: "Mark Discovery Complete",
            description: "Confirm that discovery form has been filled",
            requires_input: false,
        },
        EventType::DemoScheduled => AvailableAction {
            event_type,
            label: "Schedule Demo",
            description: "Set a date and time for the product demo",
            requires_input: true,
        },
        EventType::DemoDone => AvailableAction {
            event_type,
            label: "Mark Demo Complete",
            description: "Confirm that the demo has been completed",
            requires_input: false,
        },
        EventType::InvoiceIssued => AvailableAction {
            event_type,
            label: "Issue Invoice",
            description: "Generate and send invoice to the customer",
            requires_input: false,
        },
        EventType::PaymentReceived => AvailableAction {
            event_type,
            label: "Record Payment",
            description: "Confirm that payment has been received",
            requires_input: false,
        },
        EventType::FirstCredentialIssued => AvailableAction {
            event_type,
            label: "Issue Credentials",
            description: "Create and send first set of access credentials",
            requires_input: false,
        },
    }
}
