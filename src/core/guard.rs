//! Preconditions gating event creation.
//!
//! The guard decides whether a candidate event may legally be appended
//! to a company's log. Preconditions check *presence anywhere in
//! history*, not the derived stage — deliberately looser than the
//! calculator, so a company whose cached stage lags behind can still
//! record the event its history already supports.

use super::calculator::{latest_of_type, DEMO_VALIDITY_DAYS};
use super::clock::{Clock, SystemClock};
use super::event::{Event, EventData, EventType};
use super::stage::Stage;
use thiserror::Error;

/// Why a candidate event was rejected.
///
/// All variants are recoverable by the caller: surface the message and
/// do not append the event.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GuardError {
    #[error("cannot record {event_type} without first having {required}")]
    MissingPreviousEvent {
        event_type: EventType,
        required: EventType,
    },

    #[error("event {event_type} requires additional data")]
    MissingRequiredData { event_type: EventType },

    #[error("event {event_type} has invalid data: {reason}")]
    InvalidData {
        event_type: EventType,
        reason: String,
    },

    #[error("demo was {days_ago} days ago, but must be within {max_days} days to proceed")]
    DemoExpired { days_ago: i64, max_days: i64 },

    /// Reserved in the taxonomy; no current rule constructs it.
    #[error("cannot record {event_type} at stage {current}, requires {required} or later")]
    StageMismatch {
        event_type: EventType,
        current: Stage,
        required: Stage,
    },
}

/// Validates candidate events against a company's history.
///
/// # Example
///
/// ```rust
/// use dealflow::core::{EventGuard, EventType, GuardError};
///
/// let guard = EventGuard::new();
///
/// // Contact can always be attempted.
/// assert!(guard.validate(EventType::ContactAttempted, None, &[]).is_ok());
///
/// // Nothing else can happen before it.
/// assert_eq!(
///     guard.validate(EventType::DiscoveryFilled, None, &[]),
///     Err(GuardError::MissingPreviousEvent {
///         event_type: EventType::DiscoveryFilled,
///         required: EventType::DecisionMakerCallLogged,
///     })
/// );
/// ```
#[derive(Clone, Debug)]
pub struct EventGuard<C: Clock = SystemClock> {
    clock: C,
}

impl EventGuard<SystemClock> {
    /// Guard reading the system clock for demo validity.
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for EventGuard<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EventGuard<C> {
    /// Guard with an injected time source.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Check whether an event of `event_type` with `data` may be
    /// appended given the company's existing events.
    pub fn validate(
        &self,
        event_type: EventType,
        data: Option<&EventData>,
        history: &[Event],
    ) -> Result<(), GuardError> {
        match event_type {
            EventType::ContactAttempted => Ok(()),
            EventType::DecisionMakerCallLogged => self.validate_decision_maker_call(data, history),
            EventType::DiscoveryFilled => {
                require_previous(history, event_type, EventType::DecisionMakerCallLogged)
            }
            EventType::DemoScheduled => self.validate_demo_scheduled(data, history),
            EventType::DemoDone => require_previous(history, event_type, EventType::DemoScheduled),
            EventType::InvoiceIssued => self.validate_invoice_issued(history),
            EventType::PaymentReceived => {
                require_previous(history, event_type, EventType::InvoiceIssued)
            }
            EventType::FirstCredentialIssued => {
                require_previous(history, event_type, EventType::PaymentReceived)
            }
        }
    }

    fn validate_decision_maker_call(
        &self,
        data: Option<&EventData>,
        history: &[Event],
    ) -> Result<(), GuardError> {
        let event_type = EventType::DecisionMakerCallLogged;
        require_previous(history, event_type, EventType::ContactAttempted)?;

        let data = data.ok_or(GuardError::MissingRequiredData { event_type })?;
        let comment = data.get("comment").and_then(|value| value.as_str());
        match comment {
            Some(text) if !text.trim().is_empty() => Ok(()),
            _ => Err(GuardError::InvalidData {
                event_type,
                reason: "comment is required".to_string(),
            }),
        }
    }

    fn validate_demo_scheduled(
        &self,
        data: Option<&EventData>,
        history: &[Event],
    ) -> Result<(), GuardError> {
        let event_type = EventType::DemoScheduled;
        require_previous(history, event_type, EventType::DiscoveryFilled)?;

        let data = data.ok_or(GuardError::MissingRequiredData { event_type })?;
        let scheduled_at = data.get("scheduled_at").and_then(|value| value.as_str());
        match scheduled_at {
            Some(text) if !text.is_empty() => Ok(()),
            _ => Err(GuardError::InvalidData {
                event_type,
                reason: "scheduled date/time is required".to_string(),
            }),
        }
    }

    fn validate_invoice_issued(&self, history: &[Event]) -> Result<(), GuardError> {
        require_previous(history, EventType::InvoiceIssued, EventType::DemoDone)?;

        // Same window as the calculator: the latest demo must still be
        // valid for an invoice to be issued against it.
        if let Some(latest) = latest_of_type(history, EventType::DemoDone) {
            let days_ago = (self.clock.now() - latest.created_at).num_days();
            if days_ago >= DEMO_VALIDITY_DAYS {
                return Err(GuardError::DemoExpired {
                    days_ago,
                    max_days: DEMO_VALIDITY_DAYS,
                });
            }
        }

        Ok(())
    }
}

fn has_event_type(history: &[Event], event_type: EventType) -> bool {
    history.iter().any(|event| event.event_type == event_type)
}

fn require_previous(
    history: &[Event],
    event_type: EventType,
    required: EventType,
) -> Result<(), GuardError> {
    if has_event_type(history, required) {
        Ok(())
    } else {
        Err(GuardError::MissingPreviousEvent {
            event_type,
            required,
        })
    }
}
