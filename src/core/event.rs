//! Business events and their types.
//!
//! Events are the source of truth for pipeline progress. They are
//! immutable once appended; the log is append-only and the core never
//! updates or deletes an event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of recordable business occurrence driving stage progress.
///
/// Declaration order matches pipeline order, which the action resolver
/// relies on when enumerating candidates.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ContactAttempted,
    DecisionMakerCallLogged,
    DiscoveryFilled,
    DemoScheduled,
    DemoDone,
    InvoiceIssued,
    PaymentReceived,
    FirstCredentialIssued,
}

impl EventType {
    /// All event types in pipeline order.
    pub const ALL: [EventType; 8] = [
        EventType::ContactAttempted,
        EventType::DecisionMakerCallLogged,
        EventType::DiscoveryFilled,
        EventType::DemoScheduled,
        EventType::DemoDone,
        EventType::InvoiceIssued,
        EventType::PaymentReceived,
        EventType::FirstCredentialIssued,
    ];

    /// Stable snake_case key, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContactAttempted => "contact_attempted",
            Self::DecisionMakerCallLogged => "decision_maker_call_logged",
            Self::DiscoveryFilled => "discovery_filled",
            Self::DemoScheduled => "demo_scheduled",
            Self::DemoDone => "demo_done",
            Self::InvoiceIssued => "invoice_issued",
            Self::PaymentReceived => "payment_received",
            Self::FirstCredentialIssued => "first_credential_issued",
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::ContactAttempted => "Contact Attempted",
            Self::DecisionMakerCallLogged => "Decision Maker Call Logged",
            Self::DiscoveryFilled => "Discovery Form Filled",
            Self::DemoScheduled => "Demo Scheduled",
            Self::DemoDone => "Demo Completed",
            Self::InvoiceIssued => "Invoice Issued",
            Self::PaymentReceived => "Payment Received",
            Self::FirstCredentialIssued => "First Credential Issued",
        }
    }

    /// Whether recording this event requires a structured payload.
    ///
    /// `DecisionMakerCallLogged` needs a `comment`, `DemoScheduled`
    /// needs a `scheduled_at`. Everything else carries no data.
    pub fn requires_data(self) -> bool {
        matches!(self, Self::DecisionMakerCallLogged | Self::DemoScheduled)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured event payload.
///
/// Serializes to `{"comment": string}` for call-logged events and
/// `{"scheduled_at": string}` for demo-scheduled events.
pub type EventData = serde_json::Map<String, serde_json::Value>;

/// Immutable record of one business occurrence.
///
/// Created once by the event sink collaborator, which assigns `id` and
/// `created_at`; never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub company_id: Uuid,
    pub event_type: EventType,
    pub data: Option<EventData>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

impl Event {
    /// Read a string field from the payload, if present.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.get(key))
            .and_then(|value| value.as_str())
    }
}

/// Build a one-field payload, the only shapes the pipeline uses.
pub fn payload(key: &str, value: impl Into<String>) -> EventData {
    let mut data = EventData::new();
    data.insert(key.to_string(), serde_json::Value::String(value.into()));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: EventType, data: Option<EventData>) -> Event {
        Event {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            event_type,
            data,
            created_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn only_call_and_demo_scheduling_require_data() {
        let requiring: Vec<EventType> = EventType::ALL
            .into_iter()
            .filter(|t| t.requires_data())
            .collect();

        assert_eq!(
            requiring,
            vec![EventType::DecisionMakerCallLogged, EventType::DemoScheduled]
        );
    }

    #[test]
    fn all_table_matches_pipeline_order() {
        for pair in EventType::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn event_type_serializes_to_snake_case() {
        let json = serde_json::to_string(&EventType::DecisionMakerCallLogged).unwrap();
        assert_eq!(json, "\"decision_maker_call_logged\"");
    }

    #[test]
    fn data_str_reads_payload_fields() {
        let e = event(
            EventType::DecisionMakerCallLogged,
            Some(payload("comment", "Great call")),
        );

        assert_eq!(e.data_str("comment"), Some("Great call"));
        assert_eq!(e.data_str("scheduled_at"), None);
    }

    #[test]
    fn data_str_on_payload_free_event_is_none() {
        let e = event(EventType::ContactAttempted, None);
        assert_eq!(e.data_str("comment"), None);
    }

    #[test]
    fn payload_wire_shape_is_a_single_string_field() {
        let json = serde_json::to_string(&payload("scheduled_at", "2026-03-01 14:00:00")).unwrap();
        assert_eq!(json, r#"{"scheduled_at":"2026-03-01 14:00:00"}"#);
    }

    #[test]
    fn event_round_trips_through_json() {
        let e = event(EventType::DemoScheduled, Some(payload("scheduled_at", "x")));
        let json = serde_json::to_string(&e).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
