use jiff::civil::Date;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use pulse_core::models::category::Cadence;

/// A domain event emitted by the ingestion/aggregation flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RiskEvent {
    ReportIngested {
        subject_id: Uuid,
        cadence: Cadence,
        date: Date,
    },
    CompositeRiskUpdated {
        subject_id: Uuid,
        new_value: u8,
    },
    NoteAdded {
        subject_id: Uuid,
        note: String,
    },
}

impl RiskEvent {
    fn name(&self) -> &'static str {
        match self {
            RiskEvent::ReportIngested { .. } => "report_ingested",
            RiskEvent::CompositeRiskUpdated { .. } => "composite_risk_updated",
            RiskEvent::NoteAdded { .. } => "note_added",
        }
    }

    fn subject_id(&self) -> Uuid {
        match self {
            RiskEvent::ReportIngested { subject_id, .. }
            | RiskEvent::CompositeRiskUpdated { subject_id, .. }
            | RiskEvent::NoteAdded { subject_id, .. } => *subject_id,
        }
    }
}

/// Publication boundary. Publishing is fire-and-forget: the core never
/// blocks on, or fails because of, event delivery.
pub trait EventPublisher {
    fn publish(&self, event: &RiskEvent);
}

/// Emits each event as a structured tracing record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPublisher;

impl EventPublisher for TracingPublisher {
    fn publish(&self, event: &RiskEvent) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        info!(
            event.name = event.name(),
            event.subject_id = %event.subject_id(),
            event.payload = %payload,
            "risk event"
        );
    }
}

/// Swallows events. For tests and contexts with no transport attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl EventPublisher for NullPublisher {
    fn publish(&self, _event: &RiskEvent) {}
}
