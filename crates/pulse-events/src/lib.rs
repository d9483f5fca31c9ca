//! pulse-events
//!
//! The notification boundary. The core publishes structured events after
//! successful aggregation; delivery, retry, and fan-out to connected
//! clients are entirely the transport layer's responsibility. The default
//! publisher just emits them as structured `tracing` records.

pub mod events;

pub use events::{EventPublisher, NullPublisher, RiskEvent, TracingPublisher};
