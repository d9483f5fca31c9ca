//! pulse-ingest
//!
//! Report ingestion and the idempotency guard. One service orchestrates
//! the whole flow: duplicate policy per cadence, the rule-based risk
//! engine on the daily path, conditional persistence, the best-effort
//! advisory step, composite aggregation, and event publication.

pub mod error;
pub mod service;
pub mod submission;

pub use error::IngestError;
pub use service::{IngestService, MAX_CAS_ATTEMPTS};
pub use submission::{IngestOutcome, Submission, SubmitterRole};
