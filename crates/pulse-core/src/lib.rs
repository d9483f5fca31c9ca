//! pulse-core
//!
//! Pure domain types, the rule-based injury-risk engine, the composite
//! risk aggregator, and document-store key conventions.
//! No AWS SDK dependency — this is the shared vocabulary of the Pulse system.

pub mod composite;
pub mod error;
pub mod models;
pub mod risk;
pub mod store_keys;
