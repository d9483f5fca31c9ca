//! pulse-storage
//!
//! Per-subject document persistence. Thin wrapper around the AWS S3 SDK
//! plus the `SubjectStore` boundary the ingestion service writes through,
//! with an in-memory implementation for tests and local runs.

pub mod client;
pub mod error;
pub mod objects;
pub mod state;
pub mod store;
