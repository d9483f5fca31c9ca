//! pulse-advisory
//!
//! The advisory port: prompt assembly, Bedrock model invocation with a
//! bounded timeout, and strict-then-best-effort parsing of the estimator's
//! output. The estimator is a non-deterministic, possibly-unavailable
//! collaborator — every failure mode degrades to `Unavailable`, never an
//! error the submission path has to handle.

pub mod client;
pub mod error;
pub mod estimator;
pub mod parse;
pub mod prompt;
pub mod request;
