use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Severity tier derived from the rule-based risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// Immutable snapshot of one rule-based risk evaluation.
///
/// Produced once per daily-report submission and kept as an append-only
/// audit trail. Under the daily merge policy a same-day resubmission
/// replaces the day's record with a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RiskScoreRecord {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub date: Date,
    /// Normalized rule-based score, 0–1.
    pub score: f64,
    pub level: RiskLevel,
    /// Stable rule identifiers that fired for this window.
    pub violations: Vec<String>,
    pub recommendation: String,
    pub created_at: jiff::Timestamp,
}

/// Maximum number of risk score records retained per subject (FIFO cap).
pub const MAX_RISK_SCORES: usize = 1000;
