use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pulse_core::error::CoreError;
use pulse_core::models::category::Cadence;
use pulse_core::models::risk_score::RiskScoreRecord;

/// Who submitted a report. Authentication happens upstream; the role is
/// only used to cross-check it against the cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitterRole {
    Athlete,
    Coach,
    Clinician,
}

impl SubmitterRole {
    /// The cadence each role is allowed to submit.
    pub fn cadence(&self) -> Cadence {
        match self {
            SubmitterRole::Athlete => Cadence::Daily,
            SubmitterRole::Coach => Cadence::Weekly,
            SubmitterRole::Clinician => Cadence::Monthly,
        }
    }
}

/// One report arriving from the (out-of-scope) HTTP/auth layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub subject_id: Uuid,
    pub cadence: Cadence,
    pub date: Date,
    /// Untyped metric payload; parsed and validated per cadence.
    pub metrics: serde_json::Value,
    pub submitter_role: SubmitterRole,
}

/// What the caller gets back from a successful submission.
///
/// The rule-based score is always present on the daily path; the
/// advisory-derived fields only when the estimator was available.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub risk_score: Option<RiskScoreRecord>,
    pub composite_risk: Option<u8>,
    pub advisory_note: Option<String>,
}

/// A coach's weekly assessment: direct 1–10 risk ratings for the two
/// field-observable categories.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAssessment {
    pub strength_asymmetry: u8,
    pub neuromuscular_control: u8,
}

impl WeeklyAssessment {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CoreError> {
        let assessment: WeeklyAssessment = serde_json::from_value(value.clone())
            .map_err(|e| CoreError::invalid_input("metrics", e.to_string()))?;
        validate_rating("strengthAsymmetry", assessment.strength_asymmetry)?;
        validate_rating("neuromuscularControl", assessment.neuromuscular_control)?;
        Ok(assessment)
    }
}

/// A clinician's periodic assessment. The anatomical rating is required;
/// the other two are optional refinements of the coach's ratings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAssessment {
    pub anatomical_fixed_risk: u8,
    #[serde(default)]
    pub strength_asymmetry: Option<u8>,
    #[serde(default)]
    pub neuromuscular_control: Option<u8>,
    #[serde(default)]
    pub clinical_note: Option<String>,
}

impl MonthlyAssessment {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CoreError> {
        let assessment: MonthlyAssessment = serde_json::from_value(value.clone())
            .map_err(|e| CoreError::invalid_input("metrics", e.to_string()))?;
        validate_rating("anatomicalFixedRisk", assessment.anatomical_fixed_risk)?;
        if let Some(v) = assessment.strength_asymmetry {
            validate_rating("strengthAsymmetry", v)?;
        }
        if let Some(v) = assessment.neuromuscular_control {
            validate_rating("neuromuscularControl", v)?;
        }
        Ok(assessment)
    }
}

fn validate_rating(field: &str, value: u8) -> Result<(), CoreError> {
    if (1..=10).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::invalid_input(
            field,
            format!("must be 1-10, got {value}"),
        ))
    }
}
