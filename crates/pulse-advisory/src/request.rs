use serde::Serialize;
use uuid::Uuid;

use pulse_core::composite::CategoryAverages;
use pulse_core::models::category::Cadence;
use pulse_core::models::daily::DailyAverages;

/// Everything the estimator gets to see for one advisory call: the
/// submission that triggered it plus the subject's local history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    pub subject_id: Uuid,
    pub cadence: Cadence,
    /// The raw metrics of the triggering submission.
    pub current_metrics: serde_json::Value,
    /// Rolling means over the subject's daily-report window, when any
    /// daily history exists.
    pub historical_averages: Option<DailyAverages>,
    pub category_averages: CategoryAverages,
    /// Prior composite value; 0 means unknown.
    pub prior_composite: u8,
}
