use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Maximum number of daily reports retained per subject (FIFO cap).
pub const MAX_DAILY_REPORTS: usize = 1000;

/// A validated daily self-report from the athlete.
///
/// `mood` and `soreness` are legacy optional fields: older clients never
/// sent them, so absence is treated as 0 rather than an input error.
/// Everything else is required and range-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyMetrics {
    /// Hours slept last night, 0–14.
    pub sleep_hours: f64,
    /// Perceived fatigue, 0–100 (higher = more fatigued).
    pub fatigue: u8,
    /// Perceived stress, 0–100.
    pub stress: u8,
    /// Self-rated readiness to train, 0–100 (higher = more ready).
    pub readiness: u8,
    /// Session training load in arbitrary units (session-RPE × minutes), ≥ 0.
    pub training_load: f64,
    /// Mood, 0–100. Legacy optional, defaults to 0.
    #[serde(default)]
    pub mood: Option<u8>,
    /// Muscle soreness, 0–100. Legacy optional, defaults to 0.
    #[serde(default)]
    pub soreness: Option<u8>,
}

impl DailyMetrics {
    /// Parse metrics out of an untyped submission payload and validate
    /// ranges. A missing required field or out-of-range value fails fast
    /// with `InvalidInput`; nothing is silently coerced.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CoreError> {
        let metrics: DailyMetrics = serde_json::from_value(value.clone())
            .map_err(|e| CoreError::invalid_input("metrics", e.to_string()))?;
        metrics.validate()?;
        Ok(metrics)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=14.0).contains(&self.sleep_hours) {
            return Err(CoreError::invalid_input(
                "sleepHours",
                format!("must be 0-14 hours, got {}", self.sleep_hours),
            ));
        }
        for (field, value) in [
            ("fatigue", Some(self.fatigue)),
            ("stress", Some(self.stress)),
            ("readiness", Some(self.readiness)),
            ("mood", self.mood),
            ("soreness", self.soreness),
        ] {
            if let Some(v) = value
                && v > 100
            {
                return Err(CoreError::invalid_input(
                    field,
                    format!("must be 0-100, got {v}"),
                ));
            }
        }
        if !self.training_load.is_finite() || self.training_load < 0.0 {
            return Err(CoreError::invalid_input(
                "trainingLoad",
                format!("must be a non-negative number, got {}", self.training_load),
            ));
        }
        Ok(())
    }

    /// Soreness with the legacy default applied.
    pub fn soreness_or_default(&self) -> u8 {
        self.soreness.unwrap_or(0)
    }
}

/// One day in a subject's self-report window.
///
/// The window is append-ordered; a same-day resubmission replaces the
/// existing report in place rather than duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyReport {
    pub date: Date,
    pub metrics: DailyMetrics,
}

/// Rolling means over a daily-report window, used as historical context
/// for the advisory estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyAverages {
    pub sleep_hours: f64,
    pub fatigue: f64,
    pub stress: f64,
    pub readiness: f64,
    pub training_load: f64,
}

impl DailyAverages {
    /// Arithmetic means over the whole window. Returns `None` for an
    /// empty window rather than inventing zeros.
    pub fn over(window: &[DailyReport]) -> Option<DailyAverages> {
        if window.is_empty() {
            return None;
        }
        let n = window.len() as f64;
        let mut avg = DailyAverages {
            sleep_hours: 0.0,
            fatigue: 0.0,
            stress: 0.0,
            readiness: 0.0,
            training_load: 0.0,
        };
        for report in window {
            avg.sleep_hours += report.metrics.sleep_hours;
            avg.fatigue += f64::from(report.metrics.fatigue);
            avg.stress += f64::from(report.metrics.stress);
            avg.readiness += f64::from(report.metrics.readiness);
            avg.training_load += report.metrics.training_load;
        }
        avg.sleep_hours /= n;
        avg.fatigue /= n;
        avg.stress /= n;
        avg.readiness /= n;
        avg.training_load /= n;
        Some(avg)
    }
}
