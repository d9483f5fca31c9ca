use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::category::{CategorySeries, RiskCategory, SeriesAverage};
use super::daily::{DailyReport, MAX_DAILY_REPORTS};
use super::note::{MAX_NOTE_ENTRIES, NoteEntry};
use super::risk_score::{MAX_RISK_SCORES, RiskScoreRecord};
use crate::composite::CategoryAverages;

/// The persisted per-subject state: the five category series, the daily
/// self-report window, the risk score audit trail, notes, and the scalar
/// composite risk.
///
/// `composite_risk` is 0 while unset, otherwise 1–100. Only the composite
/// aggregator writes it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubjectDocument {
    pub subject_id: Uuid,
    pub composite_risk: u8,
    pub workload_management: CategorySeries,
    pub mental_recovery: CategorySeries,
    pub strength_asymmetry: CategorySeries,
    pub neuromuscular_control: CategorySeries,
    pub anatomical_fixed_risk: CategorySeries,
    pub daily_reports: Vec<DailyReport>,
    pub risk_scores: Vec<RiskScoreRecord>,
    pub notes: Vec<NoteEntry>,
    pub updated_at: jiff::Timestamp,
}

impl SubjectDocument {
    pub fn new(subject_id: Uuid) -> Self {
        SubjectDocument {
            subject_id,
            composite_risk: 0,
            workload_management: CategorySeries::new(),
            mental_recovery: CategorySeries::new(),
            strength_asymmetry: CategorySeries::new(),
            neuromuscular_control: CategorySeries::new(),
            anatomical_fixed_risk: CategorySeries::new(),
            daily_reports: Vec::new(),
            risk_scores: Vec::new(),
            notes: Vec::new(),
            updated_at: jiff::Timestamp::now(),
        }
    }

    pub fn series(&self, category: RiskCategory) -> &CategorySeries {
        match category {
            RiskCategory::WorkloadManagement => &self.workload_management,
            RiskCategory::MentalRecovery => &self.mental_recovery,
            RiskCategory::StrengthAsymmetry => &self.strength_asymmetry,
            RiskCategory::NeuromuscularControl => &self.neuromuscular_control,
            RiskCategory::AnatomicalFixedRisk => &self.anatomical_fixed_risk,
        }
    }

    pub fn series_mut(&mut self, category: RiskCategory) -> &mut CategorySeries {
        match category {
            RiskCategory::WorkloadManagement => &mut self.workload_management,
            RiskCategory::MentalRecovery => &mut self.mental_recovery,
            RiskCategory::StrengthAsymmetry => &mut self.strength_asymmetry,
            RiskCategory::NeuromuscularControl => &mut self.neuromuscular_control,
            RiskCategory::AnatomicalFixedRisk => &mut self.anatomical_fixed_risk,
        }
    }

    /// Whole-series averages for all five categories.
    pub fn category_averages(&self) -> CategoryAverages {
        CategoryAverages {
            workload_management: self.workload_management.average(None),
            mental_recovery: self.mental_recovery.average(None),
            strength_asymmetry: self.strength_asymmetry.average(None),
            neuromuscular_control: self.neuromuscular_control.average(None),
            anatomical_fixed_risk: self.anatomical_fixed_risk.average(None),
        }
    }

    /// Windowed average for one category, restricted to entries on or
    /// after `since`.
    pub fn category_average_since(&self, category: RiskCategory, since: Date) -> SeriesAverage {
        self.series(category).average(Some(since))
    }

    /// The daily report for a given calendar day, if one exists.
    pub fn daily_report_on(&self, date: Date) -> Option<&DailyReport> {
        self.daily_reports.iter().find(|r| r.date == date)
    }

    /// Insert or replace the daily report for `report.date` (same-day
    /// resubmission is a correction, not a duplicate), enforcing the
    /// FIFO cap.
    pub fn upsert_daily_report(&mut self, report: DailyReport) {
        match self.daily_reports.iter_mut().find(|r| r.date == report.date) {
            Some(existing) => *existing = report,
            None => {
                self.daily_reports.push(report);
                if self.daily_reports.len() > MAX_DAILY_REPORTS {
                    self.daily_reports.remove(0);
                }
            }
        }
    }

    /// Insert or replace the risk score record for `record.date`,
    /// enforcing the FIFO cap.
    pub fn upsert_risk_score(&mut self, record: RiskScoreRecord) {
        match self.risk_scores.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => *existing = record,
            None => {
                self.risk_scores.push(record);
                if self.risk_scores.len() > MAX_RISK_SCORES {
                    self.risk_scores.remove(0);
                }
            }
        }
    }

    /// Append a note, enforcing the FIFO cap.
    pub fn push_note(&mut self, note: NoteEntry) {
        self.notes.push(note);
        if self.notes.len() > MAX_NOTE_ENTRIES {
            self.notes.remove(0);
        }
    }
}
