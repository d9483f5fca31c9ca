//! The ingestion service.
//!
//! Every write goes through a bounded conditional-update loop against the
//! subject store: load the document (or start an empty one), apply the
//! mutation, save with the version read. A lost race reloads and reapplies,
//! so the duplicate check and the write it guards are atomic relative to
//! every other submission for the same subject.
//!
//! The advisory call runs after the report is durable and outside any
//! critical section; its result is applied through a second, independent
//! conditional update. Nothing on the advisory/aggregation path can fail
//! the submission.

use jiff::civil::Date;
use tracing::{info, warn};
use uuid::Uuid;

use pulse_advisory::estimator::{AdvisoryEstimator, AdvisoryOutcome};
use pulse_advisory::request::AdvisoryRequest;
use pulse_core::composite::{CompositeInputs, update_composite};
use pulse_core::models::category::{Cadence, CategoryEntry, RiskCategory};
use pulse_core::models::daily::{DailyAverages, DailyMetrics, DailyReport};
use pulse_core::models::note::{NoteEntry, NoteSource};
use pulse_core::models::risk_score::RiskScoreRecord;
use pulse_core::models::subject::SubjectDocument;
use pulse_core::risk::compute_risk;
use pulse_events::{EventPublisher, RiskEvent};
use pulse_storage::error::StorageError;
use pulse_storage::store::{SubjectStore, Version};

use crate::error::IngestError;
use crate::submission::{
    IngestOutcome, MonthlyAssessment, Submission, WeeklyAssessment,
};

/// Bound on the conditional-update loop before giving up with a
/// retryable `Conflict`.
pub const MAX_CAS_ATTEMPTS: usize = 4;

pub struct IngestService<S, A, P> {
    store: S,
    estimator: A,
    publisher: P,
}

impl<S, A, P> IngestService<S, A, P>
where
    S: SubjectStore,
    A: AdvisoryEstimator,
    P: EventPublisher,
{
    pub fn new(store: S, estimator: A, publisher: P) -> Self {
        IngestService {
            store,
            estimator,
            publisher,
        }
    }

    /// Ingest one report. All-or-nothing: a validation or duplicate error
    /// leaves no trace in the store.
    pub async fn submit(&self, submission: Submission) -> Result<IngestOutcome, IngestError> {
        let expected = submission.submitter_role.cadence();
        if expected != submission.cadence {
            return Err(IngestError::InvalidInput {
                field: "submitterRole".to_string(),
                reason: format!(
                    "{:?} submissions must use the {:?} cadence",
                    submission.submitter_role, expected
                ),
            });
        }

        match submission.cadence {
            Cadence::Daily => self.submit_daily(submission).await,
            Cadence::Weekly => self.submit_weekly(submission).await,
            Cadence::Monthly => self.submit_monthly(submission).await,
        }
    }

    /// Daily self-report: merge policy. A same-day resubmission is a
    /// correction — it replaces the report, its risk score record, and
    /// the day's derived category entries.
    async fn submit_daily(&self, submission: Submission) -> Result<IngestOutcome, IngestError> {
        let metrics = DailyMetrics::from_value(&submission.metrics)?;
        let subject_id = submission.subject_id;
        let date = submission.date;

        let record = self
            .with_document(subject_id, |doc| {
                doc.upsert_daily_report(DailyReport {
                    date,
                    metrics: metrics.clone(),
                });

                let assessment = compute_risk(&doc.daily_reports)?;
                let record = RiskScoreRecord {
                    id: Uuid::new_v4(),
                    subject_id,
                    date,
                    score: assessment.score,
                    level: assessment.level,
                    violations: assessment
                        .violations
                        .iter()
                        .map(|v| v.to_string())
                        .collect(),
                    recommendation: assessment.recommendation.clone(),
                    created_at: jiff::Timestamp::now(),
                };
                doc.upsert_risk_score(record.clone());

                for (category, value) in [
                    (RiskCategory::WorkloadManagement, assessment.workload_signal),
                    (RiskCategory::MentalRecovery, assessment.recovery_signal),
                ] {
                    let series = doc.series_mut(category);
                    series.remove_daily(date);
                    series.append(CategoryEntry::new(value, date, Cadence::Daily)?)?;
                }

                Ok(record)
            })
            .await?;

        info!(
            subject_id = %subject_id,
            date = %date,
            score = record.score,
            level = ?record.level,
            "daily report ingested"
        );
        self.publisher.publish(&RiskEvent::ReportIngested {
            subject_id,
            cadence: Cadence::Daily,
            date,
        });

        let (composite, note) = self
            .aggregate(subject_id, Cadence::Daily, date, submission.metrics)
            .await;

        Ok(IngestOutcome {
            risk_score: Some(record),
            composite_risk: composite,
            advisory_note: note,
        })
    }

    /// Coach weekly assessment: reject policy. A second assessment on the
    /// same calendar day is an error, not a correction.
    async fn submit_weekly(&self, submission: Submission) -> Result<IngestOutcome, IngestError> {
        let assessment = WeeklyAssessment::from_value(&submission.metrics)?;
        let subject_id = submission.subject_id;
        let date = submission.date;

        self.with_document(subject_id, |doc| {
            append_rejecting_same_day(
                doc,
                date,
                Cadence::Weekly,
                &[
                    (RiskCategory::StrengthAsymmetry, assessment.strength_asymmetry),
                    (
                        RiskCategory::NeuromuscularControl,
                        assessment.neuromuscular_control,
                    ),
                ],
            )
        })
        .await?;

        info!(subject_id = %subject_id, date = %date, "weekly assessment ingested");
        self.publisher.publish(&RiskEvent::ReportIngested {
            subject_id,
            cadence: Cadence::Weekly,
            date,
        });

        let (composite, note) = self
            .aggregate(subject_id, Cadence::Weekly, date, submission.metrics)
            .await;

        Ok(IngestOutcome {
            risk_score: None,
            composite_risk: composite,
            advisory_note: note,
        })
    }

    /// Clinician periodic assessment: reject policy, plus an optional
    /// free-text clinical note.
    async fn submit_monthly(&self, submission: Submission) -> Result<IngestOutcome, IngestError> {
        let assessment = MonthlyAssessment::from_value(&submission.metrics)?;
        let subject_id = submission.subject_id;
        let date = submission.date;

        let clinical_note = assessment.clinical_note.clone();
        self.with_document(subject_id, |doc| {
            let mut ratings = vec![(
                RiskCategory::AnatomicalFixedRisk,
                assessment.anatomical_fixed_risk,
            )];
            if let Some(v) = assessment.strength_asymmetry {
                ratings.push((RiskCategory::StrengthAsymmetry, v));
            }
            if let Some(v) = assessment.neuromuscular_control {
                ratings.push((RiskCategory::NeuromuscularControl, v));
            }
            append_rejecting_same_day(doc, date, Cadence::Monthly, &ratings)?;

            if let Some(note) = &clinical_note {
                doc.push_note(NoteEntry {
                    value: note.clone(),
                    date,
                    source: NoteSource::Clinician,
                });
            }
            Ok(())
        })
        .await?;

        info!(subject_id = %subject_id, date = %date, "periodic clinical assessment ingested");
        self.publisher.publish(&RiskEvent::ReportIngested {
            subject_id,
            cadence: Cadence::Monthly,
            date,
        });
        if let Some(note) = clinical_note {
            self.publisher.publish(&RiskEvent::NoteAdded {
                subject_id,
                note,
            });
        }

        let (composite, note) = self
            .aggregate(subject_id, Cadence::Monthly, date, submission.metrics)
            .await;

        Ok(IngestOutcome {
            risk_score: None,
            composite_risk: composite,
            advisory_note: note,
        })
    }

    /// The advisory + aggregation step. Best-effort by contract: the
    /// report is already durable, so every failure here degrades to "no
    /// advisory data" and at worst an unchanged composite.
    async fn aggregate(
        &self,
        subject_id: Uuid,
        cadence: Cadence,
        date: Date,
        current_metrics: serde_json::Value,
    ) -> (Option<u8>, Option<String>) {
        let doc = match self.store.load(subject_id).await {
            Ok(Some((doc, _))) => doc,
            Ok(None) => return (None, None),
            Err(e) => {
                warn!(subject_id = %subject_id, error = %e, "aggregation read failed; submission remains durable");
                return (None, None);
            }
        };

        let request = AdvisoryRequest {
            subject_id,
            cadence,
            current_metrics,
            historical_averages: DailyAverages::over(&doc.daily_reports),
            category_averages: doc.category_averages(),
            prior_composite: doc.composite_risk,
        };

        let (advisory_composite, advisory_note) =
            match self.estimator.estimate(&request).await {
                AdvisoryOutcome::Available(result) => {
                    info!(
                        subject_id = %subject_id,
                        composite = ?result.composite,
                        category = ?result.category,
                        "advisory estimate received"
                    );
                    let note = result.note.map(|n| match result.category {
                        Some(category) => format!("[{}] {n}", category.label()),
                        None => n,
                    });
                    (result.composite, note)
                }
                AdvisoryOutcome::Unavailable => {
                    info!(subject_id = %subject_id, "advisory unavailable, aggregating from local data only");
                    (None, None)
                }
            };

        let update = self
            .with_document(subject_id, |doc| {
                let new_value = update_composite(CompositeInputs {
                    averages: doc.category_averages(),
                    prior: doc.composite_risk,
                    advisory: advisory_composite,
                });
                doc.composite_risk = new_value;
                if let Some(note) = &advisory_note {
                    doc.push_note(NoteEntry {
                        value: note.clone(),
                        date,
                        source: NoteSource::Advisory,
                    });
                }
                Ok(new_value)
            })
            .await;

        match update {
            Ok(new_value) => {
                self.publisher.publish(&RiskEvent::CompositeRiskUpdated {
                    subject_id,
                    new_value,
                });
                if let Some(note) = &advisory_note {
                    self.publisher.publish(&RiskEvent::NoteAdded {
                        subject_id,
                        note: note.clone(),
                    });
                }
                (Some(new_value), advisory_note)
            }
            Err(e) => {
                warn!(subject_id = %subject_id, error = %e, "composite aggregation failed; submission remains durable");
                (None, None)
            }
        }
    }

    /// Bounded conditional-update loop: load (or default), mutate, save
    /// with the version read. An error from the mutation discards the
    /// local copy, so rejected submissions leave the store untouched.
    async fn with_document<T>(
        &self,
        subject_id: Uuid,
        mut apply: impl FnMut(&mut SubjectDocument) -> Result<T, IngestError>,
    ) -> Result<T, IngestError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let (mut doc, version) = match self.store.load(subject_id).await? {
                Some((doc, version)) => (doc, version),
                None => (SubjectDocument::new(subject_id), Version::Absent),
            };

            let value = apply(&mut doc)?;
            doc.updated_at = jiff::Timestamp::now();

            match self.store.save_if_match(&doc, &version).await {
                Ok(_) => return Ok(value),
                Err(StorageError::PreconditionFailed { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(IngestError::Conflict {
            attempts: MAX_CAS_ATTEMPTS,
        })
    }
}

/// Append one rating per category, rejecting the whole submission if any
/// of the series already has an entry with this cadence on this day.
fn append_rejecting_same_day(
    doc: &mut SubjectDocument,
    date: Date,
    cadence: Cadence,
    ratings: &[(RiskCategory, u8)],
) -> Result<(), IngestError> {
    for &(category, _) in ratings {
        if doc.series(category).has_entry_on(date, cadence) {
            return Err(IngestError::Duplicate { date });
        }
    }
    for &(category, value) in ratings {
        doc.series_mut(category)
            .append(CategoryEntry::new(value, date, cadence)?)?;
    }
    Ok(())
}
