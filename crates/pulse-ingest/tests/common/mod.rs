#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use jiff::civil::Date;
use serde_json::json;
use uuid::Uuid;

use pulse_advisory::estimator::{AdvisoryEstimator, AdvisoryOutcome};
use pulse_advisory::parse::AdvisoryResult;
use pulse_advisory::request::AdvisoryRequest;
use pulse_core::models::category::Cadence;
use pulse_core::models::subject::SubjectDocument;
use pulse_events::{EventPublisher, RiskEvent};
use pulse_ingest::{IngestService, Submission, SubmitterRole};
use pulse_storage::error::StorageError;
use pulse_storage::store::{MemoryStore, SubjectStore, Version};

/// Shared handle around the in-memory store so tests can inspect state
/// after the service has consumed its copy.
#[derive(Clone, Default)]
pub struct SharedStore(pub Arc<MemoryStore>);

impl SubjectStore for SharedStore {
    async fn load(
        &self,
        subject_id: Uuid,
    ) -> Result<Option<(SubjectDocument, Version)>, StorageError> {
        self.0.load(subject_id).await
    }

    async fn save_if_match(
        &self,
        doc: &SubjectDocument,
        expected: &Version,
    ) -> Result<Version, StorageError> {
        self.0.save_if_match(doc, expected).await
    }
}

impl SharedStore {
    pub async fn document(&self, subject_id: Uuid) -> SubjectDocument {
        self.0
            .load(subject_id)
            .await
            .expect("load")
            .expect("document exists")
            .0
    }

    pub async fn contains(&self, subject_id: Uuid) -> bool {
        self.0.load(subject_id).await.expect("load").is_some()
    }
}

/// Estimator stub that replays a scripted sequence of outcomes and
/// records every request it sees. Runs out of script → `Unavailable`.
#[derive(Clone, Default)]
pub struct ScriptedEstimator {
    script: Arc<Mutex<VecDeque<AdvisoryOutcome>>>,
    pub requests: Arc<Mutex<Vec<AdvisoryRequest>>>,
}

impl ScriptedEstimator {
    pub fn unavailable() -> Self {
        ScriptedEstimator::default()
    }

    pub fn replying(outcomes: impl IntoIterator<Item = AdvisoryOutcome>) -> Self {
        ScriptedEstimator {
            script: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl AdvisoryEstimator for ScriptedEstimator {
    async fn estimate(&self, request: &AdvisoryRequest) -> AdvisoryOutcome {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(AdvisoryOutcome::Unavailable)
    }
}

/// Publisher that records every event.
#[derive(Clone, Default)]
pub struct CapturingPublisher(pub Arc<Mutex<Vec<RiskEvent>>>);

impl EventPublisher for CapturingPublisher {
    fn publish(&self, event: &RiskEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

impl CapturingPublisher {
    pub fn events(&self) -> Vec<RiskEvent> {
        self.0.lock().unwrap().clone()
    }
}

pub type TestService = IngestService<SharedStore, ScriptedEstimator, CapturingPublisher>;

pub struct Harness {
    pub service: TestService,
    pub store: SharedStore,
    pub estimator: ScriptedEstimator,
    pub publisher: CapturingPublisher,
}

pub fn harness(estimator: ScriptedEstimator) -> Harness {
    let store = SharedStore::default();
    let publisher = CapturingPublisher::default();
    Harness {
        service: IngestService::new(store.clone(), estimator.clone(), publisher.clone()),
        store,
        estimator,
        publisher,
    }
}

/// Pipe test logs through the capture machinery; repeated calls are fine.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn advisory(composite: Option<u8>, note: Option<&str>) -> AdvisoryOutcome {
    AdvisoryOutcome::Available(AdvisoryResult {
        category: None,
        composite,
        note: note.map(|n| n.to_string()),
    })
}

pub fn daily_submission(subject_id: Uuid, date: Date, fatigue: u8) -> Submission {
    Submission {
        subject_id,
        cadence: Cadence::Daily,
        date,
        metrics: json!({
            "sleepHours": 7.5,
            "fatigue": fatigue,
            "stress": 30,
            "readiness": 75,
            "trainingLoad": 400.0
        }),
        submitter_role: SubmitterRole::Athlete,
    }
}

pub fn weekly_submission(subject_id: Uuid, date: Date, strength: u8, neuro: u8) -> Submission {
    Submission {
        subject_id,
        cadence: Cadence::Weekly,
        date,
        metrics: json!({
            "strengthAsymmetry": strength,
            "neuromuscularControl": neuro
        }),
        submitter_role: SubmitterRole::Coach,
    }
}

pub fn monthly_submission(subject_id: Uuid, date: Date, anatomical: u8) -> Submission {
    Submission {
        subject_id,
        cadence: Cadence::Monthly,
        date,
        metrics: json!({
            "anatomicalFixedRisk": anatomical
        }),
        submitter_role: SubmitterRole::Clinician,
    }
}
