//! The `SubjectStore` boundary.
//!
//! The ingestion service's duplicate check and write must be atomic
//! relative to other submissions for the same subject, so every write
//! goes through a conditional put: If-Match on the version read, or
//! If-None-Match for first creation (the atomic get-or-insert). A lost
//! race surfaces as `PreconditionFailed` and the caller reloads and
//! retries.

use std::collections::HashMap;
use std::sync::Mutex;

use aws_sdk_s3::Client;
use uuid::Uuid;

use pulse_core::models::subject::SubjectDocument;
use pulse_core::store_keys;

use crate::error::StorageError;
use crate::state;

/// Version token for conditional writes.
///
/// `Absent` means "the document did not exist when read" and turns the
/// save into a create-only write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    Absent,
    Tag(String),
}

#[allow(async_fn_in_trait)]
pub trait SubjectStore {
    /// Load a subject document and its version, or `None` if the subject
    /// has no document yet.
    async fn load(
        &self,
        subject_id: Uuid,
    ) -> Result<Option<(SubjectDocument, Version)>, StorageError>;

    /// Conditionally save a subject document. Fails with
    /// `PreconditionFailed` when another writer got there first.
    async fn save_if_match(
        &self,
        doc: &SubjectDocument,
        expected: &Version,
    ) -> Result<Version, StorageError>;
}

/// S3-backed store: one JSON document per subject, ETag optimistic locking.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        S3Store {
            client,
            bucket: bucket.into(),
        }
    }
}

impl SubjectStore for S3Store {
    async fn load(
        &self,
        subject_id: Uuid,
    ) -> Result<Option<(SubjectDocument, Version)>, StorageError> {
        let key = store_keys::subject(subject_id);
        match state::load_state::<SubjectDocument>(&self.client, &self.bucket, &key).await {
            Ok((doc, etag)) => Ok(Some((doc, Version::Tag(etag)))),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save_if_match(
        &self,
        doc: &SubjectDocument,
        expected: &Version,
    ) -> Result<Version, StorageError> {
        let key = store_keys::subject(doc.subject_id);
        let etag = match expected {
            Version::Absent => {
                state::save_state_if_none_match(&self.client, &self.bucket, &key, doc).await?
            }
            Version::Tag(etag) => {
                state::save_state_if_match(&self.client, &self.bucket, &key, doc, etag).await?
            }
        };
        Ok(Version::Tag(etag))
    }
}

/// In-memory store with the same conditional-write semantics, for tests
/// and local runs. Documents round-trip through JSON so serialization
/// behaves exactly as it does against S3.
#[derive(Default)]
pub struct MemoryStore {
    subjects: Mutex<HashMap<Uuid, (u64, Vec<u8>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SubjectStore for MemoryStore {
    async fn load(
        &self,
        subject_id: Uuid,
    ) -> Result<Option<(SubjectDocument, Version)>, StorageError> {
        let subjects = self.subjects.lock().expect("store mutex poisoned");
        match subjects.get(&subject_id) {
            Some((version, body)) => {
                let doc: SubjectDocument = serde_json::from_slice(body)?;
                Ok(Some((doc, Version::Tag(version.to_string()))))
            }
            None => Ok(None),
        }
    }

    async fn save_if_match(
        &self,
        doc: &SubjectDocument,
        expected: &Version,
    ) -> Result<Version, StorageError> {
        let body = serde_json::to_vec(doc)?;
        let key = store_keys::subject(doc.subject_id);
        let mut subjects = self.subjects.lock().expect("store mutex poisoned");

        let current = subjects.get(&doc.subject_id);
        let matches = match (expected, current) {
            (Version::Absent, None) => true,
            (Version::Tag(tag), Some((version, _))) => *tag == version.to_string(),
            _ => false,
        };
        if !matches {
            return Err(StorageError::PreconditionFailed { key });
        }

        let next = current.map(|(version, _)| version + 1).unwrap_or(1);
        subjects.insert(doc.subject_id, (next, body));
        Ok(Version::Tag(next.to_string()))
    }
}
