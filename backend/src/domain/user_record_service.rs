//! User record domain service.
//!
//! Implements the driving ports on top of a [`UserRecordStore`]. Every
//! operation is a single store call; the service stamps timestamps,
//! reconciles declared identifiers, and classifies store outcomes into
//! domain [`Error`]s.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use pagination::PageWindow;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    UserRecordStore, UserRecordStoreError, UserRecordsCommand, UserRecordsQuery,
};
use crate::domain::{Error, RecordSubmission, UserId, UserRecord};

/// Stored timestamps keep microsecond precision.
const TIMESTAMP_PRECISION: u16 = 6;

/// What an update does when no record matches the identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingRecordPolicy {
    /// Report success and echo the submitted document.
    #[default]
    Acknowledge,
    /// Report the record as not found.
    Reject,
}

/// User record service implementing [`UserRecordsQuery`] and [`UserRecordsCommand`].
#[derive(Clone)]
pub struct UserRecordService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    missing_policy: MissingRecordPolicy,
}

impl<S> UserRecordService<S> {
    /// Create a service using the default [`MissingRecordPolicy`].
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            missing_policy: MissingRecordPolicy::default(),
        }
    }

    /// Override how updates of unknown identifiers are answered.
    #[must_use]
    pub fn with_missing_policy(mut self, policy: MissingRecordPolicy) -> Self {
        self.missing_policy = policy;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(TIMESTAMP_PRECISION)
    }
}

fn not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} does not exist")).with_details(json!({
        "id": id.to_string(),
        "code": "not_found",
    }))
}

fn map_read_error(err: UserRecordStoreError) -> Error {
    match err {
        UserRecordStoreError::DocumentInvalid { id, message } => {
            Error::document_invalid(format!("stored document for user {id} is invalid"))
                .with_details(json!({ "id": id, "reason": message }))
        }
        other => Error::internal(other.to_string()),
    }
}

fn map_write_error(err: UserRecordStoreError) -> Error {
    match err {
        UserRecordStoreError::Rejected { message } => {
            Error::invalid_request("Invalid request payload")
                .with_details(json!({ "reason": message }))
        }
        other => map_read_error(other),
    }
}

fn check_declared_id(id: &UserId, submission: &RecordSubmission) -> Result<(), Error> {
    let Some(declared) = submission.declared_id() else {
        return Ok(());
    };
    match UserId::parse(declared) {
        Ok(parsed) if parsed == *id => Ok(()),
        _ => Err(Error::invalid_request(format!(
            "usersuuid {declared} does not match {id}"
        ))
        .with_details(json!({
            "field": "usersuuid",
            "value": declared,
            "code": "id_mismatch",
        }))),
    }
}

#[async_trait]
impl<S> UserRecordsQuery for UserRecordService<S>
where
    S: UserRecordStore,
{
    async fn fetch(&self, id: &UserId) -> Result<UserRecord, Error> {
        self.store
            .fetch(id)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self, window: PageWindow) -> Result<Vec<UserId>, Error> {
        self.store.list(window).await.map_err(map_read_error)
    }
}

#[async_trait]
impl<S> UserRecordsCommand for UserRecordService<S>
where
    S: UserRecordStore,
{
    async fn create(&self, submission: RecordSubmission) -> Result<UserRecord, Error> {
        let now = self.now();
        let id = self
            .store
            .insert(&submission.document, now)
            .await
            .map_err(map_write_error)?;
        Ok(UserRecord {
            id,
            document: submission.document,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: &UserId, submission: RecordSubmission) -> Result<UserRecord, Error> {
        check_declared_id(id, &submission)?;
        let now = self.now();
        let stored = self
            .store
            .replace(id, &submission.document, now)
            .await
            .map_err(map_write_error)?;

        let created_at = match (stored, self.missing_policy) {
            (Some(created_at), _) => created_at,
            (None, MissingRecordPolicy::Acknowledge) => {
                warn!(%id, "update matched no record; acknowledging");
                now
            }
            (None, MissingRecordPolicy::Reject) => return Err(not_found(id)),
        };

        Ok(UserRecord {
            id: *id,
            document: submission.document,
            created_at,
            updated_at: now,
        })
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        if self.store.delete(id).await.map_err(map_read_error)? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

#[cfg(test)]
#[path = "user_record_service_tests.rs"]
mod tests;
