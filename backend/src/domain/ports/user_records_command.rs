//! Driving port for writing user records.

use async_trait::async_trait;

use crate::domain::{Error, RecordSubmission, UserId, UserRecord};

/// Write-side use cases for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordsCommand: Send + Sync {
    /// Store a new record and return it with its assigned identifier.
    async fn create(&self, submission: RecordSubmission) -> Result<UserRecord, Error>;

    /// Replace the document of the record addressed by `id`.
    async fn update(&self, id: &UserId, submission: RecordSubmission) -> Result<UserRecord, Error>;

    /// Remove the record addressed by `id`.
    async fn delete(&self, id: &UserId) -> Result<(), Error>;
}
