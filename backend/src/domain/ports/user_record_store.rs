//! Driven port for user record persistence.
//!
//! Each method maps to exactly one statement against the backing table.
//! Absence is reported through `Option`/`bool` rather than an error so the
//! domain decides how to classify it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageWindow;

use crate::domain::{UserDocument, UserId, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user record store adapters.
    pub enum UserRecordStoreError {
        /// No connection could be obtained.
        Connection { message: String } =>
            "user record store connection failed: {message}",
        /// The statement failed for a reason other than a constraint.
        Query { message: String } =>
            "user record store query failed: {message}",
        /// The database refused the write because of a constraint.
        Rejected { message: String } =>
            "user record store rejected the write: {message}",
        /// A stored document could not be decoded.
        DocumentInvalid { id: String, message: String } =>
            "stored document for {id} is invalid: {message}",
    }
}

/// Port for user record storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordStore: Send + Sync {
    /// Insert a document, letting the store assign the identifier.
    ///
    /// Both timestamps are set to `stamped_at`.
    async fn insert(
        &self,
        document: &UserDocument,
        stamped_at: DateTime<Utc>,
    ) -> Result<UserId, UserRecordStoreError>;

    /// Fetch a record by identifier.
    async fn fetch(&self, id: &UserId) -> Result<Option<UserRecord>, UserRecordStoreError>;

    /// List identifiers ordered by primary key within `window`.
    async fn list(&self, window: PageWindow) -> Result<Vec<UserId>, UserRecordStoreError>;

    /// Replace the document and `updated_at` of an existing record.
    ///
    /// Returns the record's unchanged `created_at`, or `None` when no row
    /// matched.
    async fn replace(
        &self,
        id: &UserId,
        document: &UserDocument,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, UserRecordStoreError>;

    /// Delete a record. Returns `false` when no row matched.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRecordStoreError>;
}
