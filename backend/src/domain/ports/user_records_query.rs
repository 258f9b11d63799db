//! Driving port for reading user records.
//!
//! Inbound adapters call this port with already-validated identifiers and
//! normalised page windows.

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{Error, UserId, UserRecord};

/// Read-side use cases for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordsQuery: Send + Sync {
    /// Fetch one record.
    async fn fetch(&self, id: &UserId) -> Result<UserRecord, Error>;

    /// List record identifiers in primary-key order.
    async fn list(&self, window: PageWindow) -> Result<Vec<UserId>, Error>;
}
