//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UserRecordsCommand, UserRecordsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Read-side use cases.
    pub records: Arc<dyn UserRecordsQuery>,
    /// Write-side use cases.
    pub record_commands: Arc<dyn UserRecordsCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```ignore
    /// let service = Arc::new(UserRecordService::new(store, clock));
    /// let state = HttpState::new(service.clone(), service);
    /// ```
    pub fn new(
        records: Arc<dyn UserRecordsQuery>,
        record_commands: Arc<dyn UserRecordsCommand>,
    ) -> Self {
        Self {
            records,
            record_commands,
        }
    }
}
