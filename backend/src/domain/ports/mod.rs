//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`UserRecordStore`) are implemented by outbound adapters.
//! Driving ports (`UserRecordsQuery`, `UserRecordsCommand`) are what inbound
//! adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod user_record_store;
mod user_records_command;
mod user_records_query;

#[cfg(test)]
pub use user_record_store::MockUserRecordStore;
pub use user_record_store::{UserRecordStore, UserRecordStoreError};
#[cfg(test)]
pub use user_records_command::MockUserRecordsCommand;
pub use user_records_command::UserRecordsCommand;
#[cfg(test)]
pub use user_records_query::MockUserRecordsQuery;
pub use user_records_query::UserRecordsQuery;
