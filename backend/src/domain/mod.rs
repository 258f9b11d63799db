//! Domain primitives, ports, and services.
//!
//! Purpose: own the user record lifecycle rules (identifier validation,
//! document encoding, timestamping, and error classification) without any
//! dependency on HTTP or SQL.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: classified, transport-agnostic failures.
//! - `UserId`: validated primary-key identifier.
//! - `UserDocument`/`UserRecord`/`RecordSubmission`: the record aggregate.
//! - `UserRecordService`: implementation of the driving ports.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user_id;
pub mod user_record;
pub mod user_record_service;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user_id::{UserId, UserIdError};
pub use self::user_record::{
    MetadataTest, RecordSubmission, UserDocument, UserMetadata, UserRecord,
};
pub use self::user_record_service::{MissingRecordPolicy, UserRecordService};
