//! User record service library.
//!
//! Layout follows a hexagonal split:
//!
//! - [`domain`]: identifiers, the record aggregate and its codec, ports, and
//!   the [`domain::UserRecordService`] implementing the use cases;
//! - [`inbound::http`]: Actix handlers, route table, and error envelope;
//! - [`outbound::persistence`]: the Diesel-backed store and connection pool;
//! - [`settings`], [`logging`], [`version`]: process bootstrap helpers;
//! - [`middleware`]: request tracing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod logging;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod version;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
