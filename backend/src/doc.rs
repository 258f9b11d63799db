//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the five record operations, both health probes, and
//! the wire-schema wrappers from [`crate::inbound::http::schemas`]. Paths
//! are documented with the default route layout.
//!
//! The document backs Swagger UI in debug builds and is printed by the
//! `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, ErrorCodeSchema, ErrorEnvelopeSchema, ListEntrySchema,
    MetadataTestSchema, UserMetadataSchema, UserRecordSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users record service API",
        description = "Create, read, list, update, and delete user records stored as JSON documents."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_records,
        crate::inbound::http::users::get_record,
        crate::inbound::http::users::create_record,
        crate::inbound::http::users::update_record,
        crate::inbound::http::users::delete_record,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserRecordSchema,
        UserMetadataSchema,
        MetadataTestSchema,
        ListEntrySchema,
        DeleteOutcomeSchema,
        ErrorEnvelopeSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "User record operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
