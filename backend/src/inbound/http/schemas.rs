//! OpenAPI schema definitions for wire types.
//!
//! Domain types do not derive `ToSchema`. The wrappers here mirror the wire
//! shapes produced by the handlers and exist only for documentation.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed identifier or body, identifier mismatch, or rejected write.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No record matches the identifier.
    #[schema(rename = "not_found")]
    NotFound,
    /// A stored document could not be decoded.
    #[schema(rename = "document_invalid")]
    DocumentInvalid,
    /// Any other server failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::inbound::http::error::ErrorEnvelope`].
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Status code and detail.
    #[schema(example = "400: invalid UUID: abc")]
    error: String,
    /// Stable machine-readable error code.
    code: ErrorCodeSchema,
    /// Correlation identifier for this request.
    #[schema(example = "00000000-0000-0000-0000-000000000000")]
    trace_id: Option<String>,
    /// Supplementary details.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::MetadataTest`].
#[derive(ToSchema)]
#[schema(as = MetadataTest)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MetadataTestSchema {
    #[schema(example = "k")]
    key: String,
}

/// OpenAPI schema for [`crate::domain::UserMetadata`].
#[derive(ToSchema)]
#[schema(as = UserMetadata)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserMetadataSchema {
    #[schema(example = "m")]
    id: String,
    test: MetadataTestSchema,
}

/// OpenAPI schema for [`crate::inbound::http::users::UserRecordBody`].
///
/// Additional properties at any level are stored and returned verbatim.
#[derive(ToSchema)]
#[schema(as = UserRecord)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserRecordSchema {
    /// Server-assigned identifier; ignored on create.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    usersuuid: Option<String>,
    /// Client-chosen identifier string.
    #[schema(example = "x")]
    id: String,
    metadata: UserMetadataSchema,
    /// Creation time; ignored on input.
    #[schema(format = DateTime)]
    created: Option<String>,
    /// Last write time; ignored on input.
    #[schema(format = DateTime)]
    updated: Option<String>,
}

/// OpenAPI schema for [`crate::inbound::http::users::ListEntry`].
#[derive(ToSchema)]
#[schema(as = ListEntry)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ListEntrySchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    uuid: String,
}

/// OpenAPI schema for [`crate::inbound::http::users::DeleteOutcome`].
#[derive(ToSchema)]
#[schema(as = DeleteOutcome)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeleteOutcomeSchema {
    #[schema(example = "success")]
    result: String,
}
