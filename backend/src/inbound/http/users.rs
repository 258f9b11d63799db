//! User record API handlers.
//!
//! ```text
//! GET    /api/v1/namespace/{namespace}/usersLIST?start=0&count=10
//! POST   /api/v1/namespace/{namespace}/users {"id":"x","metadata":{...}}
//! GET    /api/v1/namespace/{namespace}/users/{key}
//! PUT    /api/v1/namespace/{namespace}/users/{key} {"usersuuid":"...","id":"x",...}
//! DELETE /api/v1/namespace/{namespace}/users/{key}
//! ```
//!
//! Paths are registered by [`crate::inbound::http::routes::ResourceRoutes`];
//! the layout above is the default. The `{namespace}` segment is logged but
//! does not partition records.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use pagination::{PageParams, PageWindow};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::domain::user_record::codec::{DocumentCodecError, decode_submission};
use crate::domain::{Error, RecordSubmission, UserDocument, UserId, UserRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, ErrorEnvelopeSchema, ListEntrySchema, UserRecordSchema,
};
use crate::inbound::http::state::HttpState;

/// Wire shape of a record in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecordBody {
    /// Primary-key identifier.
    pub usersuuid: String,
    /// Document fields, inlined.
    #[serde(flatten)]
    pub document: UserDocument,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last write time.
    pub updated: DateTime<Utc>,
}

impl From<UserRecord> for UserRecordBody {
    fn from(record: UserRecord) -> Self {
        Self {
            usersuuid: record.id.to_string(),
            document: record.document,
            created: record.created_at,
            updated: record.updated_at,
        }
    }
}

/// One element of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Primary-key identifier.
    pub uuid: String,
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Always `success`.
    pub result: String,
}

impl DeleteOutcome {
    fn success() -> Self {
        Self {
            result: "success".to_owned(),
        }
    }
}

fn map_codec_error(err: DocumentCodecError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "body",
        "code": "malformed_body",
    }))
}

fn parse_submission(
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<RecordSubmission, Error> {
    // Oversized or truncated payloads surface here rather than as plain text.
    let body = body.map_err(|err| {
        Error::invalid_request(format!("request body could not be read: {err}")).with_details(
            json!({
                "field": "body",
                "code": "unreadable_body",
            }),
        )
    })?;
    decode_submission(&body).map_err(map_codec_error)
}

/// List record identifiers in primary-key order.
///
/// `count` outside `1..=10` and unparsable values fall back to 10; negative
/// or unparsable `start` falls back to 0. A repeated key keeps its first value.
#[utoipa::path(
    get,
    path = "/api/v1/namespace/{namespace}/usersLIST",
    params(
        ("namespace" = String, Path, description = "Namespace label; logged only"),
        ("start" = Option<String>, Query, description = "Zero-based offset"),
        ("count" = Option<String>, Query, description = "Page size, at most 10")
    ),
    responses(
        (status = 200, description = "Identifiers", body = [ListEntrySchema]),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUserRecords"
)]
pub async fn list_records(
    state: web::Data<HttpState>,
    namespace: web::Path<String>,
    query: web::Query<Vec<(String, String)>>,
) -> ApiResult<web::Json<Vec<ListEntry>>> {
    let window = PageWindow::from(&PageParams::from_pairs(query.into_inner()));
    debug!(
        namespace = %namespace,
        offset = window.offset(),
        limit = window.limit(),
        "listing user records"
    );
    let ids = state.records.list(window).await?;
    Ok(web::Json(
        ids.into_iter()
            .map(|id| ListEntry {
                uuid: id.to_string(),
            })
            .collect(),
    ))
}

/// Fetch one record.
#[utoipa::path(
    get,
    path = "/api/v1/namespace/{namespace}/users/{key}",
    params(
        ("namespace" = String, Path, description = "Namespace label; logged only"),
        ("key" = String, Path, description = "Record UUID")
    ),
    responses(
        (status = 200, description = "Record", body = UserRecordSchema),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such record", body = ErrorEnvelopeSchema),
        (status = 500, description = "Stored document invalid or internal error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUserRecord"
)]
pub async fn get_record(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<UserRecordBody>> {
    let (namespace, key) = path.into_inner();
    let id = UserId::parse(&key)?;
    debug!(%namespace, %id, "fetching user record");
    let record = state.records.fetch(&id).await?;
    Ok(web::Json(record.into()))
}

/// Create a record; the server assigns its identifier.
#[utoipa::path(
    post,
    path = "/api/v1/namespace/{namespace}/users",
    params(
        ("namespace" = String, Path, description = "Namespace label; logged only")
    ),
    request_body = UserRecordSchema,
    responses(
        (status = 201, description = "Created record", body = UserRecordSchema),
        (status = 400, description = "Malformed body or rejected write", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "createUserRecord"
)]
pub async fn create_record(
    state: web::Data<HttpState>,
    namespace: web::Path<String>,
    body: Result<web::Bytes, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let submission = parse_submission(body)?;
    let record = state.record_commands.create(submission).await?;
    info!(namespace = %namespace, id = %record.id, "user record created");
    Ok(HttpResponse::Created().json(UserRecordBody::from(record)))
}

/// Replace the document of a record.
///
/// A `usersuuid` in the body must be empty or equal to `{key}`.
#[utoipa::path(
    put,
    path = "/api/v1/namespace/{namespace}/users/{key}",
    params(
        ("namespace" = String, Path, description = "Namespace label; logged only"),
        ("key" = String, Path, description = "Record UUID")
    ),
    request_body = UserRecordSchema,
    responses(
        (status = 200, description = "Updated record", body = UserRecordSchema),
        (status = 400, description = "Malformed identifier or body, identifier mismatch, or rejected write", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such record, when missing updates are rejected", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "updateUserRecord"
)]
pub async fn update_record(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    body: Result<web::Bytes, actix_web::Error>,
) -> ApiResult<web::Json<UserRecordBody>> {
    let (namespace, key) = path.into_inner();
    let id = UserId::parse(&key)?;
    let submission = parse_submission(body)?;
    let record = state.record_commands.update(&id, submission).await?;
    info!(%namespace, %id, "user record updated");
    Ok(web::Json(record.into()))
}

/// Delete a record.
#[utoipa::path(
    delete,
    path = "/api/v1/namespace/{namespace}/users/{key}",
    params(
        ("namespace" = String, Path, description = "Namespace label; logged only"),
        ("key" = String, Path, description = "Record UUID")
    ),
    responses(
        (status = 200, description = "Deleted", body = DeleteOutcomeSchema),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such record", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUserRecord"
)]
pub async fn delete_record(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<DeleteOutcome>> {
    let (namespace, key) = path.into_inner();
    let id = UserId::parse(&key)?;
    state.record_commands.delete(&id).await?;
    info!(%namespace, %id, "user record deleted");
    Ok(web::Json(DeleteOutcome::success()))
}
