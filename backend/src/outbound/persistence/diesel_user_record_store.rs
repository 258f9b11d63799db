//! PostgreSQL-backed `UserRecordStore` implementation using Diesel ORM.
//!
//! Each port method issues exactly one statement. Documents are written as
//! JSONB through the domain codec and decoded again on read; a stored value
//! that no longer decodes is reported as `DocumentInvalid` rather than as a
//! missing row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageWindow;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserRecordStore, UserRecordStoreError};
use crate::domain::user_record::codec::{DocumentCodecError, decode_document, encode_document};
use crate::domain::{UserDocument, UserId, UserRecord};

use super::models::{NewUserRecordRow, UserRecordReplacement, UserRecordRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRecordStore` port.
#[derive(Clone)]
pub struct DieselUserRecordStore {
    pool: DbPool,
}

impl DieselUserRecordStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRecordStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRecordStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRecordStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserRecordStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserRecordStoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRecordStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation,
            info,
        ) => UserRecordStoreError::rejected(info.message().to_owned()),
        DieselError::DatabaseError(_, _) => UserRecordStoreError::query("database error"),
        _ => UserRecordStoreError::query("database error"),
    }
}

fn map_encode_error(error: DocumentCodecError) -> UserRecordStoreError {
    UserRecordStoreError::rejected(error.to_string())
}

fn row_to_record(row: UserRecordRow) -> Result<UserRecord, UserRecordStoreError> {
    let UserRecordRow {
        users_uuid,
        document,
        created_at,
        updated_at,
    } = row;
    let document = decode_document(document).map_err(|err| {
        UserRecordStoreError::document_invalid(users_uuid.to_string(), err.to_string())
    })?;
    Ok(UserRecord {
        id: UserId::from_uuid(users_uuid),
        document,
        created_at,
        updated_at,
    })
}

fn window_bounds(window: PageWindow) -> (i64, i64) {
    (window.offset(), window.limit())
}

#[async_trait]
impl UserRecordStore for DieselUserRecordStore {
    async fn insert(
        &self,
        document: &UserDocument,
        stamped_at: DateTime<Utc>,
    ) -> Result<UserId, UserRecordStoreError> {
        let value = encode_document(document).map_err(map_encode_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRecordRow {
            document: &value,
            created_at: stamped_at,
            updated_at: stamped_at,
        };
        let id: Uuid = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::users_uuid)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(UserId::from_uuid(id))
    }

    async fn fetch(&self, id: &UserId) -> Result<Option<UserRecord>, UserRecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRecordRow> = users::table
            .filter(users::users_uuid.eq(id.as_uuid()))
            .select(UserRecordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_record).transpose()
    }

    async fn list(&self, window: PageWindow) -> Result<Vec<UserId>, UserRecordStoreError> {
        let (offset, limit) = window_bounds(window);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<Uuid> = users::table
            .select(users::users_uuid)
            .order(users::users_uuid.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn replace(
        &self,
        id: &UserId,
        document: &UserDocument,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, UserRecordStoreError> {
        let value = encode_document(document).map_err(map_encode_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = UserRecordReplacement {
            document: &value,
            updated_at,
        };
        diesel::update(users::table.filter(users::users_uuid.eq(id.as_uuid())))
            .set(&changes)
            .returning(users::created_at)
            .get_result::<DateTime<Utc>>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(users::table.filter(users::users_uuid.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}
