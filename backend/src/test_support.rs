//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

pub mod store {
    //! In-memory [`UserRecordStore`] with the same observable behaviour as
    //! the Diesel store.

    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use pagination::PageWindow;
    use serde_json::Value;
    use uuid::Uuid;

    use crate::domain::ports::{UserRecordStore, UserRecordStoreError};
    use crate::domain::user_record::codec::{decode_document, encode_document};
    use crate::domain::{UserDocument, UserId, UserRecord};

    #[derive(Debug, Clone)]
    struct StoredRow {
        document: Value,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default)]
    struct Inner {
        rows: BTreeMap<Uuid, StoredRow>,
        failure: Option<UserRecordStoreError>,
    }

    /// Store keeping encoded documents in a `BTreeMap`, ordered by key.
    ///
    /// Documents are kept as encoded JSON so reads go through the same
    /// decode path as the database store. The `updated_at >= created_at`
    /// check is enforced as a rejected write.
    #[derive(Debug, Default)]
    pub struct InMemoryUserRecordStore {
        inner: Mutex<Inner>,
    }

    impl InMemoryUserRecordStore {
        /// Create an empty store.
        pub fn new() -> Self {
            Self::default()
        }

        fn lock(&self) -> Result<MutexGuard<'_, Inner>, UserRecordStoreError> {
            let guard = self
                .inner
                .lock()
                .map_err(|_| UserRecordStoreError::connection("in-memory store lock poisoned"))?;
            if let Some(failure) = guard.failure.clone() {
                return Err(failure);
            }
            Ok(guard)
        }

        /// Make every subsequent call fail with `failure`, or clear it.
        pub fn set_failure(&self, failure: Option<UserRecordStoreError>) {
            if let Ok(mut guard) = self.inner.lock() {
                guard.failure = failure;
            }
        }

        /// Insert a raw stored value, bypassing encoding.
        ///
        /// Lets tests plant documents that no longer decode.
        pub fn insert_raw(&self, id: UserId, document: Value, stamped_at: DateTime<Utc>) {
            if let Ok(mut guard) = self.inner.lock() {
                guard.rows.insert(
                    *id.as_uuid(),
                    StoredRow {
                        document,
                        created_at: stamped_at,
                        updated_at: stamped_at,
                    },
                );
            }
        }

        /// Number of stored records.
        pub fn len(&self) -> usize {
            self.inner.lock().map(|guard| guard.rows.len()).unwrap_or(0)
        }

        /// Whether the store holds no records.
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    fn encode(document: &UserDocument) -> Result<Value, UserRecordStoreError> {
        encode_document(document).map_err(|err| UserRecordStoreError::rejected(err.to_string()))
    }

    #[async_trait]
    impl UserRecordStore for InMemoryUserRecordStore {
        async fn insert(
            &self,
            document: &UserDocument,
            stamped_at: DateTime<Utc>,
        ) -> Result<UserId, UserRecordStoreError> {
            let document = encode(document)?;
            let mut guard = self.lock()?;
            let id = Uuid::new_v4();
            guard.rows.insert(
                id,
                StoredRow {
                    document,
                    created_at: stamped_at,
                    updated_at: stamped_at,
                },
            );
            Ok(UserId::from_uuid(id))
        }

        async fn fetch(&self, id: &UserId) -> Result<Option<UserRecord>, UserRecordStoreError> {
            let row = self.lock()?.rows.get(id.as_uuid()).cloned();
            row.map(|row| {
                let document = decode_document(row.document).map_err(|err| {
                    UserRecordStoreError::document_invalid(id.to_string(), err.to_string())
                })?;
                Ok(UserRecord {
                    id: *id,
                    document,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                })
            })
            .transpose()
        }

        async fn list(&self, window: PageWindow) -> Result<Vec<UserId>, UserRecordStoreError> {
            let guard = self.lock()?;
            let skip = usize::try_from(window.offset()).unwrap_or(usize::MAX);
            let take = usize::try_from(window.limit()).unwrap_or(0);
            Ok(guard
                .rows
                .keys()
                .skip(skip)
                .take(take)
                .copied()
                .map(UserId::from_uuid)
                .collect())
        }

        async fn replace(
            &self,
            id: &UserId,
            document: &UserDocument,
            updated_at: DateTime<Utc>,
        ) -> Result<Option<DateTime<Utc>>, UserRecordStoreError> {
            let document = encode(document)?;
            let mut guard = self.lock()?;
            let Some(row) = guard.rows.get_mut(id.as_uuid()) else {
                return Ok(None);
            };
            if updated_at < row.created_at {
                return Err(UserRecordStoreError::rejected(
                    "violates check constraint users_updated_after_created",
                ));
            }
            row.document = document;
            row.updated_at = updated_at;
            Ok(Some(row.created_at))
        }

        async fn delete(&self, id: &UserId) -> Result<bool, UserRecordStoreError> {
            Ok(self.lock()?.rows.remove(id.as_uuid()).is_some())
        }
    }
}

pub mod clock {
    //! Controllable [`Clock`] implementations.

    use std::sync::{Mutex, PoisonError};

    use chrono::{DateTime, Duration, Local, Utc};
    use mockable::Clock;

    /// Clock frozen at one instant.
    #[derive(Debug, Clone, Copy)]
    pub struct FixtureClock {
        now: DateTime<Utc>,
    }

    impl FixtureClock {
        /// Freeze the clock at `now`.
        pub fn at(now: DateTime<Utc>) -> Self {
            Self { now }
        }
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.now
        }
    }

    /// Clock that advances by a fixed step on every reading.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// First reading is `start`; each later reading adds `step`.
        pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }
}
