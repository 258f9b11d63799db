//! User record aggregate.
//!
//! A record pairs a server-assigned [`UserId`] with an opaque nested
//! [`UserDocument`] and two timestamps. The store treats the document as a
//! single JSONB value; only the identifier is used for addressing.
//!
//! The document keeps a small set of well-known fields typed and carries
//! everything else verbatim in `extra` maps, so documents written by older or
//! newer clients survive a read/write cycle unchanged.

pub mod codec;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::UserId;

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Innermost `metadata.test` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataTest {
    /// Free-form key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    /// Unrecognised fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nested `metadata` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Metadata-level identifier string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Nested test object.
    #[serde(default, deserialize_with = "null_as_default")]
    pub test: MetadataTest,
    /// Unrecognised fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The document stored for a record.
///
/// `id` is a client-chosen string and is unrelated to the primary key.
///
/// # Examples
/// ```
/// use users_backend::domain::UserDocument;
///
/// let doc: UserDocument =
///     serde_json::from_str(r#"{"id":"x","metadata":{"id":"m","test":{"key":"k"}},"age":3}"#)
///         .expect("document");
/// assert_eq!(doc.metadata.test.key, "k");
/// assert_eq!(doc.extra.get("age"), Some(&serde_json::json!(3)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    /// Free-form identifier string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Nested metadata.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: UserMetadata,
    /// Unrecognised top-level fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A persisted record.
///
/// ## Invariants
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Primary-key identifier.
    pub id: UserId,
    /// Stored document.
    pub document: UserDocument,
    /// Set once when the record is inserted.
    pub created_at: DateTime<Utc>,
    /// Set on every write, including the insert.
    pub updated_at: DateTime<Utc>,
}

/// A document submitted for create or update, as decoded from a request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSubmission {
    /// The `usersuuid` the client put in the body, if any.
    pub declared_id: Option<String>,
    /// The document to store.
    pub document: UserDocument,
}

impl RecordSubmission {
    /// Submission without a declared identifier.
    #[must_use]
    pub fn new(document: UserDocument) -> Self {
        Self {
            declared_id: None,
            document,
        }
    }

    /// Declared identifier, ignoring absent or blank values.
    #[must_use]
    pub fn declared_id(&self) -> Option<&str> {
        self.declared_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
