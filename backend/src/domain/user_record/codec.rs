//! JSON codec for user documents.
//!
//! Storage holds the document alone; the primary key and timestamps live in
//! their own columns. Request bodies may additionally carry `usersuuid`,
//! `created`, and `updated`. The codec separates those envelope keys from
//! the document and never lets them leak into what is stored.
//!
//! Every failure is returned as a [`DocumentCodecError`].

use serde::Deserialize;
use serde_json::Value;

use super::{RecordSubmission, UserDocument};

/// Keys that belong to the record envelope rather than the document.
pub const RESERVED_KEYS: [&str; 4] = ["usersuuid", "UsersUUID", "created", "updated"];

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentCodecError {
    /// Input bytes or value do not describe a document.
    #[error("malformed document: {message}")]
    Malformed {
        /// Parser diagnostic.
        message: String,
    },
    /// The document could not be turned into JSON.
    #[error("document could not be encoded: {message}")]
    Unencodable {
        /// Serialiser diagnostic.
        message: String,
    },
}

impl DocumentCodecError {
    fn malformed(error: &serde_json::Error) -> Self {
        Self::Malformed {
            message: error.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SubmissionWire {
    #[serde(default, alias = "UsersUUID")]
    usersuuid: Option<String>,
    // Timestamps are server-assigned; accept and drop whatever the client sent.
    #[serde(default, rename = "created")]
    _created: Option<Value>,
    #[serde(default, rename = "updated")]
    _updated: Option<Value>,
    #[serde(flatten)]
    document: UserDocument,
}

/// Decode a create/update request body.
///
/// # Errors
/// Returns [`DocumentCodecError::Malformed`] when the body is not a JSON
/// object of the expected shape.
///
/// # Examples
/// ```
/// use users_backend::domain::user_record::codec::decode_submission;
///
/// let body = br#"{"usersuuid":"abc","id":"x","created":"whenever"}"#;
/// let submission = decode_submission(body).expect("valid body");
/// assert_eq!(submission.declared_id.as_deref(), Some("abc"));
/// assert_eq!(submission.document.id, "x");
/// assert!(submission.document.extra.is_empty());
/// ```
pub fn decode_submission(bytes: &[u8]) -> Result<RecordSubmission, DocumentCodecError> {
    let wire: SubmissionWire =
        serde_json::from_slice(bytes).map_err(|err| DocumentCodecError::malformed(&err))?;
    Ok(RecordSubmission {
        declared_id: wire.usersuuid,
        document: wire.document,
    })
}

/// Encode a document into the value written to storage.
///
/// # Errors
/// Returns [`DocumentCodecError::Unencodable`] if serialisation fails.
pub fn encode_document(document: &UserDocument) -> Result<Value, DocumentCodecError> {
    serde_json::to_value(document).map_err(|err| DocumentCodecError::Unencodable {
        message: err.to_string(),
    })
}

/// Decode a stored value back into a document.
///
/// Envelope keys found in the stored value are dropped.
///
/// # Errors
/// Returns [`DocumentCodecError::Malformed`] when the value is not an object
/// of the expected shape.
pub fn decode_document(value: Value) -> Result<UserDocument, DocumentCodecError> {
    let mut document: UserDocument =
        serde_json::from_value(value).map_err(|err| DocumentCodecError::malformed(&err))?;
    for key in RESERVED_KEYS {
        document.extra.remove(key);
    }
    Ok(document)
}
