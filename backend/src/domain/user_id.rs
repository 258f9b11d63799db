//! Primary-key identifier for user records.

use std::fmt;

use serde_json::json;
use uuid::Uuid;

use super::Error;

/// Length of the canonical hyphenated UUID text form.
const CANONICAL_LEN: usize = 36;

/// Rejection raised by [`UserId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// The input is not a canonical hyphenated UUID.
    #[error("invalid UUID: {value}")]
    Malformed {
        /// The literal input, echoed back to the caller.
        value: String,
    },
}

impl From<UserIdError> for Error {
    fn from(value: UserIdError) -> Self {
        let message = value.to_string();
        let UserIdError::Malformed { value } = value;
        Error::invalid_request(message).with_details(json!({
            "field": "key",
            "value": value,
            "code": "invalid_uuid",
        }))
    }
}

/// Server-assigned identifier addressing exactly one user record.
///
/// Only the canonical `8-4-4-4-12` hexadecimal form is accepted on input;
/// braced, URN, and unhyphenated spellings are rejected. The identifier is
/// always rendered in lowercase hyphenated form.
///
/// # Examples
/// ```
/// use users_backend::domain::UserId;
///
/// let id = UserId::parse("3FA85F64-5717-4562-B3FC-2C963F66AFA6").expect("valid");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(UserId::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate caller-supplied text. Never touches storage.
    ///
    /// # Errors
    /// Returns [`UserIdError::Malformed`] carrying the input verbatim.
    pub fn parse(raw: &str) -> Result<Self, UserIdError> {
        let malformed = || UserIdError::Malformed {
            value: raw.to_owned(),
        };
        if raw.len() != CANONICAL_LEN {
            return Err(malformed());
        }
        Uuid::try_parse(raw).map(Self).map_err(|_| malformed())
    }

    /// Wrap a UUID produced by the store.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
