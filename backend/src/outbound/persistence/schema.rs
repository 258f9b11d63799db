//! Diesel table definitions.
//!
//! Must match `sql/users.sql`. The table is created by that script; this
//! crate ships no migration runner.

diesel::table! {
    /// User records keyed by a database-generated UUID.
    users (users_uuid) {
        /// Primary key, defaulted by `gen_random_uuid()`.
        users_uuid -> Uuid,
        /// Opaque record document.
        document -> Jsonb,
        /// Set once on insert.
        created_at -> Timestamptz,
        /// Set on every write.
        updated_at -> Timestamptz,
    }
}
