//! Helpers shared by the integration suites under `backend/tests/`.

pub mod cluster_skip;
pub mod pg_embed;

use postgres::{Client, NoTls};
use uuid::Uuid;

/// DDL for the `users` table, shared with deployments.
pub const USERS_DDL: &str = include_str!("../../sql/users.sql");

/// Render a `postgres` error with its SQLSTATE and message.
///
/// The `Display` form collapses server errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    match error.as_db_error() {
        Some(db_error) => {
            let mut summary = format!("{:?}: {}", db_error.code(), db_error.message());
            if let Some(detail) = db_error.detail() {
                summary.push_str("; detail: ");
                summary.push_str(detail);
            }
            summary
        }
        None => error.to_string(),
    }
}

/// Create a fresh database holding an empty `users` table.
///
/// `admin_url` must point at an existing database on the same cluster;
/// `url_for` maps a database name to its connection URL.
pub fn provision_users_database(
    admin_url: &str,
    url_for: impl Fn(&str) -> String,
) -> Result<String, String> {
    let name = format!("users_{}", Uuid::new_v4().simple());
    let mut admin = Client::connect(admin_url, NoTls).map_err(|e| format_postgres_error(&e))?;
    admin
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|e| format_postgres_error(&e))?;

    let url = url_for(&name);
    let mut client = Client::connect(&url, NoTls).map_err(|e| format_postgres_error(&e))?;
    client
        .batch_execute(USERS_DDL)
        .map_err(|e| format_postgres_error(&e))?;
    Ok(url)
}

/// Overwrite the stored document of `id` with raw JSON text.
pub fn corrupt_document(url: &str, id: Uuid, raw_json: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|e| format_postgres_error(&e))?;
    client
        .execute(
            "UPDATE users SET document = $1::text::jsonb WHERE users_uuid = $2",
            &[&raw_json, &id],
        )
        .map_err(|e| format_postgres_error(&e))?;
    Ok(())
}
