//! Route table for the user record resource.
//!
//! Paths are assembled from configuration so the same handlers can be
//! mounted under any version prefix, namespace label, and resource name:
//!
//! ```text
//! GET    {api_version}/{namespace_id}/{namespace}/{resource}LIST
//! POST   {api_version}/{namespace_id}/{namespace}/{resource}
//! GET    {api_version}/{namespace_id}/{namespace}/{resource}/{key}
//! PUT    {api_version}/{namespace_id}/{namespace}/{resource}/{key}
//! DELETE {api_version}/{namespace_id}/{namespace}/{resource}/{key}
//! ```

use actix_web::web;

use crate::domain::Error;
use crate::inbound::http::users;

/// Largest request body accepted by create and update, in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Path components for the resource routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoutes {
    api_version: String,
    namespace_id: String,
    resource_type: String,
    body_limit: usize,
}

impl Default for ResourceRoutes {
    fn default() -> Self {
        Self::new("/api/v1", "namespace", "users")
    }
}

impl ResourceRoutes {
    /// Build a route table from its path components.
    ///
    /// Slashes around each component are normalised, so `api/v1/` and
    /// `/api/v1` describe the same prefix.
    pub fn new(
        api_version: impl Into<String>,
        namespace_id: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into().trim_matches('/').to_owned(),
            namespace_id: namespace_id.into().trim_matches('/').to_owned(),
            resource_type: resource_type.into().trim_matches('/').to_owned(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Cap the size of create and update bodies.
    ///
    /// Larger bodies are answered with a 400 envelope.
    #[must_use]
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Request body cap in bytes.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Collection path, with `{namespace}` left as a match segment.
    #[must_use]
    pub fn collection_path(&self) -> String {
        let mut path = String::new();
        for segment in [self.api_version.as_str(), self.namespace_id.as_str()] {
            if !segment.is_empty() {
                path.push('/');
                path.push_str(segment);
            }
        }
        path.push_str("/{namespace}/");
        path.push_str(&self.resource_type);
        path
    }

    /// Listing path.
    #[must_use]
    pub fn list_path(&self) -> String {
        format!("{}LIST", self.collection_path())
    }

    /// Single-record path, with `{key}` left as a match segment.
    #[must_use]
    pub fn item_path(&self) -> String {
        format!("{}/{{key}}", self.collection_path())
    }

    /// Register the five record operations.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
            Error::invalid_request(format!("invalid query string: {err}")).into()
        }))
        .service(web::resource(self.list_path()).route(web::get().to(users::list_records)))
        .service(
            web::resource(self.collection_path())
                .app_data(web::PayloadConfig::new(self.body_limit))
                .route(web::post().to(users::create_record)),
        )
        .service(
            web::resource(self.item_path())
                .app_data(web::PayloadConfig::new(self.body_limit))
                .route(web::get().to(users::get_record))
                .route(web::put().to(users::update_record))
                .route(web::delete().to(users::delete_record)),
        );
    }
}
