//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of domain store ports backed by PostgreSQL via
//! `diesel-async` and `bb8` connection pooling.
//!
//! - Row structs (`models.rs`) and the table definition (`schema.rs`) are
//!   internal and never exposed to the domain layer.
//! - Every database failure is mapped to the port's error type.
//!
//! # Example
//!
//! ```ignore
//! use users_backend::outbound::persistence::{DbPool, DieselUserRecordStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let store = DieselUserRecordStore::new(pool);
//! ```

mod diesel_user_record_store;
mod models;
mod pool;
mod schema;

pub use diesel_user_record_store::DieselUserRecordStore;
pub use pool::{DbPool, PoolConfig, PoolError};
